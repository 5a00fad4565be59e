//! Mutation operators.
//!
//! A mutation perturbs one sequence in place ([`Mutation::mutate`]). The
//! copy-and-perturb form ([`Mutation::create_child`]) leaves the parent
//! untouched.
//!
//! # Order-preserving moves
//!
//! - [`SingleSwap`]: exchange two distinct positions
//! - [`DoubleSwap`]: rotate three distinct positions
//! - [`Insert`]: remove one gene and reinsert it elsewhere
//! - [`Invert`]: reverse a segment (2-opt move)
//!
//! These keep the multiset of genes, so permutations stay permutations.
//!
//! # Bit flips
//!
//! - [`FlipOne`], [`FlipAll`], [`FlipAtLeastOne`] for [`Flip`] genes

mod bitflip;
mod swap;

pub use bitflip::{Flip, FlipAll, FlipAtLeastOne, FlipOne};
pub use swap::{DoubleSwap, Insert, Invert, SingleSwap};

use crate::error::Result;
use crate::genome::{Gene, GenomeBase, Sequence};
use crate::random::RandomSource;

/// A mutation operator over genes of type `G`.
pub trait Mutation<G: Gene> {
    /// Short operator name used in logs.
    fn name(&self) -> &'static str;

    /// Perturbs `seq` in place.
    ///
    /// Fails on precondition violations before touching `seq`.
    fn mutate<B, R>(&self, base: &B, seq: &mut Sequence<G>, rng: &mut R) -> Result<()>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized;

    /// Returns a mutated copy of `seq`.
    fn create_child<B, R>(&self, base: &B, seq: &Sequence<G>, rng: &mut R) -> Result<Sequence<G>>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        let mut child = base.copy(seq)?;
        self.mutate(base, &mut child, rng)?;
        Ok(child)
    }
}
