//! Crossover (recombination) operators.
//!
//! Every operator consumes two parent sequences and produces one or two
//! children through a [`Sink`]. Children are built and validated in full
//! before anything is pushed, so a failing call leaves the sink untouched.
//!
//! # Array operators
//!
//! - [`OnePoint`], [`TwoPoint`]: prefix/segment splicing of equal-length parents
//! - [`CutAndSplice`]: independent cuts, children may change length
//! - [`Uniform`]: per-gene coin flips
//!
//! # Permutation operators
//!
//! - [`OrderCrossover`] (OX): Davis (1985) - preserves relative order
//! - [`PartiallyMapped`] (PMX): Goldberg & Lingle (1985) - preserves absolute position
//! - [`CycleCrossover`] (CX): Oliver, Smith & Holland (1987) - preserves absolute position per cycle
//! - [`EdgeRecombination`] (ERX): Whitley et al. (1989) - preserves adjacency
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Oliver, Smith & Holland (1987), "A Study of Permutation Crossover Operators
//!   on the Traveling Salesman Problem"
//! - Whitley, Starkweather & Fuquay (1989), "Scheduling Problems and Traveling
//!   Salesmen: The Genetic Edge Recombination Operator"

mod cycle;
mod edge;
mod order;
mod pmx;
mod point;

pub use cycle::CycleCrossover;
pub use edge::{EdgePreference, EdgeRecombination};
pub use order::OrderCrossover;
pub use pmx::PartiallyMapped;
pub use point::{CutAndSplice, OnePoint, TwoPoint, Uniform};

use crate::error::{EvoError, Result};
use crate::genome::{Gene, GenomeBase, Sequence};
use crate::population::Sink;
use crate::random::RandomSource;
use std::collections::HashMap;
use std::hash::Hash;

/// A recombination operator over genes of type `G`.
pub trait Crossover<G: Gene> {
    /// Number of children produced per call for valid parents.
    fn children(&self) -> usize;

    /// Short operator name used in logs.
    fn name(&self) -> &'static str;

    /// Builds the children of `a` and `b`.
    ///
    /// Fails on precondition violations before producing any child.
    fn recombine<B, R>(
        &self,
        base: &B,
        a: &Sequence<G>,
        b: &Sequence<G>,
        rng: &mut R,
    ) -> Result<Vec<Sequence<G>>>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized;

    /// Recombines `a` and `b` and pushes the children to `sink`.
    ///
    /// Returns the number of children pushed.
    fn crossover<B, R, K>(
        &self,
        base: &B,
        a: &Sequence<G>,
        b: &Sequence<G>,
        rng: &mut R,
        sink: &mut K,
    ) -> Result<usize>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
        K: Sink<Sequence<G>> + ?Sized,
    {
        let children = self.recombine(base, a, b, rng)?;
        let count = children.len();
        for child in children {
            sink.push(child);
        }
        Ok(count)
    }
}

// ============================================================================
// Preconditions
// ============================================================================

pub(crate) fn check_equal_len(a: usize, b: usize) -> Result<usize> {
    if a == b {
        Ok(a)
    } else {
        Err(EvoError::LengthMismatch { left: a, right: b })
    }
}

pub(crate) fn check_min_len(len: usize, min: usize) -> Result<()> {
    if len < min {
        Err(EvoError::TooShort { len, min })
    } else {
        Ok(())
    }
}

/// Verifies both slices hold the same multiset of genes.
pub(crate) fn check_same_multiset<G: Eq + Hash + Copy>(a: &[G], b: &[G]) -> Result<()> {
    check_equal_len(a.len(), b.len())?;
    let mut counts: HashMap<G, isize> = HashMap::with_capacity(a.len());
    for &g in a {
        *counts.entry(g).or_insert(0) += 1;
    }
    for &g in b {
        match counts.get_mut(&g) {
            Some(c) if *c > 0 => *c -= 1,
            _ => return Err(EvoError::NotPermutation),
        }
    }
    Ok(())
}

/// Position of every gene in `genes`, failing on repeats.
pub(crate) fn positions<G: Eq + Hash + Copy>(genes: &[G]) -> Result<HashMap<G, usize>> {
    let mut map = HashMap::with_capacity(genes.len());
    for (position, &g) in genes.iter().enumerate() {
        if map.insert(g, position).is_some() {
            return Err(EvoError::DuplicateGene { position });
        }
    }
    Ok(map)
}

/// Verifies `a` and `b` are permutations of the same distinct genes and
/// returns the position maps of both.
pub(crate) fn check_permutations<G: Eq + Hash + Copy>(
    a: &[G],
    b: &[G],
) -> Result<(HashMap<G, usize>, HashMap<G, usize>)> {
    check_equal_len(a.len(), b.len())?;
    let pos_a = positions(a)?;
    let pos_b = positions(b)?;
    if pos_b.keys().any(|g| !pos_a.contains_key(g)) {
        return Err(EvoError::NotPermutation);
    }
    Ok((pos_a, pos_b))
}

// ============================================================================
// Child assembly
// ============================================================================

/// Allocates a child through `base` and fills it with the concatenation of
/// `parts`.
pub(crate) fn assemble<B: GenomeBase>(base: &B, parts: &[&[B::Gene]]) -> Result<Sequence<B::Gene>> {
    let len = parts.iter().map(|p| p.len()).sum();
    let mut child = base.create(len)?;
    let mut offset = 0;
    let genes = child.genes_mut();
    for part in parts {
        genes[offset..offset + part.len()].copy_from_slice(part);
        offset += part.len();
    }
    Ok(child)
}
