//! Mutations for genes with a complement, such as bit strings.

use super::Mutation;
use crate::crossover::check_min_len;
use crate::error::{check_percent, Result};
use crate::genome::{Gene, GenomeBase, Sequence};
use crate::random::RandomSource;

/// A gene with a complement.
pub trait Flip: Gene {
    /// The complement of `self`.
    fn flipped(self) -> Self;
}

impl Flip for bool {
    fn flipped(self) -> Self {
        !self
    }
}

/// Flips one uniformly chosen gene. Requires at least 1 gene.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlipOne;

impl<G: Flip> Mutation<G> for FlipOne {
    fn name(&self) -> &'static str {
        "flip-one"
    }

    fn mutate<B, R>(&self, _base: &B, seq: &mut Sequence<G>, rng: &mut R) -> Result<()>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        check_min_len(seq.len(), 1)?;
        let i = rng.uniform_int(0, seq.len() - 1);
        seq.set(i, seq.get(i).flipped());
        Ok(())
    }
}

/// Flips every gene. Consumes no random draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlipAll;

impl<G: Flip> Mutation<G> for FlipAll {
    fn name(&self) -> &'static str {
        "flip-all"
    }

    fn mutate<B, R>(&self, _base: &B, seq: &mut Sequence<G>, _rng: &mut R) -> Result<()>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        for g in seq.genes_mut() {
            *g = g.flipped();
        }
        Ok(())
    }
}

/// Flips each gene with probability `P / 100`, at least one overall.
///
/// One pass draws a gate in `[1, 100]` per gene and records the genes whose
/// gate passes (`draw <= P`). A pass that selects nothing is discarded and
/// repeated, so the flip pattern is conditioned on being non-empty.
/// Requires at least 1 gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlipAtLeastOne {
    probability: u32,
}

impl FlipAtLeastOne {
    /// Fails unless `probability` is in `[1, 100]`.
    pub fn new(probability: u32) -> Result<Self> {
        Ok(Self {
            probability: check_percent(probability)?,
        })
    }

    pub fn probability(&self) -> u32 {
        self.probability
    }
}

impl<G: Flip> Mutation<G> for FlipAtLeastOne {
    fn name(&self) -> &'static str {
        "flip-at-least-one"
    }

    fn mutate<B, R>(&self, _base: &B, seq: &mut Sequence<G>, rng: &mut R) -> Result<()>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        check_min_len(seq.len(), 1)?;
        let p = self.probability as usize;
        let mut gates = vec![0usize; seq.len()];
        loop {
            rng.uniform_int_seq(1, 100, &mut gates);
            if gates.iter().any(|&d| d <= p) {
                break;
            }
        }
        for (g, &d) in seq.genes_mut().iter_mut().zip(&gates) {
            if d <= p {
                *g = g.flipped();
            }
        }
        Ok(())
    }
}
