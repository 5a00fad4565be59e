//! Rearranging moves: swaps, insertion and inversion.
//!
//! Every move rearranges genes without changing the multiset, so they are
//! safe on permutations.

use super::Mutation;
use crate::crossover::check_min_len;
use crate::error::Result;
use crate::genome::{Gene, GenomeBase, Sequence};
use crate::random::RandomSource;

/// Swap mutation: exchange two distinct random positions.
///
/// Requires at least 2 genes.
///
/// # Complexity
/// O(1)
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleSwap;

impl<G: Gene> Mutation<G> for SingleSwap {
    fn name(&self) -> &'static str {
        "single-swap"
    }

    fn mutate<B, R>(&self, _base: &B, seq: &mut Sequence<G>, rng: &mut R) -> Result<()>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        check_min_len(seq.len(), 2)?;
        let mut at = [0usize; 2];
        rng.uniform_distinct_int_seq(0, seq.len() - 1, &mut at)?;
        seq.swap(at[0], at[1]);
        Ok(())
    }
}

/// Double swap: three distinct positions `i, j, k` rotate so that `j`
/// receives `i`'s gene, `k` receives `j`'s and `i` receives `k`'s.
///
/// Requires at least 3 genes.
///
/// # Complexity
/// O(1)
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleSwap;

impl<G: Gene> Mutation<G> for DoubleSwap {
    fn name(&self) -> &'static str {
        "double-swap"
    }

    fn mutate<B, R>(&self, _base: &B, seq: &mut Sequence<G>, rng: &mut R) -> Result<()>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        check_min_len(seq.len(), 3)?;
        let mut at = [0usize; 3];
        rng.uniform_distinct_int_seq(0, seq.len() - 1, &mut at)?;
        let [i, j, k] = at;
        let carried = seq.get(k);
        seq.set(k, seq.get(j));
        seq.set(j, seq.get(i));
        seq.set(i, carried);
        Ok(())
    }
}

/// Insert mutation: remove a gene and reinsert it at a random position.
///
/// Equivalent to a single "insert" move in local search. Draws the source
/// position in `[0, n-1]`, then the target among the `n` insertion points
/// of the remaining genes. Sequences shorter than 2 are left unchanged.
///
/// # Complexity
/// O(n) due to shifting
#[derive(Debug, Clone, Copy, Default)]
pub struct Insert;

impl<G: Gene> Mutation<G> for Insert {
    fn name(&self) -> &'static str {
        "insert"
    }

    fn mutate<B, R>(&self, _base: &B, seq: &mut Sequence<G>, rng: &mut R) -> Result<()>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        let n = seq.len();
        if n < 2 {
            return Ok(());
        }
        let from = rng.uniform_int(0, n - 1);
        let to = rng.uniform_int(0, n - 1);
        let genes = seq.genes_mut();
        if from < to {
            genes[from..=to].rotate_left(1);
        } else {
            genes[to..=from].rotate_right(1);
        }
        Ok(())
    }
}

/// Invert mutation: reverse a random segment (2-opt move).
///
/// The segment runs between two independent draws in `[0, n-1]`.
/// Sequences shorter than 2 are left unchanged.
///
/// # Complexity
/// O(n) worst case for segment reversal
#[derive(Debug, Clone, Copy, Default)]
pub struct Invert;

impl<G: Gene> Mutation<G> for Invert {
    fn name(&self) -> &'static str {
        "invert"
    }

    fn mutate<B, R>(&self, _base: &B, seq: &mut Sequence<G>, rng: &mut R) -> Result<()>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        let n = seq.len();
        if n < 2 {
            return Ok(());
        }
        let a = rng.uniform_int(0, n - 1);
        let b = rng.uniform_int(0, n - 1);
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        seq.genes_mut()[start..=end].reverse();
        Ok(())
    }
}
