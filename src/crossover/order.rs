//! Order Crossover (OX).

use super::{check_min_len, check_same_multiset, Crossover};
use crate::error::Result;
use crate::genome::{Gene, GenomeBase, Sequence};
use crate::random::RandomSource;
use std::collections::HashMap;
use std::hash::Hash;

/// Order Crossover (OX) for permutations.
///
/// Preserves the **relative order** of the donor's genes.
///
/// # Algorithm
///
/// 1. Draw a cut `c` in `[1, len - 1]`
/// 2. Copy A's prefix `[0, c)` to the child verbatim
/// 3. Scan B front to back; each gene not consumed by the prefix fills the
///    next free position. Repeated genes are matched one-for-one, so parents
///    only need to hold the same multiset.
///
/// Produces one child.
///
/// # Complexity
/// O(n) time, O(n) space
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderCrossover;

impl OrderCrossover {
    /// Builds the child for a fixed cut.
    pub(crate) fn build<G: Eq + Hash + Copy>(template: &[G], donor: &[G], cut: usize) -> Vec<G> {
        let mut child = Vec::with_capacity(template.len());
        child.extend_from_slice(&template[..cut]);

        let mut pending: HashMap<G, usize> = HashMap::with_capacity(cut);
        for &g in &template[..cut] {
            *pending.entry(g).or_insert(0) += 1;
        }
        for &g in donor {
            match pending.get_mut(&g) {
                Some(left) if *left > 0 => *left -= 1,
                _ => child.push(g),
            }
        }
        child
    }
}

impl<G: Gene + Eq + Hash> Crossover<G> for OrderCrossover {
    fn children(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "order"
    }

    fn recombine<B, R>(&self, base: &B, a: &Sequence<G>, b: &Sequence<G>, rng: &mut R) -> Result<Vec<Sequence<G>>>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        check_same_multiset(a.genes(), b.genes())?;
        check_min_len(a.len(), 2)?;
        let cut = rng.uniform_int(1, a.len() - 1);
        let genes = Self::build(a.genes(), b.genes(), cut);
        Ok(vec![super::assemble(base, &[&genes])?])
    }
}
