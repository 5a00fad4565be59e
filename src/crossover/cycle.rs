//! Cycle Crossover (CX).

use super::{assemble, check_permutations, Crossover};
use crate::error::Result;
use crate::genome::{Gene, GenomeBase, Sequence};
use crate::random::RandomSource;
use std::collections::HashMap;
use std::hash::Hash;

/// Cycle Crossover (CX) for permutations.
///
/// Every gene keeps the absolute position it had in one of the parents.
///
/// # Algorithm (Oliver, Smith & Holland, 1987)
///
/// 1. Starting at the lowest unassigned position `p`, follow
///    `p -> position in A of B[p]` until the walk returns to its start; the
///    visited positions form one cycle
/// 2. Repeat until every position belongs to a cycle
/// 3. Child1 takes even-numbered cycles from A and odd-numbered ones from B;
///    child2 the complement
///
/// Deterministic: no random draws are consumed.
///
/// # Complexity
/// O(n) expected time, O(n) space
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleCrossover;

impl CycleCrossover {
    /// Cycle number of every position, numbered in discovery order.
    pub(crate) fn cycles<G: Eq + Hash + Copy>(a: &[G], b: &[G], pos_a: &HashMap<G, usize>) -> Vec<usize> {
        let n = a.len();
        let mut cycle_of = vec![usize::MAX; n];
        let mut next_cycle = 0;
        for start in 0..n {
            if cycle_of[start] != usize::MAX {
                continue;
            }
            let mut pos = start;
            loop {
                cycle_of[pos] = next_cycle;
                pos = pos_a[&b[pos]];
                if pos == start {
                    break;
                }
            }
            next_cycle += 1;
        }
        cycle_of
    }
}

impl<G: Gene + Eq + Hash> Crossover<G> for CycleCrossover {
    fn children(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "cycle"
    }

    fn recombine<B, R>(&self, base: &B, a: &Sequence<G>, b: &Sequence<G>, _rng: &mut R) -> Result<Vec<Sequence<G>>>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        let (pos_a, _) = check_permutations(a.genes(), b.genes())?;
        let cycle_of = Self::cycles(a.genes(), b.genes(), &pos_a);

        let (ga, gb) = (a.genes(), b.genes());
        let mut first = Vec::with_capacity(ga.len());
        let mut second = Vec::with_capacity(ga.len());
        for (i, &cycle) in cycle_of.iter().enumerate() {
            if cycle % 2 == 0 {
                first.push(ga[i]);
                second.push(gb[i]);
            } else {
                first.push(gb[i]);
                second.push(ga[i]);
            }
        }
        Ok(vec![assemble(base, &[&first])?, assemble(base, &[&second])?])
    }
}
