//! Partially Mapped Crossover (PMX).

use super::{assemble, check_permutations, Crossover};
use crate::error::Result;
use crate::genome::{Gene, GenomeBase, Sequence};
use crate::random::RandomSource;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Partially Mapped Crossover (PMX) for permutations.
///
/// Preserves the **absolute position** of genes from both parents as much
/// as possible.
///
/// # Algorithm (Goldberg & Lingle, 1985)
///
/// 1. Select a random segment `[start, end]`
/// 2. Copy the template's segment to the child at the same positions
/// 3. For each gene in the donor's segment that isn't in the child yet,
///    follow the mapping chain to a position outside the segment and place
///    it there
/// 4. Fill remaining positions from the donor
///
/// Child1 uses A as template and B as donor; child2 swaps the roles.
///
/// # Complexity
/// O(n) expected time, O(n) space
#[derive(Debug, Clone, Copy, Default)]
pub struct PartiallyMapped;

impl PartiallyMapped {
    /// Build one PMX child: copy segment from `template`, map from `donor`.
    pub(crate) fn build<G: Eq + Hash + Copy>(
        template: &[G],
        donor: &[G],
        donor_pos: &HashMap<G, usize>,
        start: usize,
        end: usize,
    ) -> Vec<G> {
        let n = template.len();
        let mut child: Vec<Option<G>> = vec![None; n];
        let mut placed: HashSet<G> = HashSet::with_capacity(end - start + 1);

        for i in start..=end {
            child[i] = Some(template[i]);
            placed.insert(template[i]);
        }

        for i in start..=end {
            let donor_val = donor[i];
            if placed.contains(&donor_val) {
                continue;
            }
            let mut pos = i;
            loop {
                let mapped = template[pos];
                let next = donor_pos[&mapped];
                if next < start || next > end {
                    child[next] = Some(donor_val);
                    placed.insert(donor_val);
                    break;
                }
                pos = next;
            }
        }

        child
            .into_iter()
            .zip(donor)
            .map(|(slot, &d)| slot.unwrap_or(d))
            .collect()
    }
}

impl<G: Gene + Eq + Hash> Crossover<G> for PartiallyMapped {
    fn children(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "pmx"
    }

    fn recombine<B, R>(&self, base: &B, a: &Sequence<G>, b: &Sequence<G>, rng: &mut R) -> Result<Vec<Sequence<G>>>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        let (pos_a, pos_b) = check_permutations(a.genes(), b.genes())?;
        let n = a.len();
        if n == 0 {
            return Ok(vec![base.copy(a)?, base.copy(b)?]);
        }
        let x = rng.uniform_int(0, n - 1);
        let y = rng.uniform_int(0, n - 1);
        let (start, end) = if x <= y { (x, y) } else { (y, x) };

        let first = Self::build(a.genes(), b.genes(), &pos_b, start, end);
        let second = Self::build(b.genes(), a.genes(), &pos_a, start, end);
        Ok(vec![assemble(base, &[&first])?, assemble(base, &[&second])?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossover::test_support::same_genes;
    use crate::error::EvoError;
    use crate::genome::Genome;
    use crate::random::{create_rng, ScriptedSource};

    fn base() -> impl GenomeBase<Gene = usize> {
        Genome::new(|_: &[usize]| 0.0)
    }

    #[test]
    fn test_pmx_fixed_segment() {
        let base = base();
        let a = base.from_genes(vec![9, 8, 7, 6, 5, 0, 1, 2, 3, 4]);
        let b = base.from_genes(vec![0, 1, 2, 3, 4, 9, 8, 7, 6, 5]);
        let mut src = ScriptedSource::new([4, 5]);
        let mut sink = Vec::new();
        let n = PartiallyMapped
            .crossover(&base, &a, &b, &mut src, &mut sink)
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(sink[0].genes(), &[9, 1, 2, 3, 5, 0, 8, 7, 6, 4]);
        assert_eq!(sink[1].genes(), &[0, 8, 7, 6, 4, 9, 1, 2, 3, 5]);
    }

    #[test]
    fn test_pmx_reversed_draws_give_same_segment() {
        let base = base();
        let a = base.from_genes(vec![9, 8, 7, 6, 5, 0, 1, 2, 3, 4]);
        let b = base.from_genes(vec![0, 1, 2, 3, 4, 9, 8, 7, 6, 5]);
        let mut src = ScriptedSource::new([5, 4]);
        let kids = PartiallyMapped.recombine(&base, &a, &b, &mut src).unwrap();
        assert_eq!(kids[0].genes(), &[9, 1, 2, 3, 5, 0, 8, 7, 6, 4]);
    }

    #[test]
    fn test_pmx_produces_valid_permutations() {
        let base = base();
        let a = base.from_genes((0..8).collect());
        let b = base.from_genes(vec![3, 7, 5, 1, 6, 0, 2, 4]);
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let kids = PartiallyMapped.recombine(&base, &a, &b, &mut rng).unwrap();
            assert!(same_genes(kids[0].genes(), a.genes()), "PMX child1 not valid: {:?}", kids[0]);
            assert!(same_genes(kids[1].genes(), a.genes()), "PMX child2 not valid: {:?}", kids[1]);
        }
    }

    #[test]
    fn test_pmx_identical_parents() {
        let base = base();
        let p = base.from_genes(vec![0, 1, 2, 3, 4]);
        let mut rng = create_rng(42);
        let kids = PartiallyMapped.recombine(&base, &p, &p, &mut rng).unwrap();
        assert_eq!(kids[0], p);
        assert_eq!(kids[1], p);
    }

    #[test]
    fn test_pmx_single_element() {
        let base = base();
        let p = base.from_genes(vec![0]);
        let mut rng = create_rng(42);
        let kids = PartiallyMapped.recombine(&base, &p, &p, &mut rng).unwrap();
        assert_eq!(kids[0].genes(), &[0]);
        assert_eq!(kids[1].genes(), &[0]);
    }

    #[test]
    fn test_pmx_rejects_duplicates() {
        let base = base();
        let a = base.from_genes(vec![0, 0, 1]);
        let b = base.from_genes(vec![0, 1, 0]);
        let mut rng = create_rng(42);
        assert_eq!(
            PartiallyMapped.recombine(&base, &a, &b, &mut rng).unwrap_err(),
            EvoError::DuplicateGene { position: 1 }
        );
    }
}
