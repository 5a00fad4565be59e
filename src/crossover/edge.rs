//! Edge Recombination Crossover (ERX).

use super::{assemble, check_permutations, Crossover};
use crate::error::Result;
use crate::genome::{Gene, GenomeBase, Sequence};
use crate::random::RandomSource;
use std::hash::Hash;

/// Which neighbour the walk moves to next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgePreference {
    /// Neighbour with the fewest remaining unvisited neighbours (Whitley's rule).
    #[default]
    Sparsest,
    /// Neighbour with the most remaining unvisited neighbours.
    Densest,
}

/// Edge Recombination Crossover (ERX) for permutations.
///
/// Builds a child tour out of the adjacencies present in either parent.
///
/// # Algorithm (Whitley et al., 1989)
///
/// 1. For every gene collect up to four cyclic neighbours, in the order
///    A-predecessor, A-successor, B-predecessor, B-successor, without repeats
/// 2. Start from the first gene of B or of A (one draw in `[0, 1]`: 0 picks
///    B's first gene, 1 picks A's)
/// 3. Mark the current gene visited; among its unvisited neighbours move to
///    the one with the fewest (or, with [`EdgePreference::Densest`], the
///    most) unvisited neighbours of its own. Ties are broken uniformly at
///    random in table order
/// 4. With no unvisited neighbour left, jump to a uniformly random unvisited
///    gene (in A's order)
///
/// A choice between a single candidate consumes no random draw.
///
/// Produces one child.
///
/// # Complexity
/// O(n · (j + 1)) time where `j` counts jumps to unvisited genes, so O(n²)
/// in the worst case; O(n) space (at most four neighbours per gene)
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeRecombination {
    preference: EdgePreference,
}

impl EdgeRecombination {
    /// ERX with the classic fewest-neighbours rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// ERX with an explicit neighbour preference.
    pub fn with_preference(preference: EdgePreference) -> Self {
        Self { preference }
    }

    /// Neighbour preference in use.
    pub fn preference(&self) -> EdgePreference {
        self.preference
    }

    /// Neighbour table keyed by gene id (the gene's position in A).
    fn edge_table(n: usize, b_ids: &[usize]) -> Vec<Vec<usize>> {
        let mut table: Vec<Vec<usize>> = vec![Vec::with_capacity(4); n];
        let add = |table: &mut Vec<Vec<usize>>, gene: usize, neighbour: usize| {
            if neighbour != gene && !table[gene].contains(&neighbour) {
                table[gene].push(neighbour);
            }
        };
        // In A, gene id i sits at position i.
        for i in 0..n {
            add(&mut table, i, (i + n - 1) % n);
            add(&mut table, i, (i + 1) % n);
        }
        for p in 0..n {
            let gene = b_ids[p];
            add(&mut table, gene, b_ids[(p + n - 1) % n]);
            add(&mut table, gene, b_ids[(p + 1) % n]);
        }
        table
    }

    fn pick<R: RandomSource + ?Sized>(candidates: &[usize], rng: &mut R) -> usize {
        if candidates.len() == 1 {
            candidates[0]
        } else {
            candidates[rng.uniform_int(0, candidates.len() - 1)]
        }
    }

    /// Walks the edge table and returns the child as gene ids.
    fn walk<R: RandomSource + ?Sized>(&self, table: &[Vec<usize>], start: usize, rng: &mut R) -> Vec<usize> {
        let n = table.len();
        let mut visited = vec![false; n];
        let mut tour = Vec::with_capacity(n);
        let mut current = start;

        loop {
            visited[current] = true;
            tour.push(current);
            if tour.len() == n {
                break;
            }

            let remaining = |gene: usize, visited: &[bool]| table[gene].iter().filter(|&&g| !visited[g]).count();
            let open: Vec<usize> = table[current].iter().copied().filter(|&g| !visited[g]).collect();

            current = if open.is_empty() {
                let unvisited: Vec<usize> = (0..n).filter(|&g| !visited[g]).collect();
                Self::pick(&unvisited, rng)
            } else {
                let scores: Vec<usize> = open.iter().map(|&g| remaining(g, &visited)).collect();
                let target = match self.preference {
                    EdgePreference::Sparsest => scores.iter().copied().min(),
                    EdgePreference::Densest => scores.iter().copied().max(),
                }
                .unwrap_or(0);
                let ties: Vec<usize> = open
                    .iter()
                    .zip(&scores)
                    .filter(|&(_, &s)| s == target)
                    .map(|(&g, _)| g)
                    .collect();
                Self::pick(&ties, rng)
            };
        }
        tour
    }
}

impl<G: Gene + Eq + Hash> Crossover<G> for EdgeRecombination {
    fn children(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "edge-recombination"
    }

    fn recombine<B, R>(&self, base: &B, a: &Sequence<G>, b: &Sequence<G>, rng: &mut R) -> Result<Vec<Sequence<G>>>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        let (pos_a, _) = check_permutations(a.genes(), b.genes())?;
        let n = a.len();
        if n == 0 {
            return Ok(vec![base.copy(a)?]);
        }

        let b_ids: Vec<usize> = b.genes().iter().map(|g| pos_a[g]).collect();
        let table = Self::edge_table(n, &b_ids);
        let start = [b_ids[0], 0][rng.uniform_int(0, 1)];
        let tour = self.walk(&table, start, rng);

        let ga = a.genes();
        let genes: Vec<G> = tour.into_iter().map(|id| ga[id]).collect();
        Ok(vec![assemble(base, &[&genes])?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossover::test_support::same_genes;
    use crate::error::EvoError;
    use crate::genome::Genome;
    use crate::random::{create_rng, ScriptedSource};

    fn base() -> impl GenomeBase<Gene = u32> {
        Genome::new(|_: &[u32]| 0.0)
    }

    #[test]
    fn test_edge_table_union() {
        let b_ids = [5, 2, 0, 1, 6, 4, 3];
        let table = EdgeRecombination::edge_table(7, &b_ids);
        assert_eq!(table[0], vec![6, 1, 2]);
        assert_eq!(table[2], vec![1, 3, 5, 0]);
        assert_eq!(table[5], vec![4, 6, 3, 2]);
        assert!(table.iter().all(|row| row.len() <= 4));
    }

    #[test]
    fn test_edge_densest_reference_example() {
        let base = base();
        let a = base.from_genes((0..7).collect());
        let b = base.from_genes(vec![5, 2, 0, 1, 6, 4, 3]);
        let erx = EdgeRecombination::with_preference(EdgePreference::Densest);
        let mut src = ScriptedSource::new([1, 1, 1]);
        let mut sink = Vec::new();
        let n = erx.crossover(&base, &a, &b, &mut src, &mut sink).unwrap();
        assert_eq!(n, 1);
        assert_eq!(sink[0].genes(), &[0, 2, 5, 6, 4, 3, 1]);
        assert_eq!(src.remaining_ints(), 0);
    }

    #[test]
    fn test_edge_sparsest_follows_fewest_neighbours() {
        let base = base();
        let a = base.from_genes((0..7).collect());
        let b = base.from_genes(vec![5, 2, 0, 1, 6, 4, 3]);
        // Start at A's first gene; from 0 the sparsest neighbour is 1 (no
        // draw); ties at 1, 3 and 4.
        let mut src = ScriptedSource::new([1, 0, 0, 0]);
        let kids = EdgeRecombination::new().recombine(&base, &a, &b, &mut src).unwrap();
        assert_eq!(kids[0].genes(), &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(src.remaining_ints(), 0);
    }

    #[test]
    fn test_edge_starts_from_b_first_gene() {
        let base = base();
        let a = base.from_genes(vec![0, 1, 2, 3]);
        let b = base.from_genes(vec![3, 2, 1, 0]);
        let mut rng = ScriptedSource::new([0, 0, 0, 0]);
        let kids = EdgeRecombination::new().recombine(&base, &a, &b, &mut rng).unwrap();
        assert_eq!(kids[0].get(0), 3);

        let mut rng = ScriptedSource::new([1, 0, 0, 0]);
        let kids = EdgeRecombination::new().recombine(&base, &a, &b, &mut rng).unwrap();
        assert_eq!(kids[0].get(0), 0);
    }

    #[test]
    fn test_edge_produces_valid_permutations() {
        let base = base();
        let a = base.from_genes((0..12).collect());
        let b = base.from_genes(vec![4, 11, 0, 7, 2, 9, 5, 1, 10, 3, 8, 6]);
        let mut rng = create_rng(42);
        for pref in [EdgePreference::Sparsest, EdgePreference::Densest] {
            let erx = EdgeRecombination::with_preference(pref);
            for _ in 0..100 {
                let kids = erx.recombine(&base, &a, &b, &mut rng).unwrap();
                assert_eq!(kids.len(), 1);
                assert!(same_genes(kids[0].genes(), a.genes()), "{:?}", kids[0]);
            }
        }
    }

    #[test]
    fn test_edge_single_and_pair() {
        let base = base();
        let mut rng = create_rng(1);
        let one = base.from_genes(vec![7]);
        let kids = EdgeRecombination::new().recombine(&base, &one, &one, &mut rng).unwrap();
        assert_eq!(kids[0].genes(), &[7]);

        let a = base.from_genes(vec![1, 2]);
        let b = base.from_genes(vec![2, 1]);
        let kids = EdgeRecombination::new().recombine(&base, &a, &b, &mut rng).unwrap();
        assert!(same_genes(kids[0].genes(), &[1, 2]));
    }

    #[test]
    fn test_edge_rejects_non_permutation() {
        let base = base();
        let a = base.from_genes(vec![0, 1, 2]);
        let b = base.from_genes(vec![0, 1, 1]);
        let mut rng = create_rng(1);
        assert_eq!(
            EdgeRecombination::new().recombine(&base, &a, &b, &mut rng).unwrap_err(),
            EvoError::DuplicateGene { position: 2 }
        );
    }
}
