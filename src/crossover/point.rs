//! Array crossovers: one-point, two-point, cut-and-splice and uniform.
//!
//! These make no assumption about gene values, so they work for any
//! [`Gene`] type.

use super::{assemble, check_equal_len, check_min_len, Crossover};
use crate::error::Result;
use crate::genome::{Gene, GenomeBase, Sequence};
use crate::random::RandomSource;

/// One-point crossover.
///
/// Draws one cut `c` in `[1, len - 2]`; child1 is A's prefix with B's
/// suffix, child2 the reverse. Requires equal lengths of at least 3.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnePoint;

impl<G: Gene> Crossover<G> for OnePoint {
    fn children(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "one-point"
    }

    fn recombine<B, R>(&self, base: &B, a: &Sequence<G>, b: &Sequence<G>, rng: &mut R) -> Result<Vec<Sequence<G>>>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        let n = check_equal_len(a.len(), b.len())?;
        check_min_len(n, 3)?;
        let c = rng.uniform_int(1, n - 2);
        let (a, b) = (a.genes(), b.genes());
        Ok(vec![
            assemble(base, &[&a[..c], &b[c..]])?,
            assemble(base, &[&b[..c], &a[c..]])?,
        ])
    }
}

/// Two-point crossover.
///
/// Draws `c1` in `[3, len - 4]` and `c2` in `[c1 + 1, len - 3]`, so the
/// outer segments keep at least 3 genes each and the middle is non-empty.
/// child1 is B with A's middle `[c1, c2)`; child2 is A with B's middle.
/// Requires equal lengths of at least 7.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPoint;

impl TwoPoint {
    /// Minimum genes kept on each side of the middle segment.
    const OUTER: usize = 3;
    const MIN_LEN: usize = 2 * Self::OUTER + 1;

    fn splice<B: GenomeBase>(
        base: &B,
        outer: &[B::Gene],
        inner: &[B::Gene],
        c1: usize,
        c2: usize,
    ) -> Result<Sequence<B::Gene>> {
        assemble(base, &[&outer[..c1], &inner[c1..c2], &outer[c2..]])
    }
}

impl<G: Gene> Crossover<G> for TwoPoint {
    fn children(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "two-point"
    }

    fn recombine<B, R>(&self, base: &B, a: &Sequence<G>, b: &Sequence<G>, rng: &mut R) -> Result<Vec<Sequence<G>>>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        let n = check_equal_len(a.len(), b.len())?;
        check_min_len(n, Self::MIN_LEN)?;
        let c1 = rng.uniform_int(Self::OUTER, n - Self::OUTER - 1);
        let c2 = rng.uniform_int(c1 + 1, n - Self::OUTER);
        let (a, b) = (a.genes(), b.genes());
        Ok(vec![
            Self::splice(base, b, a, c1, c2)?,
            Self::splice(base, a, b, c1, c2)?,
        ])
    }
}

/// Cut-and-splice crossover.
///
/// Parents may differ in length. Each parent gets its own cut in
/// `[1, len - 2]`: child1 is `A[..ca] + B[cb..]`, child2 is
/// `B[..cb] + A[ca..]`, so child1 has `ca + (len_b - cb)` genes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CutAndSplice;

impl<G: Gene> Crossover<G> for CutAndSplice {
    fn children(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "cut-and-splice"
    }

    fn recombine<B, R>(&self, base: &B, a: &Sequence<G>, b: &Sequence<G>, rng: &mut R) -> Result<Vec<Sequence<G>>>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        check_min_len(a.len(), 3)?;
        check_min_len(b.len(), 3)?;
        let ca = rng.uniform_int(1, a.len() - 2);
        let cb = rng.uniform_int(1, b.len() - 2);
        let (a, b) = (a.genes(), b.genes());
        Ok(vec![
            assemble(base, &[&a[..ca], &b[cb..]])?,
            assemble(base, &[&b[..cb], &a[ca..]])?,
        ])
    }
}

/// Uniform crossover.
///
/// One coin per position: on heads child1 takes A's gene and child2 B's,
/// on tails the reverse.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform;

impl<G: Gene> Crossover<G> for Uniform {
    fn children(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "uniform"
    }

    fn recombine<B, R>(&self, base: &B, a: &Sequence<G>, b: &Sequence<G>, rng: &mut R) -> Result<Vec<Sequence<G>>>
    where
        B: GenomeBase<Gene = G>,
        R: RandomSource + ?Sized,
    {
        let n = check_equal_len(a.len(), b.len())?;
        let mut coins = vec![0usize; n];
        rng.uniform_int_seq(0, 1, &mut coins);

        let mut first = base.create(n)?;
        let mut second = base.create(n)?;
        let (ga, gb) = (a.genes(), b.genes());
        {
            let (c1, c2) = (first.genes_mut(), second.genes_mut());
            for (i, &heads) in coins.iter().enumerate() {
                if heads == 1 {
                    c1[i] = ga[i];
                    c2[i] = gb[i];
                } else {
                    c1[i] = gb[i];
                    c2[i] = ga[i];
                }
            }
        }
        Ok(vec![first, second])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvoError;
    use crate::genome::Genome;
    use crate::random::{create_rng, ScriptedSource};

    fn base() -> impl GenomeBase<Gene = u32> {
        Genome::new(|_: &[u32]| 0.0)
    }

    fn genes(seqs: &[Sequence<u32>]) -> Vec<Vec<u32>> {
        seqs.iter().map(|s| s.genes().to_vec()).collect()
    }

    // ---- One-point ----

    #[test]
    fn test_one_point_scripted_cut() {
        let base = base();
        let a = base.from_genes((0..6).collect());
        let b = base.from_genes((10..16).collect());
        let mut src = ScriptedSource::new([2]);
        let kids = OnePoint.recombine(&base, &a, &b, &mut src).unwrap();
        assert_eq!(
            genes(&kids),
            vec![vec![0, 1, 12, 13, 14, 15], vec![10, 11, 2, 3, 4, 5]]
        );
    }

    #[test]
    fn test_one_point_cut_range() {
        let base = base();
        let a = base.from_genes(vec![0; 5]);
        let b = base.from_genes(vec![1; 5]);
        let mut rng = create_rng(42);
        for _ in 0..200 {
            let kids = OnePoint.recombine(&base, &a, &b, &mut rng).unwrap();
            // Cut never at 0 or past len - 2: both ends always differ.
            assert_eq!(kids[0].get(0), 0);
            assert_eq!(kids[0].get(4), 1);
            assert_eq!(kids[0].get(3), 1);
        }
    }

    #[test]
    fn test_one_point_rejects_mismatch() {
        let base = base();
        let a = base.from_genes(vec![0; 5]);
        let b = base.from_genes(vec![0; 6]);
        let mut rng = create_rng(1);
        let mut sink = Vec::new();
        let err = OnePoint.crossover(&base, &a, &b, &mut rng, &mut sink).unwrap_err();
        assert_eq!(err, EvoError::LengthMismatch { left: 5, right: 6 });
        assert!(sink.is_empty());
    }

    // ---- Two-point ----

    #[test]
    fn test_two_point_fixed_cuts() {
        let base = base();
        let a = base.from_genes((0..10).collect());
        let b = base.from_genes((10..20).collect());
        let mut src = ScriptedSource::new([5, 6]);
        let mut sink = Vec::new();
        let n = TwoPoint.crossover(&base, &a, &b, &mut src, &mut sink).unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            genes(&sink),
            vec![
                vec![10, 11, 12, 13, 14, 5, 16, 17, 18, 19],
                vec![0, 1, 2, 3, 4, 15, 6, 7, 8, 9],
            ]
        );
    }

    #[test]
    fn test_two_point_shortest_parents() {
        let base = base();
        let a = base.from_genes(vec![0; 7]);
        let b = base.from_genes(vec![1; 7]);
        let mut rng = create_rng(3);
        for _ in 0..50 {
            let kids = TwoPoint.recombine(&base, &a, &b, &mut rng).unwrap();
            assert_eq!(kids[0].genes(), &[1, 1, 1, 0, 1, 1, 1]);
            assert_eq!(kids[1].genes(), &[0, 0, 0, 1, 0, 0, 0]);
        }
    }

    #[test]
    fn test_two_point_outer_segments_keep_three() {
        let base = base();
        let a = base.from_genes(vec![0; 10]);
        let b = base.from_genes(vec![1; 10]);
        let mut rng = create_rng(8);
        for _ in 0..200 {
            let kids = TwoPoint.recombine(&base, &a, &b, &mut rng).unwrap();
            let child = kids[0].genes();
            assert!(child[..3].iter().all(|&g| g == 1), "{child:?}");
            assert!(child[7..].iter().all(|&g| g == 1), "{child:?}");
            assert!(child.contains(&0));
        }
    }

    #[test]
    #[should_panic(expected = "outside [3, 6]")]
    fn test_two_point_never_cuts_near_the_ends() {
        let base = base();
        let a = base.from_genes((0..10).collect());
        let b = base.from_genes((10..20).collect());
        let mut src = ScriptedSource::new([1, 2]);
        let _ = TwoPoint.recombine(&base, &a, &b, &mut src);
    }

    #[test]
    fn test_two_point_too_short() {
        let base = base();
        let mut rng = create_rng(3);
        for len in [3, 6] {
            let a = base.from_genes(vec![0; len]);
            assert_eq!(
                TwoPoint.recombine(&base, &a, &a, &mut rng).unwrap_err(),
                EvoError::TooShort { len, min: 7 }
            );
        }
    }

    // ---- Cut-and-splice ----

    #[test]
    fn test_cut_and_splice_lengths() {
        let base = base();
        let a = base.from_genes((0..5).collect());
        let b = base.from_genes((10..18).collect());
        let mut src = ScriptedSource::new([3, 2]);
        let kids = CutAndSplice.recombine(&base, &a, &b, &mut src).unwrap();
        assert_eq!(kids[0].genes(), &[0, 1, 2, 12, 13, 14, 15, 16, 17]);
        assert_eq!(kids[1].genes(), &[10, 11, 3, 4]);
        assert_eq!(kids[0].len(), 3 + (8 - 2));
    }

    #[test]
    fn test_cut_and_splice_conserves_genes() {
        let base = base();
        let a = base.from_genes((0..7).collect());
        let b = base.from_genes((10..14).collect());
        let mut rng = create_rng(11);
        for _ in 0..100 {
            let kids = CutAndSplice.recombine(&base, &a, &b, &mut rng).unwrap();
            assert_eq!(kids[0].len() + kids[1].len(), 11);
        }
    }

    #[test]
    fn test_cut_and_splice_short_parent() {
        let base = base();
        let a = base.from_genes(vec![0; 5]);
        let b = base.from_genes(vec![0; 2]);
        let mut rng = create_rng(1);
        assert_eq!(
            CutAndSplice.recombine(&base, &a, &b, &mut rng).unwrap_err(),
            EvoError::TooShort { len: 2, min: 3 }
        );
    }

    // ---- Uniform ----

    #[test]
    fn test_uniform_complementary() {
        let base = base();
        let a = base.from_genes((0..4).collect());
        let b = base.from_genes((10..14).collect());
        let mut src = ScriptedSource::new([1, 0, 0, 1]);
        let kids = Uniform.recombine(&base, &a, &b, &mut src).unwrap();
        assert_eq!(kids[0].genes(), &[0, 11, 12, 3]);
        assert_eq!(kids[1].genes(), &[10, 1, 2, 13]);
    }

    #[test]
    fn test_uniform_requires_equal_length() {
        let base = base();
        let a = base.from_genes(vec![0; 4]);
        let b = base.from_genes(vec![0; 3]);
        let mut rng = create_rng(1);
        assert!(Uniform.recombine(&base, &a, &b, &mut rng).is_err());
    }
}
