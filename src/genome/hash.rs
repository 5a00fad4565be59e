//! Stream-hash collaborators for sequences.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Hashes the genes of one sequence into a `u64`.
///
/// Implementations must be pure: equal gene slices hash equally.
/// Any `Fn(&[G]) -> u64` closure is a `SequenceHasher`.
pub trait SequenceHasher<G>: Send + Sync {
    /// Hashes `genes`.
    fn hash_genes(&self, genes: &[G]) -> u64;
}

impl<G, F> SequenceHasher<G> for F
where
    F: Fn(&[G]) -> u64 + Send + Sync,
{
    fn hash_genes(&self, genes: &[G]) -> u64 {
        self(genes)
    }
}

/// Hashes genes with the standard library's `DefaultHasher`.
///
/// The default hasher starts from fixed keys, so values are stable within
/// one build of the program.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSequenceHasher;

impl<G: Hash> SequenceHasher<G> for StdSequenceHasher {
    fn hash_genes(&self, genes: &[G]) -> u64 {
        let mut hasher = DefaultHasher::new();
        genes.hash(&mut hasher);
        hasher.finish()
    }
}

/// Hasher for gene types without a `Hash` impl; every sequence hashes to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHash;

impl<G> SequenceHasher<G> for NoHash {
    fn hash_genes(&self, _genes: &[G]) -> u64 {
        0
    }
}
