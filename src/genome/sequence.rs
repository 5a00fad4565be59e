//! Fixed-length gene buffers.

use crate::error::{EvoError, Result};
use std::fmt;
use std::sync::OnceLock;

/// Element type of a [`Sequence`].
///
/// `Default` supplies the zero gene used by freshly created sequences.
pub trait Gene: Copy + Default + PartialEq + PartialOrd + Send + Sync + fmt::Debug + 'static {}

impl<T> Gene for T where T: Copy + Default + PartialEq + PartialOrd + Send + Sync + fmt::Debug + 'static {}

/// Cached measurements of a sequence.
///
/// Each `OnceLock` doubles as a freshness flag: initialised means valid.
#[derive(Debug, Clone, Default)]
pub(crate) struct Measurements {
    pub(crate) fitness: OnceLock<f64>,
    pub(crate) hash: OnceLock<u64>,
}

/// One candidate solution: an ordered, fixed-length array of genes.
///
/// The length is set at creation and never changes. A sequence owns its
/// genes outright; cloning is a deep copy. Sequences created by a caching
/// [`GenomeBase`](super::GenomeBase) also remember their fitness and hash
/// until the next gene write.
pub struct Sequence<G> {
    genes: Box<[G]>,
    cache: Option<Measurements>,
}

impl<G: Gene> Sequence<G> {
    /// Allocates a zero-initialised sequence of exactly `len` genes.
    pub(crate) fn zeroed(len: usize, cached: bool) -> Result<Self> {
        let mut genes = Vec::new();
        genes
            .try_reserve_exact(len)
            .map_err(|_| EvoError::Allocation { genes: len })?;
        genes.resize(len, G::default());
        Ok(Self::from_boxed(genes.into_boxed_slice(), cached))
    }

    pub(crate) fn from_boxed(genes: Box<[G]>, cached: bool) -> Self {
        Self {
            genes,
            cache: cached.then(Measurements::default),
        }
    }

    /// Deep copy into a fresh allocation, keeping any valid cached values.
    pub(crate) fn try_clone(&self) -> Result<Self> {
        let mut genes = Vec::new();
        genes
            .try_reserve_exact(self.genes.len())
            .map_err(|_| EvoError::Allocation {
                genes: self.genes.len(),
            })?;
        genes.extend_from_slice(&self.genes);
        Ok(Self {
            genes: genes.into_boxed_slice(),
            cache: self.cache.clone(),
        })
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the sequence holds no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Read-only view of the genes.
    pub fn genes(&self) -> &[G] {
        &self.genes
    }

    /// Mutable view of the genes.
    ///
    /// Cached fitness and hash are invalidated up front, since any write
    /// through the slice happens while it is borrowed.
    pub fn genes_mut(&mut self) -> &mut [G] {
        self.invalidate();
        &mut self.genes
    }

    /// Gene at `offset`.
    ///
    /// # Panics
    /// Panics if `offset >= len`.
    pub fn get(&self, offset: usize) -> G {
        assert!(
            offset < self.genes.len(),
            "offset {offset} out of bounds (len = {})",
            self.genes.len()
        );
        self.genes[offset]
    }

    /// Writes `gene` at `offset` and invalidates cached values.
    ///
    /// # Panics
    /// Panics if `offset >= len`.
    pub fn set(&mut self, offset: usize, gene: G) {
        assert!(
            offset < self.genes.len(),
            "offset {offset} out of bounds (len = {})",
            self.genes.len()
        );
        self.invalidate();
        self.genes[offset] = gene;
    }

    /// Exchanges two genes and invalidates cached values.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.genes_mut().swap(a, b);
    }

    /// Whether this sequence carries a fitness/hash cache.
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Cached fitness, if present and still valid.
    pub fn cached_fitness(&self) -> Option<f64> {
        self.cache.as_ref().and_then(|c| c.fitness.get().copied())
    }

    /// Cached hash, if present and still valid.
    pub fn cached_hash(&self) -> Option<u64> {
        self.cache.as_ref().and_then(|c| c.hash.get().copied())
    }

    pub(crate) fn measurements(&self) -> Option<&Measurements> {
        self.cache.as_ref()
    }

    fn invalidate(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            *cache = Measurements::default();
        }
    }
}

impl<G: Clone> Clone for Sequence<G> {
    fn clone(&self) -> Self {
        Self {
            genes: self.genes.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<G: PartialEq> PartialEq for Sequence<G> {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl<G: fmt::Debug> fmt::Debug for Sequence<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.genes.iter()).finish()
    }
}
