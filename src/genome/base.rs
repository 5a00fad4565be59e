//! The genome base: the only way to build, read, write and measure
//! sequences of one gene type.

use super::hash::{SequenceHasher, StdSequenceHasher};
use super::sequence::{Gene, Sequence};
use crate::error::Result;
use std::cmp::Ordering;
use std::fmt;

/// Operation set bound to one gene type, one fitness function and one hash
/// function.
///
/// Implementors supply [`evaluate`](GenomeBase::evaluate) and
/// [`digest`](GenomeBase::digest); everything else has a provided
/// implementation. Operators receive the base by reference and never keep it.
///
/// # Thread Safety
///
/// `GenomeBase` must be `Send + Sync` because the pipeline may evaluate and
/// breed individuals in parallel using rayon.
pub trait GenomeBase: Send + Sync {
    /// Gene type of every sequence this base manages.
    type Gene: Gene;

    /// Raw fitness of a gene slice. Must be pure.
    fn evaluate(&self, genes: &[Self::Gene]) -> f64;

    /// Raw hash of a gene slice. Must be pure.
    fn digest(&self, genes: &[Self::Gene]) -> u64;

    /// Whether created sequences carry a fitness/hash cache.
    fn caching(&self) -> bool {
        false
    }

    /// Creates a zero-initialised sequence of exactly `len` genes.
    fn create(&self, len: usize) -> Result<Sequence<Self::Gene>> {
        Sequence::zeroed(len, self.caching())
    }

    /// Wraps existing genes in a sequence of this base's variant.
    fn from_genes(&self, genes: Vec<Self::Gene>) -> Sequence<Self::Gene> {
        Sequence::from_boxed(genes.into_boxed_slice(), self.caching())
    }

    /// Releases a sequence. Taking it by value makes a second release
    /// impossible.
    fn dispose(&self, seq: Sequence<Self::Gene>) {
        drop(seq);
    }

    /// Gene at `offset`. Panics when `offset >= len`.
    fn get(&self, seq: &Sequence<Self::Gene>, offset: usize) -> Self::Gene {
        seq.get(offset)
    }

    /// Writes a gene. Panics when `offset >= len`.
    fn set(&self, seq: &mut Sequence<Self::Gene>, offset: usize, gene: Self::Gene) {
        seq.set(offset, gene);
    }

    /// Length of `seq`.
    fn len(&self, seq: &Sequence<Self::Gene>) -> usize {
        seq.len()
    }

    /// Fitness of `seq`, served from its cache when it has one.
    fn fitness(&self, seq: &Sequence<Self::Gene>) -> f64 {
        match seq.measurements() {
            Some(cache) => *cache.fitness.get_or_init(|| self.evaluate(seq.genes())),
            None => self.evaluate(seq.genes()),
        }
    }

    /// Hash of `seq`, served from its cache when it has one.
    fn hash(&self, seq: &Sequence<Self::Gene>) -> u64 {
        match seq.measurements() {
            Some(cache) => *cache.hash.get_or_init(|| self.digest(seq.genes())),
            None => self.digest(seq.genes()),
        }
    }

    /// Total order used to compare sequences.
    ///
    /// A shorter sequence is less. Equal lengths compare gene by gene and
    /// the first difference decides; incomparable genes count as equal.
    fn cmp(&self, a: &Sequence<Self::Gene>, b: &Sequence<Self::Gene>) -> Ordering {
        a.len().cmp(&b.len()).then_with(|| {
            a.genes()
                .iter()
                .zip(b.genes())
                .map(|(x, y)| x.partial_cmp(y).unwrap_or(Ordering::Equal))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }

    /// Position of the first gene equal to `gene`.
    fn index_of(&self, seq: &Sequence<Self::Gene>, gene: Self::Gene) -> Option<usize> {
        seq.genes().iter().position(|&g| g == gene)
    }

    /// Deep copy into a fresh allocation.
    fn copy(&self, seq: &Sequence<Self::Gene>) -> Result<Sequence<Self::Gene>> {
        seq.try_clone()
    }
}

/// Concrete [`GenomeBase`] with an injected fitness function and hasher.
///
/// # Examples
///
/// ```
/// use u_evolve::genome::{Genome, GenomeBase};
///
/// let base = Genome::new(|genes: &[u32]| genes.iter().sum::<u32>() as f64).cached();
/// let mut seq = base.create(4).unwrap();
/// base.set(&mut seq, 2, 5);
/// assert_eq!(base.fitness(&seq), 5.0);
/// assert_eq!(seq.cached_fitness(), Some(5.0));
/// ```
pub struct Genome<G, F, H = StdSequenceHasher> {
    fitness: F,
    hasher: H,
    cached: bool,
    _gene: std::marker::PhantomData<fn() -> G>,
}

impl<G, F> Genome<G, F, StdSequenceHasher>
where
    G: Gene + std::hash::Hash,
    F: Fn(&[G]) -> f64 + Send + Sync,
{
    /// Creates a non-caching base hashing genes with [`StdSequenceHasher`].
    pub fn new(fitness: F) -> Self {
        Self {
            fitness,
            hasher: StdSequenceHasher,
            cached: false,
            _gene: std::marker::PhantomData,
        }
    }
}

impl<G, F, H> Genome<G, F, H>
where
    G: Gene,
    F: Fn(&[G]) -> f64 + Send + Sync,
    H: SequenceHasher<G>,
{
    /// Creates a non-caching base with a custom hasher.
    pub fn with_hasher(fitness: F, hasher: H) -> Self {
        Self {
            fitness,
            hasher,
            cached: false,
            _gene: std::marker::PhantomData,
        }
    }

    /// Switches created sequences to the cached variant.
    pub fn cached(mut self) -> Self {
        self.cached = true;
        self
    }
}

impl<G, F, H> GenomeBase for Genome<G, F, H>
where
    G: Gene,
    F: Fn(&[G]) -> f64 + Send + Sync,
    H: SequenceHasher<G>,
{
    type Gene = G;

    fn evaluate(&self, genes: &[G]) -> f64 {
        (self.fitness)(genes)
    }

    fn digest(&self, genes: &[G]) -> u64 {
        self.hasher.hash_genes(genes)
    }

    fn caching(&self) -> bool {
        self.cached
    }
}

impl<G, F, H> fmt::Debug for Genome<G, F, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Genome")
            .field("gene", &std::any::type_name::<G>())
            .field("cached", &self.cached)
            .finish()
    }
}
