//! Generic genetic-algorithm toolkit over fixed-length gene sequences.
//!
//! Provides the building blocks of a generational evolutionary search:
//!
//! - **Genome**: [`Sequence`] buffers and the [`GenomeBase`] strategy that
//!   creates, copies, measures and hashes them.
//! - **Crossover**: one-point, two-point, uniform, cut-and-splice, and the
//!   permutation-preserving order, partially-mapped, cycle and edge
//!   recombination operators.
//! - **Selection**: fittest, tournament, double tournament, roulette wheel,
//!   stochastic universal sampling and rank selection.
//! - **Mutation**: swap, insert and inversion moves for permutations, plus
//!   bit-flip moves for boolean genes.
//! - **Pipeline**: a double-buffered generational engine that chains
//!   stages until a [`Terminator`](pipeline::Terminator) says stop.
//!
//! # Architecture
//!
//! Every operator reads and writes sequences only through a
//! [`GenomeBase`] and draws all randomness from a [`RandomSource`], so any
//! operator can be driven by a scripted source in tests and by a seeded
//! [`EvoRng`] in production. Gene semantics and fitness are defined by the
//! consumer; the crate contains no problem-specific concepts.
//!
//! # Example
//!
//! ```
//! use u_evolve::crossover::PartiallyMapped;
//! use u_evolve::mutation::Invert;
//! use u_evolve::pipeline::{AnyOf, CrossoverStage, FitnessTarget, MaxGenerations, MutationStage, SelectionStage, SurvivorCount};
//! use u_evolve::selection::Tournament;
//! use u_evolve::{Genome, GenomeBase, Pipeline, PipelineConfig};
//!
//! // Count adjacent ascending pairs of a tour.
//! let base = Genome::new(|g: &[u16]| g.windows(2).filter(|w| w[0] < w[1]).count() as f64);
//! let source: Vec<_> = (0..8u16)
//!     .map(|k| base.from_genes((0..10).map(|i| (i * 3 + k) % 10).collect()))
//!     .collect();
//!
//! let pipeline = Pipeline::new(base)
//!     .with_config(PipelineConfig::reproducible(7))
//!     .then(SelectionStage::new(Tournament::new(2, 90).unwrap(), SurvivorCount::Fixed(4)).unwrap())
//!     .then(CrossoverStage::new(PartiallyMapped))
//!     .then(MutationStage::new(Invert, 30).unwrap());
//!
//! let mut stop = AnyOf::new().or(MaxGenerations(20)).or(FitnessTarget::at_least(9.0));
//! let mut sink = Vec::new();
//! let report = pipeline.run(&source, &mut stop, &mut sink).unwrap();
//! assert!(report.generations <= 20);
//! assert_eq!(sink.len(), 12);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): per-individual and per-pair work runs on the
//!   rayon pool. Results are identical with and without it.
//! - `serde`: `Serialize`/`Deserialize` for configuration, statistics and
//!   operator parameter types.

pub mod crossover;
pub mod error;
pub mod genome;
pub mod mutation;
pub mod pipeline;
pub mod population;
pub mod random;
pub mod selection;

pub use error::{EvoError, Result};
pub use genome::{Gene, Genome, GenomeBase, Sequence};
pub use pipeline::{Pipeline, PipelineConfig, PipelineReport};
pub use population::{Population, Sink};
pub use random::{create_rng, EvoRng, RandomSource};
