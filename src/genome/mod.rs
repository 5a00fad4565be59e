//! Sequence and genome-base abstraction.
//!
//! A [`Sequence`] is one candidate solution: a fixed-length, exclusively
//! owned array of genes. A [`GenomeBase`] is the strategy object bound to
//! one gene type, one fitness function and one hash function; operators
//! create, read, write and measure sequences only through it.
//!
//! # Key Types
//!
//! - [`Gene`]: Marker trait for gene element types
//! - [`Sequence`]: Owned gene buffer with optional fitness/hash cache
//! - [`GenomeBase`]: Create/dispose/get/set/len/fitness/hash/cmp/index_of/copy
//! - [`Genome`]: Concrete base with injected fitness function and hasher
//! - [`SequenceHasher`]: Stream-hash collaborator

mod base;
mod hash;
mod sequence;

pub use base::{Genome, GenomeBase};
pub use hash::{NoHash, SequenceHasher, StdSequenceHasher};
pub use sequence::{Gene, Sequence};
