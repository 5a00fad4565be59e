//! Error types shared by every operator and the pipeline engine.
//!
//! Precondition violations, arithmetic-domain failures and allocation
//! failures are all reported through [`EvoError`]. Out-of-range gene offsets
//! are contract violations and panic instead.

use thiserror::Error;

/// Errors raised by genome, crossover, selection, mutation and pipeline code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvoError {
    /// Two sequences that must have equal length do not.
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// A sequence is shorter than an operator's minimum length.
    #[error("sequence of length {len} is too short, at least {min} genes required")]
    TooShort { len: usize, min: usize },

    /// Parents do not hold the same multiset of genes.
    #[error("parents are not permutations of the same genes")]
    NotPermutation,

    /// A permutation-only operator found a repeated gene.
    #[error("gene at position {position} occurs more than once")]
    DuplicateGene { position: usize },

    /// A percentage parameter is outside `[1, 100]`.
    #[error("probability {0} is outside [1, 100]")]
    InvalidProbability(u32),

    /// More individuals were requested than the population holds.
    #[error("requested {requested} individuals from a population of {available}")]
    CountExceedsPopulation { requested: usize, available: usize },

    /// The population is too small for the operator's parameters.
    #[error("population of {size} is too small, more than {required} individuals required")]
    PopulationTooSmall { size: usize, required: usize },

    /// An operator needs at least one individual.
    #[error("population is empty")]
    EmptyPopulation,

    /// More distinct values were requested than the interval contains.
    #[error("cannot draw {requested} distinct values from an interval of {available}")]
    DistinctRange { requested: usize, available: usize },

    /// A negative fitness reached a proportional selector without alignment.
    #[error("fitness {value} at index {index} is negative, enable alignment")]
    NegativeWeight { index: usize, value: f64 },

    /// The cumulative fitness overflowed or contains NaN.
    #[error("cumulative fitness is not finite")]
    NonFiniteWeight,

    /// Gene storage could not be allocated.
    #[error("failed to allocate storage for {genes} genes")]
    Allocation { genes: usize },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EvoError>;

/// Checks that a percentage lies in `[1, 100]`.
pub(crate) fn check_percent(p: u32) -> Result<u32> {
    if (1..=100).contains(&p) {
        Ok(p)
    } else {
        Err(EvoError::InvalidProbability(p))
    }
}
