//! Pipeline configuration.
//!
//! [`PipelineConfig`] holds the engine-level parameters. Operator
//! parameters live on the stages themselves.

use crate::error::{EvoError, Result};
use crate::selection::Objective;

/// Configuration for the [`Pipeline`](super::Pipeline) engine.
///
/// # Defaults
///
/// ```
/// use u_evolve::pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert!(config.seed.is_none());
/// assert!(config.track_history);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::pipeline::PipelineConfig;
/// use u_evolve::selection::Objective;
///
/// let config = PipelineConfig::default()
///     .with_seed(42)
///     .with_objective(Objective::Minimize)
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineConfig {
    /// Seed of the pipeline engine.
    ///
    /// `None` draws a random seed; the seed actually used is reported in
    /// [`PipelineReport::seed`](super::PipelineReport::seed).
    pub seed: Option<u64>,

    /// Whether stages run their per-individual and per-pair work on the
    /// rayon pool. Results do not depend on this flag.
    pub parallel: bool,

    /// Direction used for generation statistics.
    pub objective: Objective,

    /// Whether to record [`GenerationStats`](super::GenerationStats) for
    /// every generation.
    pub track_history: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            parallel: cfg!(feature = "parallel"),
            objective: Objective::default(),
            track_history: true,
        }
    }
}

impl PipelineConfig {
    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel stage execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the optimisation direction.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Enables or disables per-generation statistics.
    pub fn with_history(mut self, track: bool) -> Self {
        self.track_history = track;
        self
    }

    /// Preset for single-threaded runs.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Preset for reproducible runs with a fixed seed.
    pub fn reproducible(seed: u64) -> Self {
        Self::default().with_seed(seed)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.parallel && !cfg!(feature = "parallel") {
            return Err(EvoError::InvalidConfig(
                "parallel execution requires the `parallel` feature".into(),
            ));
        }
        Ok(())
    }
}
