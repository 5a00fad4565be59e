//! Generational pipeline engine.
//!
//! A [`Pipeline`] chains stages ([`SelectionStage`], [`CrossoverStage`],
//! [`MutationStage`] or any [`PipelineElement`]) into a generational loop
//! that runs until a [`Terminator`] signals stop.
//!
//! # Determinism
//!
//! A run is fully determined by its source, its stages and
//! [`PipelineConfig::seed`]. Stages that fan out draw one seed per task
//! from the engine before any task runs, so enabling
//! [`PipelineConfig::parallel`] never changes the result.

mod config;
mod element;
mod runner;
mod terminator;

pub use config::PipelineConfig;
pub use element::{CrossoverStage, MutationStage, PipelineElement, SelectionStage, StageEnv, SurvivorCount};
pub use runner::{GenerationStats, Pipeline, PipelineReport};
pub use terminator::{stop_when, AnyOf, FitnessTarget, FnTerminator, MaxGenerations, Stagnation, Terminator, Timeout};
