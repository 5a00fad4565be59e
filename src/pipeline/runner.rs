//! Generational loop execution.
//!
//! [`Pipeline`] owns the genome base and an ordered list of stages and runs
//! them as a double-buffered state machine:
//! copy source → (stage → stage → …) → terminate? → repeat.

use super::config::PipelineConfig;
use super::element::{PipelineElement, StageEnv};
use super::terminator::Terminator;
use crate::error::Result;
use crate::genome::{GenomeBase, Sequence};
use crate::population::{Population, Sink};
use crate::random::create_rng;
use crate::selection::Objective;
use log::{debug, info, trace};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Fitness summary of one generation's active buffer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// 1-based generation number.
    pub generation: usize,
    /// Individuals in the active buffer.
    pub size: usize,
    /// Best fitness under the configured objective (NaN when empty).
    pub best: f64,
    /// Mean fitness (NaN when empty).
    pub mean: f64,
    /// Worst fitness under the configured objective (NaN when empty).
    pub worst: f64,
}

impl GenerationStats {
    fn measure<B: GenomeBase>(
        base: &B,
        generation: usize,
        population: &[Sequence<B::Gene>],
        objective: Objective,
    ) -> Self {
        let mut best = f64::NAN;
        let mut worst = f64::NAN;
        let mut sum = 0.0;
        for seq in population {
            let f = base.fitness(seq);
            sum += f;
            if best.is_nan() || objective.is_better(f, best) {
                best = f;
            }
            if worst.is_nan() || objective.is_better(worst, f) {
                worst = f;
            }
        }
        let mean = if population.is_empty() {
            f64::NAN
        } else {
            sum / population.len() as f64
        };
        Self {
            generation,
            size: population.len(),
            best,
            mean,
            worst,
        }
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Individuals pushed to the sink.
    pub delivered: usize,

    /// Seed of the engine; replaying it reproduces the run.
    pub seed: u64,

    /// Per-generation statistics, empty unless
    /// [`PipelineConfig::track_history`] is set.
    pub history: Vec<GenerationStats>,
}

/// A generational loop over an ordered list of stages.
///
/// # State machine
///
/// The engine keeps two buffers. The source is copied into the active
/// buffer, then every iteration runs each stage in declaration order: the
/// stage reads the active buffer and fills the other one, the vacated
/// buffer is disposed and the two swap. After the last stage the
/// generation counter is incremented and handed to the [`Terminator`]
/// together with the active buffer. When it signals stop, every sequence of
/// the active buffer is pushed to the sink.
///
/// # Usage
///
/// ```
/// use u_evolve::crossover::OrderCrossover;
/// use u_evolve::genome::{Genome, GenomeBase};
/// use u_evolve::mutation::SingleSwap;
/// use u_evolve::pipeline::{
///     CrossoverStage, MaxGenerations, MutationStage, Pipeline, PipelineConfig,
///     SelectionStage, SurvivorCount,
/// };
/// use u_evolve::selection::Fittest;
///
/// // Reward genes that sit at their own index.
/// let base = Genome::new(|g: &[usize]| {
///     g.iter().enumerate().filter(|&(i, &v)| i == v).count() as f64
/// });
/// let source: Vec<_> = (0..6)
///     .map(|k| base.from_genes((0..8).map(|i| (i + k) % 8).collect()))
///     .collect();
///
/// let pipeline = Pipeline::new(base)
///     .with_config(PipelineConfig::reproducible(42))
///     .then(SelectionStage::new(Fittest::new(), SurvivorCount::Fixed(4)).unwrap())
///     .then(CrossoverStage::new(OrderCrossover))
///     .then(MutationStage::new(SingleSwap, 20).unwrap());
///
/// let mut sink = Vec::new();
/// let report = pipeline.run(&source, &mut MaxGenerations(5), &mut sink).unwrap();
/// assert_eq!(report.generations, 5);
/// assert_eq!(sink.len(), 6);
/// ```
pub struct Pipeline<B: GenomeBase> {
    base: B,
    elements: Vec<Box<dyn PipelineElement<B>>>,
    config: PipelineConfig,
}

impl<B: GenomeBase> Pipeline<B> {
    /// Creates an empty pipeline with the default configuration.
    pub fn new(base: B) -> Self {
        Self {
            base,
            elements: Vec::new(),
            config: PipelineConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Appends a stage.
    pub fn then<E: PipelineElement<B> + 'static>(mut self, element: E) -> Self {
        self.elements.push(Box::new(element));
        self
    }

    /// Appends an already boxed stage.
    pub fn push(&mut self, element: Box<dyn PipelineElement<B>>) {
        self.elements.push(element);
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Runs the loop until `terminator` signals stop.
    pub fn run<P, T, K>(&self, source: &P, terminator: &mut T, sink: &mut K) -> Result<PipelineReport>
    where
        P: Population<B::Gene> + ?Sized,
        T: Terminator<B> + ?Sized,
        K: Sink<Sequence<B::Gene>> + ?Sized,
    {
        self.run_with_cancel(source, terminator, sink, None)
    }

    /// Runs the loop with an optional cancellation token.
    ///
    /// The flag is checked after every generation's terminator call. A
    /// cancelled run still delivers its active buffer to the sink.
    ///
    /// A failing stage aborts the run; nothing is pushed to the sink.
    pub fn run_with_cancel<P, T, K>(
        &self,
        source: &P,
        terminator: &mut T,
        sink: &mut K,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PipelineReport>
    where
        P: Population<B::Gene> + ?Sized,
        T: Terminator<B> + ?Sized,
        K: Sink<Sequence<B::Gene>> + ?Sized,
    {
        self.config.validate()?;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);
        debug!(
            "pipeline start: {} stages, {} individuals, seed {}",
            self.elements.len(),
            source.size(),
            seed
        );

        let mut active: Vec<Sequence<B::Gene>> = source
            .members()
            .map(|s| self.base.copy(s))
            .collect::<Result<_>>()?;
        let mut spare: Vec<Sequence<B::Gene>> = Vec::with_capacity(active.len());
        let mut history = Vec::new();
        let mut generation = 0;
        let mut cancelled = false;

        loop {
            for element in &self.elements {
                trace!(
                    "generation {}: {} on {} individuals",
                    generation + 1,
                    element.name(),
                    active.len()
                );
                let mut env = StageEnv {
                    base: &self.base,
                    rng: &mut rng,
                    parallel: self.config.parallel,
                };
                element.apply(&mut env, &active, &mut spare)?;
                for seq in active.drain(..) {
                    self.base.dispose(seq);
                }
                std::mem::swap(&mut active, &mut spare);
            }
            generation += 1;

            if self.config.track_history || log::log_enabled!(log::Level::Debug) {
                let stats = GenerationStats::measure(&self.base, generation, &active, self.config.objective);
                debug!(
                    "generation {}: size={} best={} mean={}",
                    stats.generation, stats.size, stats.best, stats.mean
                );
                if self.config.track_history {
                    history.push(stats);
                }
            }

            if terminator.should_stop(&self.base, generation, &active) {
                break;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
        }

        let delivered = active.len();
        for seq in active {
            sink.push(seq);
        }
        if cancelled {
            info!("pipeline cancelled after {generation} generations, {delivered} delivered");
        } else {
            info!("pipeline finished after {generation} generations, {delivered} delivered");
        }

        Ok(PipelineReport {
            generations: generation,
            cancelled,
            delivered,
            seed,
            history,
        })
    }
}

impl<B: GenomeBase + fmt::Debug> fmt::Debug for Pipeline<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.elements.iter().map(|e| e.name()).collect();
        f.debug_struct("Pipeline")
            .field("base", &self.base)
            .field("elements", &names)
            .field("config", &self.config)
            .finish()
    }
}
