//! Termination conditions.
//!
//! After every generation the engine asks its [`Terminator`] whether to
//! stop, passing the 1-based generation number and the active buffer.
//! Terminators may keep state between calls.

use crate::genome::{GenomeBase, Sequence};
use crate::selection::Objective;
use std::fmt;
use std::time::{Duration, Instant};

/// Decides when a pipeline run ends.
pub trait Terminator<B: GenomeBase> {
    /// `true` to stop after `generation`.
    fn should_stop(&mut self, base: &B, generation: usize, population: &[Sequence<B::Gene>]) -> bool;
}

/// Stops once `generation` reaches the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxGenerations(pub usize);

impl<B: GenomeBase> Terminator<B> for MaxGenerations {
    fn should_stop(&mut self, _base: &B, generation: usize, _population: &[Sequence<B::Gene>]) -> bool {
        generation >= self.0
    }
}

/// Stops once the wall-clock limit has elapsed.
///
/// The clock starts on the first call, i.e. after the first generation.
#[derive(Debug, Clone, Copy)]
pub struct Timeout {
    limit: Duration,
    started: Option<Instant>,
}

impl Timeout {
    pub fn new(limit: Duration) -> Self {
        Self { limit, started: None }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl<B: GenomeBase> Terminator<B> for Timeout {
    fn should_stop(&mut self, _base: &B, _generation: usize, _population: &[Sequence<B::Gene>]) -> bool {
        let started = *self.started.get_or_insert_with(Instant::now);
        started.elapsed() >= self.limit
    }
}

/// Stops once any individual reaches the target fitness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessTarget {
    pub target: f64,
    pub objective: Objective,
}

impl FitnessTarget {
    /// Target for a maximisation run: stop at `fitness >= target`.
    pub fn at_least(target: f64) -> Self {
        Self {
            target,
            objective: Objective::Maximize,
        }
    }

    /// Target for a minimisation run: stop at `fitness <= target`.
    pub fn at_most(target: f64) -> Self {
        Self {
            target,
            objective: Objective::Minimize,
        }
    }

    fn reached(&self, fitness: f64) -> bool {
        match self.objective {
            Objective::Maximize => fitness >= self.target,
            Objective::Minimize => fitness <= self.target,
        }
    }
}

impl<B: GenomeBase> Terminator<B> for FitnessTarget {
    fn should_stop(&mut self, base: &B, _generation: usize, population: &[Sequence<B::Gene>]) -> bool {
        population.iter().any(|s| self.reached(base.fitness(s)))
    }
}

/// Stops after `limit` consecutive generations without a strictly better
/// best fitness. A limit of 0 never stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stagnation {
    limit: usize,
    objective: Objective,
    best: Option<f64>,
    stale: usize,
}

impl Stagnation {
    pub fn new(limit: usize, objective: Objective) -> Self {
        Self {
            limit,
            objective,
            best: None,
            stale: 0,
        }
    }

    /// Generations since the last improvement.
    pub fn stale(&self) -> usize {
        self.stale
    }
}

impl<B: GenomeBase> Terminator<B> for Stagnation {
    fn should_stop(&mut self, base: &B, _generation: usize, population: &[Sequence<B::Gene>]) -> bool {
        let generation_best = population
            .iter()
            .map(|s| base.fitness(s))
            .reduce(|a, b| self.objective.best(a, b));

        match (self.best, generation_best) {
            (_, None) => self.stale += 1,
            (None, Some(f)) => self.best = Some(f),
            (Some(best), Some(f)) if self.objective.is_better(f, best) => {
                self.best = Some(f);
                self.stale = 0;
            }
            _ => self.stale += 1,
        }
        self.limit > 0 && self.stale >= self.limit
    }
}

/// Stops as soon as any member does. Every member sees every generation.
pub struct AnyOf<B: GenomeBase> {
    members: Vec<Box<dyn Terminator<B>>>,
}

impl<B: GenomeBase> AnyOf<B> {
    pub fn new() -> Self {
        Self { members: Vec::new() }
    }

    /// Adds a member.
    pub fn or<T: Terminator<B> + 'static>(mut self, terminator: T) -> Self {
        self.members.push(Box::new(terminator));
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<B: GenomeBase> Default for AnyOf<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: GenomeBase> fmt::Debug for AnyOf<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyOf").field("members", &self.members.len()).finish()
    }
}

impl<B: GenomeBase> Terminator<B> for AnyOf<B> {
    fn should_stop(&mut self, base: &B, generation: usize, population: &[Sequence<B::Gene>]) -> bool {
        self.members
            .iter_mut()
            .fold(false, |stop, t| t.should_stop(base, generation, population) || stop)
    }
}

/// A closure terminator, see [`stop_when`].
pub struct FnTerminator<F>(F);

impl<F> fmt::Debug for FnTerminator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTerminator")
    }
}

/// Wraps a closure receiving the generation and the active buffer.
///
/// ```
/// use u_evolve::genome::{Genome, GenomeBase, Sequence};
/// use u_evolve::pipeline::{stop_when, Terminator};
///
/// let base = Genome::new(|g: &[u8]| g.len() as f64);
/// let mut t = stop_when(|generation: usize, _pop: &[Sequence<u8>]| generation == 3);
/// assert!(!t.should_stop(&base, 2, &[]));
/// assert!(t.should_stop(&base, 3, &[]));
/// ```
pub fn stop_when<G, F>(predicate: F) -> FnTerminator<F>
where
    F: FnMut(usize, &[Sequence<G>]) -> bool,
{
    FnTerminator(predicate)
}

impl<B, F> Terminator<B> for FnTerminator<F>
where
    B: GenomeBase,
    F: FnMut(usize, &[Sequence<B::Gene>]) -> bool,
{
    fn should_stop(&mut self, _base: &B, generation: usize, population: &[Sequence<B::Gene>]) -> bool {
        (self.0)(generation, population)
    }
}
