//! Selection operators.
//!
//! A selector picks `count` individuals of a population by fitness, with or
//! without replacement depending on the scheme. Fitness is evaluated once
//! per call into a plain vector and every scheme works from that vector
//! ([`Selector::select_by_fitness`]), so the same operator serves index
//! selection ([`Selector::select_indices`], [`Selector::select_into`]) and
//! sequence selection ([`Selector::select_sequences`], which copies).
//!
//! # Schemes
//!
//! - [`Fittest`]: deterministic truncation
//! - [`Tournament`], [`DoubleTournament`]: probabilistic tournaments
//! - [`Roulette`], [`StochasticUniversal`]: fitness proportional
//! - [`Rank`]: linear ranking
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection Algorithm"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

mod fittest;
mod proportional;
mod rank;
mod tournament;

pub use fittest::Fittest;
pub use proportional::{Roulette, StochasticUniversal};
pub use rank::Rank;
pub use tournament::{DoubleTournament, Tournament};

use crate::error::{EvoError, Result};
use crate::genome::{GenomeBase, Sequence};
use crate::population::{Population, Sink};
use crate::random::RandomSource;
use std::cmp::Ordering;

/// Direction of optimisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    /// Higher fitness is better.
    #[default]
    Maximize,
    /// Lower fitness is better.
    Minimize,
}

impl Objective {
    /// Whether `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Objective::Maximize => a > b,
            Objective::Minimize => a < b,
        }
    }

    /// Orders better values first. Incomparable values are equal.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        let ord = match self {
            Objective::Maximize => b.partial_cmp(&a),
            Objective::Minimize => a.partial_cmp(&b),
        };
        ord.unwrap_or(Ordering::Equal)
    }

    /// The better of two values.
    pub fn best(self, a: f64, b: f64) -> f64 {
        if self.is_better(b, a) {
            b
        } else {
            a
        }
    }
}

/// A selection scheme.
pub trait Selector {
    /// Short scheme name used in logs.
    fn name(&self) -> &'static str;

    /// Selects `count` indices into `fitness`.
    ///
    /// Every returned index lies in `[0, fitness.len())`. An empty input
    /// with `count > 0` fails with [`EvoError::EmptyPopulation`].
    fn select_by_fitness<R: RandomSource + ?Sized>(
        &self,
        fitness: &[f64],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>>;

    /// Evaluates `population` once and selects `count` indices.
    fn select_indices<B, P, R>(
        &self,
        base: &B,
        population: &P,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>>
    where
        B: GenomeBase,
        P: Population<B::Gene> + ?Sized,
        R: RandomSource + ?Sized,
    {
        let fitness: Vec<f64> = population.members().map(|s| base.fitness(s)).collect();
        self.select_by_fitness(&fitness, count, rng)
    }

    /// Selects `count` indices and pushes them to `sink`.
    fn select_into<B, P, R, K>(
        &self,
        base: &B,
        population: &P,
        count: usize,
        rng: &mut R,
        sink: &mut K,
    ) -> Result<usize>
    where
        B: GenomeBase,
        P: Population<B::Gene> + ?Sized,
        R: RandomSource + ?Sized,
        K: Sink<usize> + ?Sized,
    {
        let indices = self.select_indices(base, population, count, rng)?;
        let n = indices.len();
        for i in indices {
            sink.push(i);
        }
        Ok(n)
    }

    /// Selects `count` individuals and pushes copies of them to `sink`.
    ///
    /// The population keeps ownership of its members. All copies are made
    /// before the first push.
    fn select_sequences<B, P, R, K>(
        &self,
        base: &B,
        population: &P,
        count: usize,
        rng: &mut R,
        sink: &mut K,
    ) -> Result<usize>
    where
        B: GenomeBase,
        P: Population<B::Gene> + ?Sized,
        R: RandomSource + ?Sized,
        K: Sink<Sequence<B::Gene>> + ?Sized,
    {
        let indices = self.select_indices(base, population, count, rng)?;
        let copies = indices
            .iter()
            .map(|&i| base.copy(population.at(i)))
            .collect::<Result<Vec<_>>>()?;
        let n = copies.len();
        for seq in copies {
            sink.push(seq);
        }
        Ok(n)
    }
}

/// `Ok(true)` when the call has nothing to do.
pub(crate) fn nothing_to_select(len: usize, count: usize) -> Result<bool> {
    if count == 0 {
        Ok(true)
    } else if len == 0 {
        Err(EvoError::EmptyPopulation)
    } else {
        Ok(false)
    }
}
