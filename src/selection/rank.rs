//! Linear rank selection.

use super::proportional::Wheel;
use super::{nothing_to_select, Objective, Selector};
use crate::error::Result;
use crate::random::RandomSource;

/// Rank-based selection using linear ranking, with replacement.
///
/// Individuals are sorted best first and the individual at rank `r` gets
/// weight `n - r`, regardless of the fitness spread. This avoids the
/// scaling problems of roulette wheel selection and accepts negative
/// fitness as is.
///
/// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
/// Algorithms"
///
/// # Complexity
/// O(n log n + count · log n)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rank {
    pub objective: Objective,
}

impl Rank {
    /// Ranks by highest fitness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranks best-first under `objective`.
    pub fn with_objective(objective: Objective) -> Self {
        Self { objective }
    }
}

impl Selector for Rank {
    fn name(&self) -> &'static str {
        "rank"
    }

    fn select_by_fitness<R: RandomSource + ?Sized>(
        &self,
        fitness: &[f64],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        if nothing_to_select(fitness.len(), count)? {
            return Ok(Vec::new());
        }
        let n = fitness.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| self.objective.compare(fitness[i], fitness[j]));

        let mut weights = vec![0.0; n];
        for (rank, &i) in order.iter().enumerate() {
            weights[i] = (n - rank) as f64;
        }
        Ok(Wheel::from_weights(&weights)?.spin(count, rng))
    }
}
