//! Truncation selection.

use super::{nothing_to_select, Objective, Selector};
use crate::error::{EvoError, Result};
use crate::random::RandomSource;

/// Truncation selection: the `count` best individuals, best first.
///
/// Ties keep index order. Consumes no random draws.
///
/// # Complexity
/// O(n log n)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fittest {
    pub objective: Objective,
}

impl Fittest {
    /// Highest fitness first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest fitness first.
    pub fn minimizing() -> Self {
        Self::with_objective(Objective::Minimize)
    }

    /// Best under `objective` first.
    pub fn with_objective(objective: Objective) -> Self {
        Self { objective }
    }
}

impl Selector for Fittest {
    fn name(&self) -> &'static str {
        "fittest"
    }

    fn select_by_fitness<R: RandomSource + ?Sized>(
        &self,
        fitness: &[f64],
        count: usize,
        _rng: &mut R,
    ) -> Result<Vec<usize>> {
        if nothing_to_select(fitness.len(), count)? {
            return Ok(Vec::new());
        }
        if count > fitness.len() {
            return Err(EvoError::CountExceedsPopulation {
                requested: count,
                available: fitness.len(),
            });
        }
        let mut order: Vec<usize> = (0..fitness.len()).collect();
        order.sort_by(|&i, &j| self.objective.compare(fitness[i], fitness[j]));
        order.truncate(count);
        Ok(order)
    }
}
