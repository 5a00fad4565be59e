//! Tournament selection: the single-round [`Tournament`] and the
//! two-round [`DoubleTournament`].

use super::{nothing_to_select, Objective, Selector};
use crate::error::{check_percent, EvoError, Result};
use crate::random::RandomSource;

/// Draws a uniform gate in `[1, 100]` and reports whether it passes `p`.
fn gate<R: RandomSource + ?Sized>(p: u32, rng: &mut R) -> bool {
    rng.uniform_int(1, 100) <= p as usize
}

fn check_size(len: usize, opponents: usize) -> Result<()> {
    if len <= opponents {
        Err(EvoError::PopulationTooSmall {
            size: len,
            required: opponents,
        })
    } else {
        Ok(())
    }
}

/// Probabilistic tournament selection, with replacement.
///
/// Each of the `count` rounds draws a candidate, then for every one of the
/// `opponents` draws an opponent index followed by a gate in `[1, 100]`.
/// When the gate passes (`draw <= probability`) and the opponent is
/// strictly better than the current best, the opponent becomes the best.
/// The round's best is selected.
///
/// With `probability = 100` this is the classic deterministic tournament of
/// size `opponents + 1`.
///
/// # Complexity
/// O(count · opponents)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tournament {
    opponents: usize,
    probability: u32,
    objective: Objective,
}

impl Tournament {
    /// Fails with [`EvoError::InvalidProbability`] unless `probability` is
    /// in `[1, 100]`.
    pub fn new(opponents: usize, probability: u32) -> Result<Self> {
        Ok(Self {
            opponents,
            probability: check_percent(probability)?,
            objective: Objective::default(),
        })
    }

    /// Replaces the objective used to compare opponents.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    pub fn opponents(&self) -> usize {
        self.opponents
    }

    pub fn probability(&self) -> u32 {
        self.probability
    }
}

impl Default for Tournament {
    fn default() -> Self {
        Self {
            opponents: 2,
            probability: 100,
            objective: Objective::default(),
        }
    }
}

impl Selector for Tournament {
    fn name(&self) -> &'static str {
        "tournament"
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
        check_size(fitness.len(), self.opponents)?;
        let last = fitness.len() - 1;

        let mut selected = Vec::with_capacity(count);
        for _ in 0..count {
            let mut best = rng.uniform_int(0, last);
            for _ in 0..self.opponents {
                let opponent = rng.uniform_int(0, last);
                if gate(self.probability, rng) && self.objective.is_better(fitness[opponent], fitness[best]) {
                    best = opponent;
                }
            }
            selected.push(best);
        }
        Ok(selected)
    }
}

/// Double tournament: candidates ranked by tournament wins.
///
/// Draws `count` candidates uniformly. Each meets `opponents` random
/// opponents; a meeting is a win when its gate passes and the candidate is
/// not worse than the opponent. Candidates are returned by descending win
/// count, drawing order breaking ties.
///
/// # Complexity
/// O(count · opponents + count log count)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoubleTournament {
    opponents: usize,
    probability: u32,
    objective: Objective,
}

impl DoubleTournament {
    /// Fails unless `probability` is in `[1, 100]`.
    pub fn new(opponents: usize, probability: u32) -> Result<Self> {
        Ok(Self {
            opponents,
            probability: check_percent(probability)?,
            objective: Objective::default(),
        })
    }

    /// Replaces the objective used to compare opponents.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }
}

impl Selector for DoubleTournament {
    fn name(&self) -> &'static str {
        "double-tournament"
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
        check_size(fitness.len(), self.opponents)?;
        let last = fitness.len() - 1;

        let mut scored: Vec<(usize, usize)> = Vec::with_capacity(count);
        for _ in 0..count {
            let candidate = rng.uniform_int(0, last);
            let mut wins = 0;
            for _ in 0..self.opponents {
                let opponent = rng.uniform_int(0, last);
                if gate(self.probability, rng) && !self.objective.is_better(fitness[opponent], fitness[candidate]) {
                    wins += 1;
                }
            }
            scored.push((candidate, wins));
        }
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(scored.into_iter().map(|(i, _)| i).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{create_rng, ScriptedSource};

    #[test]
    fn test_tournament_scripted_round() {
        // Candidate 0; opponent 2 gated out (60 > 50); opponent 1 passes.
        let mut src = ScriptedSource::new([0, 2, 60, 1, 10]);
        let t = Tournament::new(2, 50).unwrap();
        let picked = t.select_by_fitness(&[1.0, 5.0, 9.0], 1, &mut src).unwrap();
        assert_eq!(picked, vec![1]);
        assert_eq!(src.remaining_ints(), 0);
    }

    #[test]
    fn test_tournament_ignores_equal_opponent() {
        let mut src = ScriptedSource::new([0, 1, 1]);
        let t = Tournament::new(1, 100).unwrap();
        let picked = t.select_by_fitness(&[4.0, 4.0], 1, &mut src).unwrap();
        assert_eq!(picked, vec![0]);
    }

    #[test]
    fn test_tournament_minimize() {
        let mut src = ScriptedSource::new([0, 1, 1]);
        let t = Tournament::new(1, 100).unwrap().with_objective(Objective::Minimize);
        let picked = t.select_by_fitness(&[4.0, 2.0], 1, &mut src).unwrap();
        assert_eq!(picked, vec![1]);
    }

    #[test]
    fn test_tournament_favors_best() {
        let fitness = [10.0, 5.0, 1.0, 8.0];
        let mut rng = create_rng(42);
        let t = Tournament::new(3, 100).unwrap();
        let picked = t.select_by_fitness(&fitness, 10_000, &mut rng).unwrap();
        let mut counts = [0u32; 4];
        for i in picked {
            counts[i] += 1;
        }
        assert!(counts[0] > 6000, "expected best to dominate, got {counts:?}");
    }

    #[test]
    fn test_tournament_zero_opponents_is_uniform() {
        let mut rng = create_rng(42);
        let t = Tournament::new(0, 100).unwrap();
        let picked = t.select_by_fitness(&[10.0, 5.0, 1.0, 8.0], 10_000, &mut rng).unwrap();
        let mut counts = [0u32; 4];
        for i in picked {
            counts[i] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_tournament_population_too_small() {
        let mut rng = create_rng(1);
        let t = Tournament::new(3, 90).unwrap();
        assert_eq!(
            t.select_by_fitness(&[1.0, 2.0, 3.0], 1, &mut rng),
            Err(EvoError::PopulationTooSmall { size: 3, required: 3 })
        );
    }

    #[test]
    fn test_tournament_rejects_probability() {
        assert_eq!(Tournament::new(2, 0), Err(EvoError::InvalidProbability(0)));
        assert_eq!(Tournament::new(2, 101), Err(EvoError::InvalidProbability(101)));
    }

    #[test]
    fn test_double_tournament_orders_by_wins() {
        // Candidate 2 (fitness 1.0) loses both meetings, candidate 0 (9.0)
        // wins both.
        let mut src = ScriptedSource::new([2, 0, 1, 1, 1, 0, 1, 1, 1, 2]);
        let t = DoubleTournament::new(2, 100).unwrap();
        let picked = t.select_by_fitness(&[9.0, 5.0, 1.0], 2, &mut src).unwrap();
        assert_eq!(picked, vec![0, 2]);
        assert_eq!(src.remaining_ints(), 0);
    }

    #[test]
    fn test_double_tournament_ties_keep_draw_order() {
        let mut src = ScriptedSource::new([1, 0, 1, 0, 1, 1]);
        let t = DoubleTournament::new(1, 100).unwrap();
        let picked = t.select_by_fitness(&[3.0, 3.0], 2, &mut src).unwrap();
        assert_eq!(picked, vec![1, 0]);
    }

    #[test]
    fn test_double_tournament_bounds() {
        let mut rng = create_rng(9);
        let t = DoubleTournament::new(2, 75).unwrap();
        let picked = t.select_by_fitness(&[1.0, 2.0, 3.0, 4.0, 5.0], 50, &mut rng).unwrap();
        assert_eq!(picked.len(), 50);
        assert!(picked.iter().all(|&i| i < 5));
    }
}
