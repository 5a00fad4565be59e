//! Fitness-proportional selection over a cumulative weight table.

use super::{nothing_to_select, Objective, Selector};
use crate::error::{EvoError, Result};
use crate::random::RandomSource;

/// Cumulative weight table shared by the proportional schemes.
///
/// All-equal weights (all-zero included) make every individual equally
/// likely, so the table falls back to plain uniform index draws. The
/// fallback is decided before any total is used.
#[derive(Debug, Clone)]
pub(crate) struct Wheel {
    cumulative: Vec<f64>,
    last_positive: usize,
    uniform: bool,
}

impl Wheel {
    /// Builds the table from non-negative weights.
    pub(crate) fn from_weights(weights: &[f64]) -> Result<Self> {
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(EvoError::NonFiniteWeight);
        }
        if let Some((index, &value)) = weights.iter().enumerate().find(|&(_, &w)| w < 0.0) {
            return Err(EvoError::NegativeWeight { index, value });
        }
        let uniform = weights.windows(2).all(|w| w[0] == w[1]);

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for &w in weights {
            total += w;
            cumulative.push(total);
        }
        if !uniform && !total.is_finite() {
            return Err(EvoError::NonFiniteWeight);
        }
        let last_positive = weights.iter().rposition(|&w| w > 0.0).unwrap_or(0);
        Ok(Self {
            cumulative,
            last_positive,
            uniform,
        })
    }

    fn len(&self) -> usize {
        self.cumulative.len()
    }

    fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Slot whose cumulative interval contains `point`.
    ///
    /// Points at or past the total land on the last slot with a positive
    /// weight, so zero-weight slots are never hit.
    fn slot(&self, point: f64) -> usize {
        self.cumulative
            .partition_point(|&c| c <= point)
            .min(self.last_positive)
    }

    /// `count` independent spins: one draw in `[0, total]` each.
    pub(crate) fn spin<R: RandomSource + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<usize> {
        if self.uniform {
            return self.uniform_draws(count, rng);
        }
        let total = self.total();
        (0..count)
            .map(|_| self.slot(rng.uniform_real(0.0, total)))
            .collect()
    }

    /// One draw `u` in `[0, total / count)` and `count` evenly spaced
    /// pointers `u + k · step`.
    pub(crate) fn sweep<R: RandomSource + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<usize> {
        if self.uniform {
            return self.uniform_draws(count, rng);
        }
        let step = self.total() / count as f64;
        let mut start = rng.uniform_real(0.0, step);
        // The closed draw may hit `step` itself, which belongs to the next pointer.
        if start >= step {
            start = 0.0;
        }

        let mut selected = Vec::with_capacity(count);
        let mut slot = 0;
        for k in 0..count {
            let pointer = start + k as f64 * step;
            while slot < self.last_positive && self.cumulative[slot] <= pointer {
                slot += 1;
            }
            selected.push(slot);
        }
        selected
    }

    fn uniform_draws<R: RandomSource + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<usize> {
        let last = self.len() - 1;
        (0..count).map(|_| rng.uniform_int(0, last)).collect()
    }
}

/// Maps raw fitness to proportional weights.
///
/// With `align`, a negative minimum `m` shifts every value by `2·|m|`;
/// without it a negative value is an error. Under
/// [`Objective::Minimize`] the individuals are sorted ascending and the
/// weights handed out in reverse, so the lowest fitness receives the
/// largest weight.
pub(crate) fn proportional_weights(fitness: &[f64], align: bool, objective: Objective) -> Result<Vec<f64>> {
    if fitness.iter().any(|f| f.is_nan()) {
        return Err(EvoError::NonFiniteWeight);
    }
    let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
    let mut weights: Vec<f64> = if min < 0.0 {
        if !align {
            let index = fitness.iter().position(|&f| f < 0.0).unwrap_or(0);
            return Err(EvoError::NegativeWeight {
                index,
                value: fitness[index],
            });
        }
        let shift = 2.0 * min.abs();
        fitness.iter().map(|&f| f + shift).collect()
    } else {
        fitness.to_vec()
    };

    if objective == Objective::Minimize {
        let mut order: Vec<usize> = (0..weights.len()).collect();
        order.sort_by(|&i, &j| Objective::Minimize.compare(weights[i], weights[j]));
        let sorted: Vec<f64> = order.iter().map(|&i| weights[i]).collect();
        for (rank, &i) in order.iter().enumerate() {
            weights[i] = sorted[sorted.len() - 1 - rank];
        }
    }
    Ok(weights)
}

/// Roulette-wheel (fitness proportional) selection, with replacement.
///
/// Probability of selection is proportional to the individual's weight.
/// Each of the `count` picks is an independent spin.
///
/// **Warning**: Susceptible to super-individual dominance when fitness
/// variance is high.
///
/// # Complexity
/// O(n + count · log n)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roulette {
    /// Shift negative fitness into the positive range.
    pub align: bool,
    pub objective: Objective,
}

impl Roulette {
    /// Maximising wheel without alignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles shifting of negative fitness.
    pub fn with_alignment(mut self, align: bool) -> Self {
        self.align = align;
        self
    }

    /// Under `Minimize`, lower fitness gets the larger slice.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }
}

impl Selector for Roulette {
    fn name(&self) -> &'static str {
        "roulette"
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
        let weights = proportional_weights(fitness, self.align, self.objective)?;
        Ok(Wheel::from_weights(&weights)?.spin(count, rng))
    }
}

/// Stochastic universal sampling (Baker, 1987).
///
/// Same weights as [`Roulette`], but a single draw places `count` evenly
/// spaced pointers on the wheel. Every individual is picked within one of
/// its expected count, and a call consumes one random draw.
///
/// # Complexity
/// O(n + count)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StochasticUniversal {
    pub align: bool,
    pub objective: Objective,
}

impl StochasticUniversal {
    /// Maximising wheel without alignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles shifting of negative fitness.
    pub fn with_alignment(mut self, align: bool) -> Self {
        self.align = align;
        self
    }

    /// Under `Minimize`, lower fitness gets the larger slice.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }
}

impl Selector for StochasticUniversal {
    fn name(&self) -> &'static str {
        "stochastic-universal"
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
        let weights = proportional_weights(fitness, self.align, self.objective)?;
        Ok(Wheel::from_weights(&weights)?.sweep(count, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{create_rng, ScriptedSource};

    #[test]
    fn test_wheel_slots() {
        let wheel = Wheel::from_weights(&[1.0, 0.0, 3.0, 0.0]).unwrap();
        assert_eq!(wheel.slot(0.0), 0);
        assert_eq!(wheel.slot(0.99), 0);
        // Boundary skips the zero-weight slot.
        assert_eq!(wheel.slot(1.0), 2);
        assert_eq!(wheel.slot(4.0), 2);
    }

    #[test]
    fn test_roulette_scripted_spins() {
        let mut src = ScriptedSource::new([]).with_reals([0.5, 1.5, 6.0]);
        let picked = Roulette::new()
            .select_by_fitness(&[1.0, 2.0, 3.0], 3, &mut src)
            .unwrap();
        assert_eq!(picked, vec![0, 1, 2]);
    }

    #[test]
    fn test_roulette_favors_heavy() {
        let mut rng = create_rng(42);
        let picked = Roulette::new()
            .select_by_fitness(&[1.0, 50.0, 100.0, 80.0], 10_000, &mut rng)
            .unwrap();
        let mut counts = [0u32; 4];
        for i in picked {
            counts[i] += 1;
        }
        assert!(
            counts[2] > counts[0],
            "heaviest should be selected more often: {counts:?}"
        );
    }

    #[test]
    fn test_roulette_minimize_reverses_weights() {
        // Ascending order 1.0, 2.0, 5.0 receives weights 5, 2, 1.
        let weights = proportional_weights(&[5.0, 1.0, 2.0], false, Objective::Minimize).unwrap();
        assert_eq!(weights, vec![1.0, 5.0, 2.0]);
    }

    #[test]
    fn test_alignment_shifts_negative() {
        let weights = proportional_weights(&[-2.0, 0.0, 3.0], true, Objective::Maximize).unwrap();
        assert_eq!(weights, vec![2.0, 4.0, 7.0]);
    }

    #[test]
    fn test_negative_without_alignment() {
        let mut rng = create_rng(1);
        assert_eq!(
            Roulette::new().select_by_fitness(&[1.0, -3.0], 1, &mut rng),
            Err(EvoError::NegativeWeight { index: 1, value: -3.0 })
        );
    }

    #[test]
    fn test_all_zero_is_uniform() {
        let mut src = ScriptedSource::new([2, 0, 1]);
        let picked = Roulette::new()
            .select_by_fitness(&[0.0, 0.0, 0.0], 3, &mut src)
            .unwrap();
        assert_eq!(picked, vec![2, 0, 1]);

        let mut src = ScriptedSource::new([1]);
        let picked = StochasticUniversal::new()
            .select_by_fitness(&[0.0, 0.0], 1, &mut src)
            .unwrap();
        assert_eq!(picked, vec![1]);
    }

    #[test]
    fn test_all_equal_after_alignment_is_uniform() {
        let mut rng = create_rng(5);
        let picked = Roulette::new()
            .with_alignment(true)
            .select_by_fitness(&[-4.0, -4.0, -4.0, -4.0], 8000, &mut rng)
            .unwrap();
        let mut counts = [0u32; 4];
        for i in picked {
            counts[i] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut rng = create_rng(1);
        assert_eq!(
            Roulette::new().select_by_fitness(&[1.0, f64::NAN], 1, &mut rng),
            Err(EvoError::NonFiniteWeight)
        );
        assert_eq!(
            Roulette::new().select_by_fitness(&[1.0, f64::INFINITY], 1, &mut rng),
            Err(EvoError::NonFiniteWeight)
        );
        assert_eq!(
            Roulette::new().select_by_fitness(&[f64::MAX, f64::MAX / 2.0], 1, &mut rng),
            Err(EvoError::NonFiniteWeight)
        );
    }

    #[test]
    fn test_sus_evenly_spaced() {
        // Total 10, four pointers at 0.5, 3.0, 5.5, 8.0.
        let mut src = ScriptedSource::new([]).with_reals([0.5]);
        let picked = StochasticUniversal::new()
            .select_by_fitness(&[1.0, 4.0, 0.0, 5.0], 4, &mut src)
            .unwrap();
        assert_eq!(picked, vec![0, 1, 3, 3]);
        assert_eq!(src.remaining_reals(), 0);
    }

    #[test]
    fn test_sus_draw_at_step_wraps_to_zero() {
        let mut src = ScriptedSource::new([]).with_reals([5.0]);
        let picked = StochasticUniversal::new()
            .select_by_fitness(&[5.0, 5.0, 0.0], 2, &mut src)
            .unwrap();
        assert_eq!(picked, vec![0, 1]);
    }

    #[test]
    fn test_sus_within_expected_counts() {
        let fitness = [1.0, 2.0, 3.0, 4.0];
        let mut rng = create_rng(3);
        for _ in 0..50 {
            let picked = StochasticUniversal::new()
                .select_by_fitness(&fitness, 10, &mut rng)
                .unwrap();
            let mut counts = [0usize; 4];
            for i in picked {
                counts[i] += 1;
            }
            // Expected counts are 1, 2, 3 and 4.
            for (k, &c) in counts.iter().enumerate() {
                let expected = k + 1;
                assert!(c + 1 >= expected && c <= expected + 1, "{counts:?}");
            }
        }
    }
}
