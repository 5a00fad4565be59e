//! Random number sources consumed by the operators.
//!
//! Operators never own an engine. They draw from any [`RandomSource`], which
//! only promises uniform values over a closed interval, optionally distinct.
//! Every [`rand::Rng`] is a `RandomSource`; [`ScriptedSource`] replays fixed
//! draws so a specific random path can be pinned down.

use crate::error::{EvoError, Result};
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Engine used by the pipeline and for per-task seeding.
pub type EvoRng = rand::rngs::StdRng;

/// Creates a seeded [`EvoRng`].
pub fn create_rng(seed: u64) -> EvoRng {
    EvoRng::seed_from_u64(seed)
}

/// Uniform random draws over closed intervals.
///
/// All bounds are inclusive. Passing `min > max` is a contract violation
/// and panics.
pub trait RandomSource {
    /// Uniform integer in `[min, max]`.
    fn uniform_int(&mut self, min: usize, max: usize) -> usize;

    /// Uniform real in `[min, max]`.
    fn uniform_real(&mut self, min: f64, max: f64) -> f64;

    /// Fills `buf` with independent uniform integers in `[min, max]`.
    fn uniform_int_seq(&mut self, min: usize, max: usize, buf: &mut [usize]) {
        for slot in buf.iter_mut() {
            *slot = self.uniform_int(min, max);
        }
    }

    /// Fills `buf` with pairwise distinct uniform integers in `[min, max]`.
    ///
    /// Fails with [`EvoError::DistinctRange`] when `buf` is longer than the
    /// interval.
    fn uniform_distinct_int_seq(&mut self, min: usize, max: usize, buf: &mut [usize]) -> Result<()> {
        assert!(min <= max, "empty interval [{min}, {max}]");
        let available = (max - min).saturating_add(1);
        if buf.len() > available {
            return Err(EvoError::DistinctRange {
                requested: buf.len(),
                available,
            });
        }
        // Partial Fisher-Yates over a virtual array; only touched slots are stored.
        let mut swapped: Vec<(usize, usize)> = Vec::with_capacity(buf.len());
        let lookup = |swapped: &[(usize, usize)], k: usize| {
            swapped
                .iter()
                .rev()
                .find(|&&(key, _)| key == k)
                .map_or(k, |&(_, v)| v)
        };
        for (i, slot) in buf.iter_mut().enumerate() {
            let j = self.uniform_int(i, available - 1);
            let vi = lookup(&swapped, i);
            let vj = lookup(&swapped, j);
            swapped.push((j, vi));
            swapped.push((i, vj));
            *slot = min + vj;
        }
        Ok(())
    }

    /// Fills `buf` with independent uniform reals in `[min, max]`.
    fn uniform_real_seq(&mut self, min: f64, max: f64, buf: &mut [f64]) {
        for slot in buf.iter_mut() {
            *slot = self.uniform_real(min, max);
        }
    }

    /// Fills `buf` with pairwise distinct uniform reals in `[min, max]`.
    ///
    /// A degenerate interval holds exactly one value, so asking it for more
    /// than one fails with [`EvoError::DistinctRange`].
    fn uniform_distinct_real_seq(&mut self, min: f64, max: f64, buf: &mut [f64]) -> Result<()> {
        assert!(min <= max, "empty interval [{min}, {max}]");
        if min == max && buf.len() > 1 {
            return Err(EvoError::DistinctRange {
                requested: buf.len(),
                available: 1,
            });
        }
        for i in 0..buf.len() {
            loop {
                let v = self.uniform_real(min, max);
                if !buf[..i].contains(&v) {
                    buf[i] = v;
                    break;
                }
            }
        }
        Ok(())
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform_int(&mut self, min: usize, max: usize) -> usize {
        assert!(min <= max, "empty interval [{min}, {max}]");
        self.random_range(min..=max)
    }

    fn uniform_real(&mut self, min: f64, max: f64) -> f64 {
        assert!(min <= max, "empty interval [{min}, {max}]");
        if min == max {
            return min;
        }
        self.random_range(min..=max)
    }

    fn uniform_distinct_int_seq(&mut self, min: usize, max: usize, buf: &mut [usize]) -> Result<()> {
        assert!(min <= max, "empty interval [{min}, {max}]");
        let available = (max - min).saturating_add(1);
        if buf.len() > available {
            return Err(EvoError::DistinctRange {
                requested: buf.len(),
                available,
            });
        }
        let picked = rand::seq::index::sample(self, available, buf.len());
        for (slot, offset) in buf.iter_mut().zip(picked.iter()) {
            *slot = min + offset;
        }
        Ok(())
    }
}

/// A [`RandomSource`] that replays a fixed script.
///
/// Integer and real draws come from separate queues. A scripted value outside
/// the requested interval, or an exhausted queue, panics: the script no
/// longer matches the code path being exercised.
///
/// ```
/// use u_evolve::random::{RandomSource, ScriptedSource};
///
/// let mut src = ScriptedSource::new([3, 1]);
/// assert_eq!(src.uniform_int(0, 5), 3);
/// assert_eq!(src.uniform_int(1, 2), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    ints: VecDeque<usize>,
    reals: VecDeque<f64>,
}

impl ScriptedSource {
    /// Creates a source replaying the given integer draws.
    pub fn new(ints: impl IntoIterator<Item = usize>) -> Self {
        Self {
            ints: ints.into_iter().collect(),
            reals: VecDeque::new(),
        }
    }

    /// Adds real-valued draws.
    pub fn with_reals(mut self, reals: impl IntoIterator<Item = f64>) -> Self {
        self.reals.extend(reals);
        self
    }

    /// Number of integer draws not yet consumed.
    pub fn remaining_ints(&self) -> usize {
        self.ints.len()
    }

    /// Number of real draws not yet consumed.
    pub fn remaining_reals(&self) -> usize {
        self.reals.len()
    }
}

impl RandomSource for ScriptedSource {
    fn uniform_int(&mut self, min: usize, max: usize) -> usize {
        let v = self.ints.pop_front().expect("scripted integer draws exhausted");
        assert!(
            (min..=max).contains(&v),
            "scripted value {v} outside [{min}, {max}]"
        );
        v
    }

    fn uniform_real(&mut self, min: f64, max: f64) -> f64 {
        let v = self.reals.pop_front().expect("scripted real draws exhausted");
        assert!(
            (min..=max).contains(&v),
            "scripted value {v} outside [{min}, {max}]"
        );
        v
    }
}
