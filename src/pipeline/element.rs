//! Pipeline stages.
//!
//! A stage reads the active buffer and appends the next one. Stages own
//! their operator and parameters; the engine supplies the genome base, its
//! random engine and the parallelism flag through [`StageEnv`].
//!
//! Work that fans out (one task per individual or per pair) draws one seed
//! per task from the engine first, in task order, and every task draws from
//! its own [`EvoRng`]. Outputs are gathered in task order, so a seeded run
//! produces the same buffers with and without parallelism.

use crate::crossover::Crossover;
use crate::error::{check_percent, EvoError, Result};
use crate::genome::{GenomeBase, Sequence};
use crate::mutation::Mutation;
use crate::random::{create_rng, EvoRng, RandomSource};
use crate::selection::Selector;
use log::trace;
use rand::Rng;

/// Engine state handed to a stage.
pub struct StageEnv<'a, B> {
    pub base: &'a B,
    pub rng: &'a mut EvoRng,
    pub parallel: bool,
}

impl<B> StageEnv<'_, B> {
    /// Draws one task seed per unit of work.
    fn task_seeds(&mut self, tasks: usize) -> Vec<u64> {
        (0..tasks).map(|_| self.rng.random::<u64>()).collect()
    }
}

/// One stage of a generational loop.
pub trait PipelineElement<B: GenomeBase>: Send + Sync {
    /// Short stage name used in logs.
    fn name(&self) -> &'static str;

    /// Reads `input` and appends the stage's output to `output`.
    ///
    /// `input` stays owned by the engine, which disposes it afterwards.
    fn apply(
        &self,
        env: &mut StageEnv<'_, B>,
        input: &[Sequence<B::Gene>],
        output: &mut Vec<Sequence<B::Gene>>,
    ) -> Result<()>;
}

/// Runs `count` independent tasks, on the rayon pool when `parallel`.
///
/// Results come back in task order either way.
pub(crate) fn run_tasks<T, F>(parallel: bool, count: usize, task: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return (0..count).into_par_iter().map(task).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;
    (0..count).map(task).collect()
}

/// Fitness of every member of `population`, in order.
pub(crate) fn evaluate<B: GenomeBase>(base: &B, population: &[Sequence<B::Gene>], parallel: bool) -> Vec<f64> {
    run_tasks(parallel, population.len(), |i| base.fitness(&population[i]))
}

// ============================================================================
// Selection
// ============================================================================

/// How many individuals a [`SelectionStage`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurvivorCount {
    /// Exactly this many.
    Fixed(usize),
    /// The input size divided by this value, rounded down.
    Divide(usize),
}

impl SurvivorCount {
    /// Survivors for an input of `size` individuals.
    pub fn count(&self, size: usize) -> usize {
        match *self {
            SurvivorCount::Fixed(n) => n,
            SurvivorCount::Divide(d) => size / d,
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            SurvivorCount::Divide(0) => Err(EvoError::InvalidConfig(
                "survivor divisor must be at least 1".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Selection as a stage: evaluates the input, selects survivors and
/// appends copies of them.
#[derive(Debug, Clone)]
pub struct SelectionStage<S> {
    selector: S,
    survivors: SurvivorCount,
}

impl<S: Selector> SelectionStage<S> {
    /// Fails with [`EvoError::InvalidConfig`] on `SurvivorCount::Divide(0)`.
    pub fn new(selector: S, survivors: SurvivorCount) -> Result<Self> {
        survivors.validate()?;
        Ok(Self { selector, survivors })
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    pub fn survivors(&self) -> SurvivorCount {
        self.survivors
    }
}

impl<B, S> PipelineElement<B> for SelectionStage<S>
where
    B: GenomeBase,
    S: Selector + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.selector.name()
    }

    fn apply(
        &self,
        env: &mut StageEnv<'_, B>,
        input: &[Sequence<B::Gene>],
        output: &mut Vec<Sequence<B::Gene>>,
    ) -> Result<()> {
        let count = self.survivors.count(input.len());
        let fitness = evaluate(env.base, input, env.parallel);
        let picked = self.selector.select_by_fitness(&fitness, count, &mut *env.rng)?;
        trace!("{}: {} of {} selected", self.selector.name(), picked.len(), input.len());

        let copies = picked
            .iter()
            .map(|&i| env.base.copy(&input[i]))
            .collect::<Result<Vec<_>>>()?;
        output.extend(copies);
        Ok(())
    }
}

// ============================================================================
// Crossover
// ============================================================================

/// Crossover as a stage: recombines every unordered pair `i < j` of the
/// input, in lexicographic pair order.
///
/// `n` inputs yield `n·(n-1)/2` recombinations.
#[derive(Debug, Clone)]
pub struct CrossoverStage<C> {
    crossover: C,
}

impl<C> CrossoverStage<C> {
    pub fn new(crossover: C) -> Self {
        Self { crossover }
    }
}

impl<B, C> PipelineElement<B> for CrossoverStage<C>
where
    B: GenomeBase,
    C: Crossover<B::Gene> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.crossover.name()
    }

    fn apply(
        &self,
        env: &mut StageEnv<'_, B>,
        input: &[Sequence<B::Gene>],
        output: &mut Vec<Sequence<B::Gene>>,
    ) -> Result<()> {
        let n = input.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();
        let seeds = env.task_seeds(pairs.len());
        trace!("{}: {} pairs", self.crossover.name(), pairs.len());

        let base = env.base;
        let broods = run_tasks(env.parallel, pairs.len(), |t| {
            let (i, j) = pairs[t];
            let mut rng = create_rng(seeds[t]);
            self.crossover.recombine(base, &input[i], &input[j], &mut rng)
        });
        let mut children = Vec::with_capacity(pairs.len() * self.crossover.children());
        for brood in broods {
            children.extend(brood?);
        }
        output.extend(children);
        Ok(())
    }
}

// ============================================================================
// Mutation
// ============================================================================

/// Mutation as a stage: every individual is mutated with probability
/// `P / 100` and copied unchanged otherwise.
#[derive(Debug, Clone)]
pub struct MutationStage<M> {
    mutation: M,
    probability: u32,
}

impl<M> MutationStage<M> {
    /// Fails unless `probability` is in `[1, 100]`.
    pub fn new(mutation: M, probability: u32) -> Result<Self> {
        Ok(Self {
            mutation,
            probability: check_percent(probability)?,
        })
    }

    pub fn probability(&self) -> u32 {
        self.probability
    }
}

impl<B, M> PipelineElement<B> for MutationStage<M>
where
    B: GenomeBase,
    M: Mutation<B::Gene> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.mutation.name()
    }

    fn apply(
        &self,
        env: &mut StageEnv<'_, B>,
        input: &[Sequence<B::Gene>],
        output: &mut Vec<Sequence<B::Gene>>,
    ) -> Result<()> {
        let seeds = env.task_seeds(input.len());
        let base = env.base;
        let p = self.probability as usize;
        let next = run_tasks(env.parallel, input.len(), |t| {
            let mut rng = create_rng(seeds[t]);
            if rng.uniform_int(1, 100) <= p {
                self.mutation.create_child(base, &input[t], &mut rng)
            } else {
                base.copy(&input[t])
            }
        });
        let next = next.into_iter().collect::<Result<Vec<_>>>()?;
        trace!("{}: {} individuals", self.mutation.name(), next.len());
        output.extend(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossover::{OnePoint, PartiallyMapped};
    use crate::genome::Genome;
    use crate::mutation::SingleSwap;
    use crate::selection::{Fittest, Objective};

    fn base() -> impl GenomeBase<Gene = u32> {
        Genome::new(|g: &[u32]| g.iter().map(|&v| v as f64).sum::<f64>())
    }

    fn population<B: GenomeBase<Gene = u32>>(base: &B, n: u32) -> Vec<Sequence<u32>> {
        (0..n).map(|i| base.from_genes(vec![i, i + 1, i + 2, i + 3])).collect()
    }

    #[test]
    fn test_survivor_count() {
        assert_eq!(SurvivorCount::Fixed(3).count(10), 3);
        assert_eq!(SurvivorCount::Divide(3).count(10), 3);
        assert_eq!(SurvivorCount::Divide(20).count(10), 0);
        assert!(SelectionStage::new(Fittest::new(), SurvivorCount::Divide(0)).is_err());
    }

    #[test]
    fn test_selection_stage_copies_survivors() {
        let base = base();
        let input = population(&base, 6);
        let stage = SelectionStage::new(Fittest::new(), SurvivorCount::Divide(2)).unwrap();
        let mut rng = create_rng(1);
        let mut env = StageEnv {
            base: &base,
            rng: &mut rng,
            parallel: false,
        };
        let mut output = Vec::new();
        stage.apply(&mut env, &input, &mut output).unwrap();
        assert_eq!(output.len(), 3);
        assert_eq!(output[0], input[5]);
        assert_eq!(output[2], input[3]);
    }

    #[test]
    fn test_selection_stage_propagates_errors() {
        let base = base();
        let input = population(&base, 2);
        let stage = SelectionStage::new(Fittest::with_objective(Objective::Minimize), SurvivorCount::Fixed(5)).unwrap();
        let mut rng = create_rng(1);
        let mut env = StageEnv {
            base: &base,
            rng: &mut rng,
            parallel: false,
        };
        let mut output = Vec::new();
        assert!(stage.apply(&mut env, &input, &mut output).is_err());
        assert!(output.is_empty());
    }

    #[test]
    fn test_crossover_stage_all_pairs() {
        let base = base();
        let input = population(&base, 5);
        let stage = CrossoverStage::new(OnePoint);
        let mut rng = create_rng(3);
        let mut env = StageEnv {
            base: &base,
            rng: &mut rng,
            parallel: false,
        };
        let mut output = Vec::new();
        stage.apply(&mut env, &input, &mut output).unwrap();
        assert_eq!(output.len(), 10 * 2);
    }

    #[test]
    fn test_crossover_stage_reports_failure() {
        let base = base();
        // Not permutations of each other.
        let input = population(&base, 3);
        let stage = CrossoverStage::new(PartiallyMapped);
        let mut rng = create_rng(3);
        let mut env = StageEnv {
            base: &base,
            rng: &mut rng,
            parallel: false,
        };
        let mut output = Vec::new();
        assert_eq!(
            stage.apply(&mut env, &input, &mut output),
            Err(EvoError::NotPermutation)
        );
        assert!(output.is_empty());
    }

    #[test]
    fn test_mutation_stage_full_probability_mutates_all() {
        let base = base();
        let input = population(&base, 8);
        let stage = MutationStage::new(SingleSwap, 100).unwrap();
        let mut rng = create_rng(5);
        let mut env = StageEnv {
            base: &base,
            rng: &mut rng,
            parallel: false,
        };
        let mut output = Vec::new();
        stage.apply(&mut env, &input, &mut output).unwrap();
        assert_eq!(output.len(), 8);
        for (before, after) in input.iter().zip(&output) {
            assert_ne!(before, after);
            assert_eq!(base.fitness(before), base.fitness(after));
        }
    }

    #[test]
    fn test_mutation_stage_rejects_probability() {
        assert_eq!(
            MutationStage::new(SingleSwap, 0).unwrap_err(),
            EvoError::InvalidProbability(0)
        );
    }

    fn boxed<B: GenomeBase<Gene = u32>>(_: &B) -> Vec<Box<dyn PipelineElement<B>>> {
        vec![
            Box::new(SelectionStage::new(Fittest::new(), SurvivorCount::Fixed(2)).unwrap()),
            Box::new(CrossoverStage::new(OnePoint)),
            Box::new(MutationStage::new(SingleSwap, 50).unwrap()),
        ]
    }

    #[test]
    fn test_stage_is_object_safe() {
        let stages = boxed(&base());
        let names: Vec<&str> = stages.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["fittest", "one-point", "single-swap"]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let base = base();
        let input = population(&base, 6);
        let stage = CrossoverStage::new(OnePoint);
        let mut outputs = Vec::new();
        for parallel in [false, true] {
            let mut rng = create_rng(11);
            let mut env = StageEnv {
                base: &base,
                rng: &mut rng,
                parallel,
            };
            let mut output = Vec::new();
            stage.apply(&mut env, &input, &mut output).unwrap();
            outputs.push(output);
        }
        assert_eq!(outputs[0], outputs[1]);
    }
}
