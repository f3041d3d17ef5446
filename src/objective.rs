//! Objective evaluation operators and the objective registry.

use executor::ObjectiveExecutor;
use log::trace;
use rayon::prelude::*;

use crate::{
  error::{Error, Result},
  execution::strategy::*,
  individual::Individual,
  operator::{ParBatch, ParEach},
  score::Score,
};

/// An operator that scores a single genotype against one objective.
///
/// Scores are minimized. Can be applied in parallel to each individual or to
/// batches of individuals by converting it with `par_each()` or
/// `par_batch()`.
///
/// # Examples
/// ```
/// # use pareto_gp::operator::IntoPar;
/// // size of a rule set, fewer rules is better
/// let complexity = |rules: &Vec<u32>| rules.len() as f64;
/// let complexity = complexity.par_each();
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Objective<G> {
  /// Returns the score of `genotype`. The lower - the better.
  fn score(&self, genotype: &G) -> Score;
}

impl<G, F> Objective<G> for F
where
  F: Fn(&G) -> Score,
{
  fn score(&self, genotype: &G) -> Score {
    self(genotype)
  }
}

/// An operator that scores a whole population at once, e.g. by handing it to
/// an external accelerator.
///
/// Must return exactly one score per individual, in order. Returning any
/// other number of scores aborts the run.
///
/// # Examples
/// ```
/// # use pareto_gp::individual::Individual;
/// let e = |population: &[Individual<String>]| {
///   population.iter().map(|i| i.genotype().len() as f64).collect::<Vec<_>>()
/// };
/// ```
pub trait Evaluator<G> {
  /// Returns one score per individual.
  fn evaluate(&self, population: &[Individual<G>]) -> Vec<Score>;
}

impl<G, F> Evaluator<G> for F
where
  F: Fn(&[Individual<G>]) -> Vec<Score>,
{
  fn evaluate(&self, population: &[Individual<G>]) -> Vec<Score> {
    self(population)
  }
}

/// This private module prevents exposing the `Executor` to a user.
pub(crate) mod executor {
  use crate::{individual::Individual, score::Score};

  /// An internal objective executor.
  pub trait ObjectiveExecutor<G, ExecutionStrategy> {
    /// Scores every individual, optionally in parallel.
    fn execute(&self, population: &[Individual<G>]) -> Vec<Score>;
  }
}

impl<G, E> ObjectiveExecutor<G, CustomExecutionStrategy> for E
where
  E: Evaluator<G>,
{
  fn execute(&self, population: &[Individual<G>]) -> Vec<Score> {
    self.evaluate(population)
  }
}

impl<G, O> ObjectiveExecutor<G, SequentialExecutionStrategy> for O
where
  O: Objective<G>,
{
  fn execute(&self, population: &[Individual<G>]) -> Vec<Score> {
    population.iter().map(|i| self.score(i.genotype())).collect()
  }
}

impl<G, O> ObjectiveExecutor<G, ParallelEachExecutionStrategy> for ParEach<G, O>
where
  G: Sync,
  O: Objective<G> + Sync,
{
  fn execute(&self, population: &[Individual<G>]) -> Vec<Score> {
    population
      .par_iter()
      .map(|i| self.operator().score(i.genotype()))
      .collect()
  }
}

impl<G, O> ObjectiveExecutor<G, ParallelBatchExecutionStrategy>
  for ParBatch<G, O>
where
  G: Sync,
  O: Objective<G> + Sync,
{
  fn execute(&self, population: &[Individual<G>]) -> Vec<Score> {
    let chunk_size = (population.len() / rayon::current_num_threads()).max(1);
    population
      .par_chunks(chunk_size)
      .flat_map_iter(|chunk| {
        chunk.iter().map(|i| self.operator().score(i.genotype()))
      })
      .collect()
  }
}

type BoxedExecutor<G> = Box<dyn Fn(&[Individual<G>]) -> Vec<Score>>;

/// Insertion-ordered registry of named objectives.
///
/// The first registered objective is the primary one: convergence and the
/// first-fitness best policy look at it.
///
/// # Examples
/// ```
/// # use pareto_gp::objective::Objectives;
/// # fn main() -> pareto_gp::Result<()> {
/// let objectives = Objectives::<f64>::new()
///   .with("error", |x: &f64| (x - 2.0).abs())?
///   .with("size", |x: &f64| x.abs())?;
/// assert_eq!(objectives.names().collect::<Vec<_>>(), ["error", "size"]);
/// # Ok(())
/// # }
/// ```
pub struct Objectives<G> {
  entries: Vec<(String, BoxedExecutor<G>)>,
}

impl<G> Default for Objectives<G> {
  fn default() -> Self {
    Self {
      entries: Vec::new(),
    }
  }
}

impl<G> std::fmt::Debug for Objectives<G> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries(self.names()).finish()
  }
}

impl<G: 'static> Objectives<G> {
  /// Creates an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers an objective under `name`.
  ///
  /// # Errors
  ///
  /// [`Error::DuplicateObjective`] if `name` is already taken.
  pub fn insert<ES, E>(
    &mut self,
    name: impl Into<String>,
    objective: E,
  ) -> Result<()>
  where
    ES: 'static,
    E: ObjectiveExecutor<G, ES> + 'static,
  {
    let name = name.into();
    if self.contains(&name) {
      return Err(Error::DuplicateObjective(name));
    }
    let executor: BoxedExecutor<G> =
      Box::new(move |population: &[Individual<G>]| objective.execute(population));
    self.entries.push((name, executor));
    Ok(())
  }

  /// Builder-style [`insert`](Self::insert).
  pub fn with<ES, E>(
    mut self,
    name: impl Into<String>,
    objective: E,
  ) -> Result<Self>
  where
    ES: 'static,
    E: ObjectiveExecutor<G, ES> + 'static,
  {
    self.insert(name, objective)?;
    Ok(self)
  }
}

impl<G> Objectives<G> {
  /// Returns `true` if an objective is registered under `name`.
  pub fn contains(&self, name: &str) -> bool {
    self.entries.iter().any(|(n, _)| n == name)
  }

  /// Registered names in registration order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(n, _)| n.as_str())
  }

  /// Number of registered objectives.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` if nothing is registered.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Scores every individual in `population` on objective `name`,
  /// overwriting previous scores. Blocks until all scores are assigned.
  ///
  /// # Errors
  ///
  /// [`Error::UnknownObjective`] if nothing is registered under `name`,
  /// [`Error::EvaluationSize`] if the evaluator returned the wrong number of
  /// scores. No score is written in either case.
  pub fn evaluate(
    &self,
    name: &str,
    population: &mut [Individual<G>],
  ) -> Result<()> {
    let (_, executor) = self
      .entries
      .iter()
      .find(|(n, _)| n == name)
      .ok_or_else(|| Error::UnknownObjective(name.to_owned()))?;
    let scores = executor(population);
    if scores.len() != population.len() {
      return Err(Error::EvaluationSize {
        objective: name.to_owned(),
        expected: population.len(),
        actual: scores.len(),
      });
    }
    for (individual, score) in population.iter_mut().zip(scores) {
      individual.set_score(name, score);
    }
    trace!("evaluated `{name}` for {} individuals", population.len());
    Ok(())
  }

  /// Evaluates each of `names`, in order.
  pub fn evaluate_all(
    &self,
    names: &[String],
    population: &mut [Individual<G>],
  ) -> Result<()> {
    names
      .iter()
      .try_for_each(|name| self.evaluate(name, population))
  }
}
