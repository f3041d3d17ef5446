//! Offspring production.

use log::trace;
use rand::{Rng, RngCore};

use crate::{
  crossover::Crossover,
  error::{Error, Result},
  individual::Individual,
  mutation::Mutation,
  population::Population,
  selection::Selection,
};

/// Outcome of a single variation attempt.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Branch {
  /// Two parents are recombined.
  Crossover,
  /// One parent is mutated.
  Mutation,
  /// Nothing is produced; the attempt is retried.
  Skip,
}

/// Crossover and mutation rates.
///
/// Rates are mutually exclusive and cumulative: a uniform draw below
/// `crossover_rate` picks crossover, a draw below
/// `crossover_rate + mutation_rate` picks mutation, anything else is a
/// wasted attempt.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variation {
  crossover_rate: f64,
  mutation_rate: f64,
}

impl Variation {
  /// Creates a variation pipeline.
  ///
  /// # Errors
  ///
  /// [`Error::InvalidRate`] if a rate lies outside of `[0, 1]` or both are
  /// zero, in which case no offspring could ever be produced.
  pub fn new(crossover_rate: f64, mutation_rate: f64) -> Result<Self> {
    let valid = |r: f64| (0.0..=1.0).contains(&r);
    if !valid(crossover_rate)
      || !valid(mutation_rate)
      || crossover_rate + mutation_rate <= 0.0
    {
      return Err(Error::InvalidRate {
        crossover: crossover_rate,
        mutation: mutation_rate,
      });
    }
    Ok(Self {
      crossover_rate,
      mutation_rate,
    })
  }

  /// Probability of crossover per attempt.
  pub fn crossover_rate(&self) -> f64 {
    self.crossover_rate
  }

  /// Probability of mutation per attempt.
  pub fn mutation_rate(&self) -> f64 {
    self.mutation_rate
  }

  /// Classifies a uniform draw from `[0, 1)`.
  pub fn branch(&self, draw: f64) -> Branch {
    if draw < self.crossover_rate {
      Branch::Crossover
    } else if draw < self.crossover_rate + self.mutation_rate {
      Branch::Mutation
    } else {
      Branch::Skip
    }
  }

  /// Produces exactly `size` unscored offspring from `parents`.
  ///
  /// Each attempt selects a parent, then draws the branch, then selects a
  /// second parent if the branch is crossover. Wasted attempts still consume
  /// the selection and the branch draw. Children beyond `size` are dropped.
  ///
  /// Attempts repeat until `size` children exist, so this never returns if
  /// neither branch can produce a child, e.g. a crossover that always
  /// returns nothing, like [`NoCrossover`], with a mutation rate of 0.
  ///
  /// [`NoCrossover`]: crate::crossover::NoCrossover
  pub fn offspring<G, C, M, R>(
    &self,
    parents: &[Individual<G>],
    size: usize,
    selection: &Selection,
    crossover: &C,
    mutation: &M,
    rng: &mut R,
  ) -> Population<G>
  where
    C: Crossover<G>,
    M: Mutation<G>,
    R: Rng,
  {
    let mut offspring = Population::with_capacity(size);
    let mut wasted = 0_usize;
    while offspring.len() < size {
      let p1 = selection.select(parents, rng);
      let children = match self.branch(rng.gen::<f64>()) {
        Branch::Crossover => {
          let p2 = selection.select(parents, rng);
          crossover.crossover(p1.genotype(), p2.genotype(), rng)
        }
        Branch::Mutation => {
          vec![mutation.mutate(p1.genotype(), rng)]
        }
        Branch::Skip => {
          wasted += 1;
          continue;
        }
      };
      let capacity = size - offspring.len();
      children
        .into_iter()
        .take(capacity)
        .for_each(|child| offspring.push(Individual::new(child)));
    }
    trace!("produced {size} offspring, {wasted} attempts wasted");
    offspring
  }
}
