//! Extraction of a single "best" individual from a ranked population.

use std::fmt;

use itertools::{Itertools, MinMaxResult};

use crate::{
  error::{Error, Result},
  individual::Individual,
  ranking::score_matrix,
  score::Score,
};

/// How the best individual of a generation is chosen. The whole population
/// is searched, not just its Pareto front. Ties go to the earlier
/// individual.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BestPolicy {
  /// Smallest euclidean distance to the ideal point, with each objective
  /// min-max normalized over the population.
  #[default]
  Euclidean,
  /// Smallest score on the first objective.
  FirstFitness,
}

impl BestPolicy {
  /// Identifier of [`BestPolicy::Euclidean`].
  pub const EUCLIDEAN: &'static str = "euclidean";

  /// Identifier of [`BestPolicy::FirstFitness`].
  pub const FIRST_FITNESS: &'static str = "first_fitness";

  /// Builds a policy from its configuration identifier.
  ///
  /// # Errors
  ///
  /// [`Error::UnknownBestPolicy`] for unknown identifiers.
  pub fn from_name(name: &str) -> Result<Self> {
    match name {
      Self::EUCLIDEAN => Ok(Self::Euclidean),
      Self::FIRST_FITNESS => Ok(Self::FirstFitness),
      _ => Err(Error::UnknownBestPolicy(name.to_owned())),
    }
  }

  /// Returns the index of the best individual.
  ///
  /// The euclidean policy also stores each individual's distance to the
  /// ideal point in it.
  ///
  /// # Errors
  ///
  /// [`Error::EmptyPopulation`] if there's nothing to pick from, and the
  /// same score errors as [`rank`](crate::ranking::rank).
  pub fn pick<G>(
    &self,
    population: &mut [Individual<G>],
    objectives: &[String],
  ) -> Result<usize> {
    if population.is_empty() {
      return Err(Error::EmptyPopulation);
    }
    let objectives = match self {
      Self::Euclidean => objectives,
      Self::FirstFitness => &objectives[..objectives.len().min(1)],
    };
    let scores = score_matrix(population, objectives)?;
    let keys = match self {
      Self::Euclidean => {
        let distances = ideal_distances(&scores, objectives.len());
        for (individual, distance) in population.iter_mut().zip(&distances) {
          individual.set_ideal_distance(*distance);
        }
        distances
      }
      Self::FirstFitness => scores
        .iter()
        .map(|s| s.first().copied().unwrap_or_default())
        .collect(),
    };
    Ok(argmin(&keys))
  }
}

/// Distance of each score vector to the origin after min-max normalizing
/// every objective. Objectives without spread contribute nothing.
fn ideal_distances(scores: &[Vec<Score>], objective_num: usize) -> Vec<f64> {
  let mut squares = vec![0.0_f64; scores.len()];
  for o_idx in 0..objective_num {
    let column = scores.iter().map(|s| s[o_idx]);
    let (min, max) = match column.minmax_by(|a, b| a.total_cmp(b)) {
      MinMaxResult::NoElements => continue,
      MinMaxResult::OneElement(v) => (v, v),
      MinMaxResult::MinMax(min, max) => (min, max),
    };
    let range = max - min;
    if range == 0.0 {
      continue;
    }
    for (square, s) in squares.iter_mut().zip(scores) {
      *square += ((s[o_idx] - min) / range).powi(2);
    }
  }
  squares.into_iter().map(f64::sqrt).collect()
}

/// Index of the first minimum.
fn argmin(keys: &[f64]) -> usize {
  keys
    .iter()
    .enumerate()
    .fold(0, |best, (idx, key)| if *key < keys[best] { idx } else { best })
}

impl std::str::FromStr for BestPolicy {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::from_name(s)
  }
}

impl fmt::Display for BestPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Euclidean => f.write_str(Self::EUCLIDEAN),
      Self::FirstFitness => f.write_str(Self::FIRST_FITNESS),
    }
  }
}
