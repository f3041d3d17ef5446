//! Pareto domination counting.

use std::cmp::Ordering;

use crate::{
  error::{Error, Result},
  individual::Individual,
  score::{ParetoDominance, Score},
};

// number of solution's dominators
type DominanceCounter = usize;

/// Collects the score vector of each individual in `objectives` order.
///
/// Fails if a score is missing or not finite. Nothing about the individuals is
/// modified, so a failure leaves the set exactly as it was.
pub(crate) fn score_matrix<G>(
  population: &[Individual<G>],
  objectives: &[String],
) -> Result<Vec<Vec<Score>>> {
  population
    .iter()
    .enumerate()
    .map(|(index, individual)| {
      objectives
        .iter()
        .map(|objective| match individual.score(objective) {
          None => Err(Error::MissingFitness {
            index,
            objective: objective.clone(),
          }),
          Some(value) if !value.is_finite() => Err(Error::InvalidFitness {
            index,
            objective: objective.clone(),
            value,
          }),
          Some(value) => Ok(value),
        })
        .collect()
    })
    .collect()
}

/// Counts, for each individual, how many other members of `population`
/// dominate it, and stores the count in the individual. Returns the number
/// of non-dominated individuals.
///
/// Each unordered pair is compared exactly once. Mutually non-dominating
/// pairs, duplicates included, leave both counters untouched.
///
/// # Errors
///
/// [`Error::MissingFitness`] or [`Error::InvalidFitness`] if any individual
/// lacks a finite score for one of `objectives`. In that case no count
/// is written.
pub fn rank<G>(
  population: &mut [Individual<G>],
  objectives: &[String],
) -> Result<usize> {
  let scores = score_matrix(population, objectives)?;
  let counters = dominance_counters(&scores);
  for (individual, count) in population.iter_mut().zip(&counters) {
    individual.set_domination_count(*count);
  }
  let front_size = counters.iter().filter(|c| **c == 0).count();

  debug_assert!(
    population.is_empty() || front_size > 0,
    "first front must have at least 1 solution"
  );

  Ok(front_size)
}

fn dominance_counters(scores: &[Vec<Score>]) -> Vec<DominanceCounter> {
  let mut counters: Vec<DominanceCounter> = vec![0; scores.len()];
  // for each unique pair of solutions `p`...
  for (p_idx, p_sc) in scores.iter().enumerate() {
    // and `q`...
    for (q_idx, q_sc) in scores.iter().enumerate().skip(p_idx + 1) {
      match p_sc.as_slice().dominance(q_sc) {
        // `p` dominates `q`
        Ordering::Less => counters[q_idx] += 1,
        // `q` dominates `p`
        Ordering::Greater => counters[p_idx] += 1,
        Ordering::Equal => {}
      }
    }
  }
  counters
}
