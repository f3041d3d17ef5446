//! Crowding distance estimation.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::{error::Result, individual::Individual, ranking::score_matrix};

/// Assigns each individual a crowding distance: the sum over objectives of
/// the normalized gap between its two neighbours along that objective.
///
/// For each objective the set is sorted by score; the first and the last
/// individual in that order get `+inf`, every other one gets
/// `(next - prev) / (max - min)`, or nothing if all scores are equal.
/// Distances are recomputed from scratch on every call.
///
/// # Errors
///
/// Same as [`rank`](crate::ranking::rank): every individual needs a
/// finite score for each objective. Nothing is written on failure.
pub fn assign_crowding_distances<G>(
  population: &mut [Individual<G>],
  objectives: &[String],
) -> Result<()> {
  let scores = score_matrix(population, objectives)?;
  let mut distances = vec![0.0_f64; population.len()];

  if !population.is_empty() {
    for o_idx in 0..objectives.len() {
      // sort solutions by their scores of objective `o`
      let order = (0..scores.len())
        .sorted_by(|&a, &b| {
          scores[a][o_idx]
            .partial_cmp(&scores[b][o_idx])
            .unwrap_or(Ordering::Equal)
        })
        .collect::<Vec<_>>();

      let first_idx = order[0];
      let last_idx = order[order.len() - 1];
      distances[first_idx] = f64::INFINITY;
      distances[last_idx] = f64::INFINITY;

      let range = scores[last_idx][o_idx] - scores[first_idx][o_idx];
      if range == 0.0 {
        continue;
      }
      for (prev, idx, next) in order.iter().tuple_windows() {
        distances[*idx] += (scores[*next][o_idx] - scores[*prev][o_idx]) / range;
      }
    }
  }

  for (individual, distance) in population.iter_mut().zip(distances) {
    individual.set_crowding_distance(distance);
  }
  Ok(())
}
