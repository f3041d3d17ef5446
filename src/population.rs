//! Ordered collections of individuals.

use std::{
  cmp::Ordering,
  ops::{Deref, DerefMut},
};

use crate::individual::Individual;

/// An ordered sequence of individuals.
///
/// Dereferences to a slice, so every read-only slice method is available.
/// Between generations its length is the configured population size.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population<G> {
  individuals: Vec<Individual<G>>,
}

impl<G> Default for Population<G> {
  fn default() -> Self {
    Self {
      individuals: Vec::new(),
    }
  }
}

impl<G> Population<G> {
  /// Creates an empty population.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates an empty population with room for `capacity` individuals.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      individuals: Vec::with_capacity(capacity),
    }
  }

  /// Wraps each genotype into an unscored individual.
  pub fn from_genotypes(genotypes: impl IntoIterator<Item = G>) -> Self {
    genotypes.into_iter().map(Individual::new).collect()
  }

  /// Appends an individual.
  pub fn push(&mut self, individual: Individual<G>) {
    self.individuals.push(individual)
  }

  /// Moves all individuals of `other` to the end of this population.
  pub fn append(&mut self, other: &mut Population<G>) {
    self.individuals.append(&mut other.individuals)
  }

  /// Combines parents and offspring into one pool, parents first.
  pub fn merge(mut self, mut offspring: Population<G>) -> Self {
    self.append(&mut offspring);
    self
  }

  /// Keeps the first `len` individuals.
  pub fn truncate(&mut self, len: usize) {
    self.individuals.truncate(len)
  }

  /// Sorts by domination count, ascending. If `crowded` is set, ties are
  /// broken by crowding distance, descending. The sort is stable, so
  /// individuals that compare equal keep their relative order.
  pub fn sort_ranked(&mut self, crowded: bool) {
    self.individuals.sort_by(|a, b| {
      a.domination_count()
        .cmp(&b.domination_count())
        .then_with(|| match crowded {
          true => b.crowding_distance().total_cmp(&a.crowding_distance()),
          false => Ordering::Equal,
        })
    });
  }

  /// Indices of individuals with domination count 0.
  pub fn pareto_front(&self) -> Vec<usize> {
    self
      .individuals
      .iter()
      .enumerate()
      .filter_map(|(idx, ind)| ind.is_nondominated().then_some(idx))
      .collect()
  }

  /// Moves individuals out of the population.
  pub fn into_vec(self) -> Vec<Individual<G>> {
    self.individuals
  }
}

impl<G> Deref for Population<G> {
  type Target = [Individual<G>];

  fn deref(&self) -> &Self::Target {
    &self.individuals
  }
}

impl<G> DerefMut for Population<G> {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.individuals
  }
}

impl<G> From<Vec<Individual<G>>> for Population<G> {
  fn from(individuals: Vec<Individual<G>>) -> Self {
    Self { individuals }
  }
}

impl<G> FromIterator<Individual<G>> for Population<G> {
  fn from_iter<T: IntoIterator<Item = Individual<G>>>(iter: T) -> Self {
    Self {
      individuals: iter.into_iter().collect(),
    }
  }
}

impl<G> IntoIterator for Population<G> {
  type Item = Individual<G>;
  type IntoIter = std::vec::IntoIter<Individual<G>>;

  fn into_iter(self) -> Self::IntoIter {
    self.individuals.into_iter()
  }
}

impl<'a, G> IntoIterator for &'a Population<G> {
  type Item = &'a Individual<G>;
  type IntoIter = std::slice::Iter<'a, Individual<G>>;

  fn into_iter(self) -> Self::IntoIter {
    self.individuals.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ranked(genotype: u32, count: usize, distance: f64) -> Individual<u32> {
    let mut individual = Individual::new(genotype);
    individual.set_domination_count(count);
    individual.set_crowding_distance(distance);
    individual
  }

  fn genotypes(population: &Population<u32>) -> Vec<u32> {
    population.iter().map(|i| *i.genotype()).collect()
  }

  #[test]
  fn test_merge_keeps_parents_first() {
    let parents = Population::from_genotypes([1, 2]);
    let offspring = Population::from_genotypes([3, 4]);
    let merged = parents.merge(offspring);
    assert_eq!(genotypes(&merged), vec![1, 2, 3, 4]);
  }

  #[test]
  fn test_sort_without_crowding_is_stable() {
    let mut population: Population<u32> = vec![
      ranked(0, 2, 0.0),
      ranked(1, 0, 1.0),
      ranked(2, 1, 9.0),
      ranked(3, 0, 5.0),
    ]
    .into();
    population.sort_ranked(false);
    assert_eq!(genotypes(&population), vec![1, 3, 2, 0]);
  }

  #[test]
  fn test_sort_with_crowding_prefers_isolated() {
    let mut population: Population<u32> = vec![
      ranked(0, 1, f64::INFINITY),
      ranked(1, 0, 1.0),
      ranked(2, 0, f64::INFINITY),
      ranked(3, 0, 5.0),
    ]
    .into();
    population.sort_ranked(true);
    assert_eq!(genotypes(&population), vec![2, 3, 1, 0]);
  }

  #[test]
  fn test_pareto_front_indices() {
    let population: Population<u32> =
      vec![ranked(0, 0, 0.0), ranked(1, 3, 0.0), ranked(2, 0, 0.0)].into();
    assert_eq!(population.pareto_front(), vec![0, 2]);
  }
}
