//! Candidate solution records.

use crate::score::Score;

/// Insertion-ordered mapping from objective name to score.
///
/// The order of entries follows the order in which objectives were first
/// evaluated, which in turn follows the objective registry. Overwriting an
/// existing entry keeps its position.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fitness {
  entries: Vec<(String, Score)>,
}

impl Fitness {
  /// Creates an empty fitness map.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the score of objective `name`, if it was evaluated.
  pub fn get(&self, name: &str) -> Option<Score> {
    self
      .entries
      .iter()
      .find_map(|(n, s)| (n == name).then_some(*s))
  }

  /// Sets the score of objective `name`, overwriting a previous value.
  pub fn insert(&mut self, name: &str, score: Score) {
    match self.entries.iter_mut().find(|(n, _)| n == name) {
      Some(entry) => entry.1 = score,
      None => self.entries.push((name.to_owned(), score)),
    }
  }

  /// Returns the first inserted entry.
  pub fn first(&self) -> Option<(&str, Score)> {
    self.entries.first().map(|(n, s)| (n.as_str(), *s))
  }

  /// Iterates over entries in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, Score)> {
    self.entries.iter().map(|(n, s)| (n.as_str(), *s))
  }

  /// Number of evaluated objectives.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` if nothing was evaluated yet.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<N: Into<String>> FromIterator<(N, Score)> for Fitness {
  fn from_iter<T: IntoIterator<Item = (N, Score)>>(iter: T) -> Self {
    let mut fitness = Fitness::new();
    for (name, score) in iter {
      fitness.insert(&name.into(), score);
    }
    fitness
  }
}

/// A candidate solution.
///
/// The genotype is opaque to the engine: only collaborators create and
/// inspect it. The engine owns the ranking fields and recomputes them every
/// generation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual<G> {
  genotype: G,
  fitness: Fitness,
  domination_count: usize,
  crowding_distance: f64,
  ideal_distance: Option<f64>,
}

impl<G> Individual<G> {
  /// Wraps a freshly created genotype. It has no scores yet.
  pub fn new(genotype: G) -> Self {
    Self {
      genotype,
      fitness: Fitness::new(),
      domination_count: 0,
      crowding_distance: 0.0,
      ideal_distance: None,
    }
  }

  /// Wraps a genotype which has already been scored, e.g. a migrant from
  /// another run.
  pub fn with_fitness(genotype: G, fitness: Fitness) -> Self {
    Self {
      fitness,
      ..Self::new(genotype)
    }
  }

  /// Returns the genotype.
  pub fn genotype(&self) -> &G {
    &self.genotype
  }

  /// Consumes the individual and returns its genotype.
  pub fn into_genotype(self) -> G {
    self.genotype
  }

  /// Returns all scores.
  pub fn fitness(&self) -> &Fitness {
    &self.fitness
  }

  /// Returns the score of objective `name`.
  pub fn score(&self, name: &str) -> Option<Score> {
    self.fitness.get(name)
  }

  /// Sets the score of objective `name`.
  pub fn set_score(&mut self, name: &str, score: Score) {
    self.fitness.insert(name, score)
  }

  /// Number of individuals in the last ranked set that dominate this one.
  pub fn domination_count(&self) -> usize {
    self.domination_count
  }

  /// Crowding distance from the last crowding pass. May be `+inf`.
  pub fn crowding_distance(&self) -> f64 {
    self.crowding_distance
  }

  /// Distance to the ideal point, only set by the euclidean best policy.
  pub fn ideal_distance(&self) -> Option<f64> {
    self.ideal_distance
  }

  /// Returns `true` if no member of the last ranked set dominates this one.
  pub fn is_nondominated(&self) -> bool {
    self.domination_count == 0
  }

  pub(crate) fn set_domination_count(&mut self, count: usize) {
    self.domination_count = count;
  }

  pub(crate) fn set_crowding_distance(&mut self, distance: f64) {
    self.crowding_distance = distance;
  }

  pub(crate) fn set_ideal_distance(&mut self, distance: f64) {
    self.ideal_distance = Some(distance);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fitness_keeps_insertion_order() {
    let mut fitness = Fitness::new();
    fitness.insert("accuracy", 0.2);
    fitness.insert("complexity", 14.0);
    fitness.insert("accuracy", 0.1);

    assert_eq!(fitness.len(), 2);
    assert_eq!(fitness.first(), Some(("accuracy", 0.1)));
    assert_eq!(
      fitness.iter().collect::<Vec<_>>(),
      vec![("accuracy", 0.1), ("complexity", 14.0)]
    );
    assert_eq!(fitness.get("missing"), None);
  }

  #[test]
  fn test_new_individual_is_unranked() {
    let individual = Individual::new("x1 + x2");
    assert!(individual.fitness().is_empty());
    assert_eq!(individual.domination_count(), 0);
    assert_eq!(individual.crowding_distance(), 0.0);
    assert_eq!(individual.ideal_distance(), None);
  }

  #[test]
  fn test_migrant_keeps_scores() {
    let fitness = [("a", 1.0), ("b", 2.0)].into_iter().collect();
    let individual = Individual::with_fitness(3_u8, fitness);
    assert_eq!(individual.score("b"), Some(2.0));
    assert_eq!(individual.into_genotype(), 3);
  }
}
