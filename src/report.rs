//! Results of a run and per-generation summaries.

use std::{fmt, io};

use itertools::Itertools;

use crate::{
  convergence::StopReason,
  error::Result,
  individual::Individual,
  population::Population,
  score::Score,
};

/// One line of the models log: a genotype followed by its primary fitness.
///
/// ```
/// # use pareto_gp::report::ModelRecord;
/// let record = ModelRecord::new(&"(+ x 1)", 0.75);
/// assert_eq!(record.to_string(), "(+ x 1),0.75\n");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelRecord<'a, G> {
  genotype: &'a G,
  fitness: Score,
}

impl<'a, G> ModelRecord<'a, G> {
  /// Creates a record.
  pub fn new(genotype: &'a G, fitness: Score) -> Self {
    Self { genotype, fitness }
  }
}

impl<G: fmt::Display> fmt::Display for ModelRecord<'_, G> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{},{}", self.genotype, self.fitness)
  }
}

/// Everything a finished run leaves behind.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport<G> {
  /// Final population, ranked.
  pub population: Population<G>,
  /// Indices of the final Pareto front in `population`.
  pub pareto_front: Vec<usize>,
  /// Best individual of the initial population, then one per generation.
  pub history: Vec<Individual<G>>,
  /// Why the run ended.
  pub stop_reason: StopReason,
  /// Number of completed generations.
  pub generations: usize,
  /// Primary objective, used for the models log.
  pub primary_objective: String,
}

impl<G> RunReport<G> {
  /// Iterates over the members of the final Pareto front.
  pub fn front(&self) -> impl Iterator<Item = &Individual<G>> {
    self.pareto_front.iter().map(|&idx| &self.population[idx])
  }

  /// Best individual of the last generation.
  pub fn best(&self) -> Option<&Individual<G>> {
    self.history.last()
  }
}

impl<G: fmt::Display> RunReport<G> {
  /// Writes one [`ModelRecord`] per history entry. A missing primary score
  /// is written as NaN.
  ///
  /// # Errors
  ///
  /// [`Error::Io`](crate::Error::Io) if writing fails.
  pub fn write_models<W: io::Write>(&self, mut w: W) -> Result<()> {
    for individual in &self.history {
      let fitness = individual
        .score(&self.primary_objective)
        .unwrap_or(Score::NAN);
      write!(w, "{}", ModelRecord::new(individual.genotype(), fitness))?;
    }
    w.flush()?;
    Ok(())
  }
}

/// Summary of one objective over a population.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
  /// Mean score.
  pub mean: f64,
  /// Population standard deviation of the score.
  pub std_dev: f64,
  /// Lowest score.
  pub min: Score,
  /// Highest score.
  pub max: Score,
  /// Mean and standard deviation of genotype sizes, if measured.
  pub size: Option<(f64, f64)>,
}

impl GenerationStats {
  /// Summarizes `objective` over `population`. Individuals without that
  /// score are ignored; `None` if none has it.
  pub fn of<G>(population: &[Individual<G>], objective: &str) -> Option<Self> {
    let scores = population
      .iter()
      .filter_map(|i| i.score(objective))
      .collect::<Vec<_>>();
    let (mean, std_dev) = mean_std(&scores)?;
    let (min, max) = scores
      .iter()
      .copied()
      .minmax_by(|a, b| a.total_cmp(b))
      .into_option()?;
    Some(Self {
      mean,
      std_dev,
      min,
      max,
      size: None,
    })
  }

  /// Adds genotype size statistics, measured with `size`.
  pub fn with_sizes<G>(
    mut self,
    population: &[Individual<G>],
    size: impl Fn(&G) -> usize,
  ) -> Self {
    let sizes = population
      .iter()
      .map(|i| size(i.genotype()) as f64)
      .collect::<Vec<_>>();
    self.size = mean_std(&sizes);
    self
  }
}

fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
  if values.is_empty() {
    return None;
  }
  let n = values.len() as f64;
  let mean = values.iter().sum::<f64>() / n;
  let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
  Some((mean, var.sqrt()))
}

impl fmt::Display for GenerationStats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "mean {:.5} std {:.5} min {} max {}",
      self.mean, self.std_dev, self.min, self.max
    )?;
    if let Some((mean, std_dev)) = self.size {
      write!(f, " size mean {mean:.5} std {std_dev:.5}")?;
    }
    Ok(())
  }
}
