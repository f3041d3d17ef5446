//! Engine configuration.

use typed_builder::TypedBuilder;

use crate::{
  best::BestPolicy,
  convergence::ConvergencePolicy,
  error::{Error, Result},
  selection::Selection,
  variation::Variation,
};

/// Parameters of a run.
///
/// Built with a compile time checked builder. Mandatory fields have no
/// default, the rest fall back to [`Selection::default`],
/// [`BestPolicy::default`], seed 0 and a convergence policy derived from the
/// primary objective.
///
/// # Examples
/// ```
/// # use pareto_gp::{config::EngineConfig, selection::Selection};
/// let config = EngineConfig::builder()
///   .population_size(100)
///   .generations(50)
///   .crossover_rate(0.7)
///   .mutation_rate(0.2)
///   .objectives(["sr_roc", "size"])
///   .selection(Selection::Tournament(4))
///   .seed(42)
///   .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(TypedBuilder, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
  /// Number of individuals kept between generations.
  pub population_size: usize,
  /// Maximum number of steps.
  pub generations: usize,
  /// Probability of crossover per variation attempt.
  pub crossover_rate: f64,
  /// Probability of mutation per variation attempt.
  pub mutation_rate: f64,
  /// Parent selection strategy.
  #[builder(default)]
  #[cfg_attr(feature = "serde", serde(default))]
  pub selection: Selection,
  /// Best individual extraction policy.
  #[builder(default)]
  #[cfg_attr(feature = "serde", serde(default))]
  pub best_policy: BestPolicy,
  /// Objective identifiers. The first one is the primary objective.
  #[builder(setter(
    transform = |names: impl IntoIterator<Item = impl Into<String>>| {
      names.into_iter().map(Into::into).collect()
    }
  ))]
  pub objectives: Vec<String>,
  /// Seed of the random stream used by [`Engine::run`].
  ///
  /// [`Engine::run`]: crate::engine::Engine::run
  #[builder(default)]
  #[cfg_attr(feature = "serde", serde(default))]
  pub seed: u64,
  /// Overrides the convergence policy derived from the primary objective.
  #[builder(default, setter(strip_option))]
  #[cfg_attr(feature = "serde", serde(default))]
  pub convergence: Option<ConvergencePolicy>,
}

impl EngineConfig {
  /// Checks everything that can be checked without an objective registry.
  ///
  /// # Errors
  ///
  /// [`Error::EmptyPopulation`], [`Error::NoObjectives`],
  /// [`Error::InvalidRate`] or [`Error::InvalidTournamentSize`].
  pub fn validate(&self) -> Result<()> {
    if self.population_size == 0 {
      return Err(Error::EmptyPopulation);
    }
    if self.objectives.is_empty() {
      return Err(Error::NoObjectives);
    }
    if self.selection.size() == 0 {
      return Err(Error::InvalidTournamentSize);
    }
    self.variation().map(|_| ())
  }

  /// Variation rates.
  ///
  /// # Errors
  ///
  /// [`Error::InvalidRate`] for rates [`Variation::new`] rejects.
  pub fn variation(&self) -> Result<Variation> {
    Variation::new(self.crossover_rate, self.mutation_rate)
  }

  /// Identifier of the primary objective, if any objective is configured.
  pub fn primary_objective(&self) -> Option<&str> {
    self.objectives.first().map(String::as_str)
  }

  /// The configured convergence policy, or the one derived from the
  /// primary objective.
  pub fn convergence_policy(&self) -> ConvergencePolicy {
    self.convergence.unwrap_or_else(|| {
      self
        .primary_objective()
        .map(ConvergencePolicy::for_objective)
        .unwrap_or_default()
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config() -> EngineConfig {
    EngineConfig::builder()
      .population_size(10)
      .generations(5)
      .crossover_rate(0.7)
      .mutation_rate(0.2)
      .objectives(["sr_fitness", "size"])
      .build()
  }

  #[test]
  fn test_defaults() {
    let config = config();
    assert_eq!(config.selection, Selection::CrowdedTournament(2));
    assert_eq!(config.best_policy, BestPolicy::Euclidean);
    assert_eq!(config.seed, 0);
    assert_eq!(config.primary_objective(), Some("sr_fitness"));
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_convergence_policy() {
    assert_eq!(
      config().convergence_policy(),
      ConvergencePolicy::Threshold { threshold: 0.999 }
    );
    let overridden = EngineConfig {
      convergence: Some(ConvergencePolicy::Never),
      ..config()
    };
    assert_eq!(overridden.convergence_policy(), ConvergencePolicy::Never);
  }

  #[test]
  fn test_invalid_configs() {
    let empty = EngineConfig {
      population_size: 0,
      ..config()
    };
    assert!(matches!(empty.validate(), Err(Error::EmptyPopulation)));

    let blind = EngineConfig {
      objectives: vec![],
      ..config()
    };
    assert!(matches!(blind.validate(), Err(Error::NoObjectives)));

    let sterile = EngineConfig {
      crossover_rate: 0.0,
      mutation_rate: 0.0,
      ..config()
    };
    assert!(matches!(
      sterile.validate(),
      Err(Error::InvalidRate { .. })
    ));

    let lonely = EngineConfig {
      selection: Selection::Tournament(0),
      ..config()
    };
    assert!(matches!(
      lonely.validate(),
      Err(Error::InvalidTournamentSize)
    ));
  }
}
