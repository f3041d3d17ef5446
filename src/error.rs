//! The crate's error type.

use thiserror::Error;

use crate::score::Score;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every fatal condition the engine can run into.
///
/// None of these are recovered from inside the crate. They are propagated to
/// the driver, which decides what to do with the process.
#[derive(Debug, Error)]
pub enum Error {
  /// A selection strategy identifier nobody recognizes.
  #[error("unknown selection strategy `{0}`")]
  UnknownSelection(String),

  /// A best-individual policy identifier nobody recognizes.
  #[error("unknown best individual policy `{0}`")]
  UnknownBestPolicy(String),

  /// An objective named in the configuration has no registered evaluator.
  #[error("objective `{0}` is configured but has no registered evaluator")]
  UnknownObjective(String),

  /// The same objective was registered twice.
  #[error("objective `{0}` is registered more than once")]
  DuplicateObjective(String),

  /// No objectives configured at all.
  #[error("at least one objective must be configured")]
  NoObjectives,

  /// Population size of zero.
  #[error("population size must be at least 1")]
  EmptyPopulation,

  /// A variation rate outside of `[0, 1]`, or rates that can never produce
  /// offspring.
  #[error("invalid variation rates: crossover {crossover}, mutation {mutation}")]
  InvalidRate {
    /// Configured crossover rate.
    crossover: f64,
    /// Configured mutation rate.
    mutation: f64,
  },

  /// Tournament of size zero.
  #[error("tournament size must be at least 1")]
  InvalidTournamentSize,

  /// An individual reached ranking without a score for a configured
  /// objective.
  #[error("individual #{index} has no score for objective `{objective}`")]
  MissingFitness {
    /// Position of the individual in the ranked set.
    index: usize,
    /// Name of the missing objective.
    objective: String,
  },

  /// A NaN or infinite score.
  #[error("individual #{index} has non-finite score {value} for `{objective}`")]
  InvalidFitness {
    /// Position of the individual in the ranked set.
    index: usize,
    /// Name of the objective.
    objective: String,
    /// The offending value.
    value: Score,
  },

  /// An evaluator returned a different number of scores than it was given
  /// individuals.
  #[error("evaluator `{objective}` returned {actual} scores for {expected} individuals")]
  EvaluationSize {
    /// Name of the objective.
    objective: String,
    /// Number of individuals submitted.
    expected: usize,
    /// Number of scores returned.
    actual: usize,
  },

  /// The initializer did not produce the requested number of genotypes.
  #[error("initializer produced {actual} genotypes, expected {expected}")]
  InitializationSize {
    /// Requested population size.
    expected: usize,
    /// Number of genotypes produced.
    actual: usize,
  },

  /// Writing a report failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}
