//! Early stopping.

use std::fmt;

use crate::score::Score;

/// Why a run stopped.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
  /// The best score exceeded the policy's threshold.
  Threshold,
  /// The best score stayed exactly the same for too many generations.
  Plateau,
  /// The configured number of generations was reached.
  GenerationLimit,
}

impl fmt::Display for StopReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Threshold => f.write_str("threshold reached"),
      Self::Plateau => f.write_str("plateau reached"),
      Self::GenerationLimit => f.write_str("generation limit reached"),
    }
  }
}

/// When to stop a run before its generation budget is exhausted. Every
/// check looks at the best individual's score on the primary objective.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConvergencePolicy {
  /// Runs for the full budget.
  #[default]
  Never,
  /// Stops once the score exceeds `threshold`.
  Threshold {
    /// Exclusive lower bound of a converged score.
    threshold: Score,
  },
  /// Stops once the score exceeds `threshold`, or once it hasn't changed
  /// for `patience` consecutive generations.
  ThresholdOrPlateau {
    /// Exclusive lower bound of a converged score.
    threshold: Score,
    /// Number of unchanged generations tolerated.
    patience: usize,
  },
}

impl ConvergencePolicy {
  /// Threshold of accuracy-style objectives.
  pub const ACCURACY_THRESHOLD: Score = 0.999;

  /// Threshold of ROC-style objectives.
  pub const ROC_THRESHOLD: Score = 0.99;

  /// Plateau length of ROC-style objectives.
  pub const ROC_PATIENCE: usize = 15;

  /// Derives a policy from the identifier of the primary objective. Unknown
  /// identifiers never converge early.
  ///
  /// # Examples
  /// ```
  /// # use pareto_gp::convergence::ConvergencePolicy;
  /// assert_eq!(
  ///   ConvergencePolicy::for_objective("sr_roc"),
  ///   ConvergencePolicy::ThresholdOrPlateau { threshold: 0.99, patience: 15 }
  /// );
  /// assert_eq!(
  ///   ConvergencePolicy::for_objective("size"),
  ///   ConvergencePolicy::Never
  /// );
  /// ```
  pub fn for_objective(name: &str) -> Self {
    match name {
      "sr_fitness" | "sr_fitness_dual" | "sr_correlation"
      | "sr_correlation_dual" => Self::Threshold {
        threshold: Self::ACCURACY_THRESHOLD,
      },
      "sr_roc" => Self::ThresholdOrPlateau {
        threshold: Self::ROC_THRESHOLD,
        patience: Self::ROC_PATIENCE,
      },
      _ => Self::Never,
    }
  }
}

/// Tracks the best score across generations and applies a
/// [`ConvergencePolicy`] to it.
#[derive(Clone, Debug)]
pub struct ConvergenceMonitor {
  policy: ConvergencePolicy,
  last: Option<Score>,
  unchanged: usize,
}

impl ConvergenceMonitor {
  /// Creates a monitor that hasn't observed anything yet.
  pub fn new(policy: ConvergencePolicy) -> Self {
    Self {
      policy,
      last: None,
      unchanged: 0,
    }
  }

  /// Monitored policy.
  pub fn policy(&self) -> ConvergencePolicy {
    self.policy
  }

  /// Number of consecutive observations equal to their predecessor.
  pub fn unchanged(&self) -> usize {
    self.unchanged
  }

  /// Records the score of a generation and tells whether to stop.
  ///
  /// Scores are compared with `==`, so any change, however small, resets
  /// the plateau counter.
  pub fn observe(&mut self, score: Score) -> Option<StopReason> {
    if self.last == Some(score) {
      self.unchanged += 1;
    } else {
      self.unchanged = 0;
      self.last = Some(score);
    }
    match self.policy {
      ConvergencePolicy::Never => None,
      ConvergencePolicy::Threshold { threshold } => {
        (score > threshold).then_some(StopReason::Threshold)
      }
      ConvergencePolicy::ThresholdOrPlateau {
        threshold,
        patience,
      } => {
        if score > threshold {
          Some(StopReason::Threshold)
        } else if self.unchanged >= patience {
          Some(StopReason::Plateau)
        } else {
          None
        }
      }
    }
  }
}
