//! Type aliases and comparisons for fitness scores used throughout the
//! library.

use std::cmp::Ordering;

/// An alias for a fitness score.
///
/// Every objective is minimized: the lower a score is, the better. If a
/// fitness function naturally grows towards its goal, negate it or subtract
/// it from its upper bound before handing it to the engine.
pub type Score = f64;

/// Describes pareto dominance for slices of `Score`s.
pub(crate) trait ParetoDominance {
  /// Returns `Less` if `self` dominates `other`, `Greater` if `other`
  /// dominates `self`, otherwise `Equal`. `self` dominates `other` if no
  /// `self` value is greater than the respective `other` value and at least
  /// one is strictly less.
  ///
  /// Scores must be comparable. Non-comparable pairs are treated as equal.
  fn dominance(&self, other: &Self) -> Ordering;
}

impl ParetoDominance for [Score] {
  fn dominance(&self, other: &Self) -> Ordering {
    let mut ord = Ordering::Equal;
    for (a, b) in self.iter().zip(other) {
      match (ord, a.partial_cmp(b).unwrap_or(Ordering::Equal)) {
        (Ordering::Equal, next_ord) => ord = next_ord,
        (Ordering::Greater, Ordering::Less)
        | (Ordering::Less, Ordering::Greater) => return Ordering::Equal,
        _ => {}
      }
    }
    ord
  }
}

#[cfg(test)]
mod tests {
  use std::cmp::Ordering;

  use super::*;

  #[test]
  fn test_pareto_dominance() {
    assert_eq!([1.0, 2.0, 3.0].dominance(&[1.0, 2.0, 3.0]), Ordering::Equal);
    assert_eq!([1.0, 2.0, 3.0].dominance(&[3.0, 2.0, 1.0]), Ordering::Equal);
    assert_eq!([1.0, 4.0].dominance(&[2.0, 3.0]), Ordering::Equal);

    assert_eq!(
      [10.0, 2.0, 3.0].dominance(&[1.0, 2.0, 3.0]),
      Ordering::Greater
    );
    assert_eq!(
      [1.0, 2.0, 30.0].dominance(&[1.0, 2.0, 3.0]),
      Ordering::Greater
    );

    assert_eq!([1.0, 2.0, 3.0].dominance(&[10.0, 2.0, 3.0]), Ordering::Less);
    assert_eq!([1.0, 2.0, 3.0].dominance(&[1.0, 20.0, 3.0]), Ordering::Less);
    assert_eq!([1.0, 4.0].dominance(&[5.0, 5.0]), Ordering::Less);

    assert_eq!([0.0; 0].dominance(&[0.0; 0]), Ordering::Equal);
  }

  #[test]
  fn test_negative_scores_are_not_folded() {
    // lower is better, there's no target at zero
    assert_eq!([-5.0, 1.0].dominance(&[5.0, 1.0]), Ordering::Less);
    assert_eq!([-1.0, -1.0].dominance(&[-2.0, -2.0]), Ordering::Greater);
  }
}
