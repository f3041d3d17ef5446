//! Parent selection strategies.

use std::fmt;

use rand::Rng;

use crate::{
  error::{Error, Result},
  individual::Individual,
};

/// Picks a parent from the current population by tournament.
///
/// Both variants draw `k` individuals uniformly at random, with replacement,
/// and return the best one. Lower domination count always wins. The crowded
/// variant additionally breaks domination count ties in favour of the
/// individual with the higher crowding distance. If candidates are still
/// equal, the one sampled first wins.
///
/// # Examples
/// ```
/// # use pareto_gp::selection::Selection;
/// let s: Selection = "crowded_tournament".parse().unwrap();
/// assert!(s.is_crowded());
/// assert_eq!(Selection::from_name("tournament", 7).unwrap(), Selection::Tournament(7));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Selection {
  /// Compares domination counts only.
  Tournament(usize),
  /// Compares domination counts, then crowding distances.
  CrowdedTournament(usize),
}

impl Selection {
  /// Tournament size used when none is configured.
  pub const DEFAULT_SIZE: usize = 2;

  /// Identifier of [`Selection::Tournament`].
  pub const TOURNAMENT: &'static str = "tournament";

  /// Identifier of [`Selection::CrowdedTournament`].
  pub const CROWDED_TOURNAMENT: &'static str = "crowded_tournament";

  /// Builds a strategy from its configuration identifier.
  ///
  /// # Errors
  ///
  /// [`Error::UnknownSelection`] for unknown identifiers,
  /// [`Error::InvalidTournamentSize`] if `size` is 0.
  pub fn from_name(name: &str, size: usize) -> Result<Self> {
    if size == 0 {
      return Err(Error::InvalidTournamentSize);
    }
    match name {
      Self::TOURNAMENT => Ok(Self::Tournament(size)),
      Self::CROWDED_TOURNAMENT => Ok(Self::CrowdedTournament(size)),
      _ => Err(Error::UnknownSelection(name.to_owned())),
    }
  }

  /// Returns `true` if this strategy needs crowding distances. The engine
  /// only computes them, and only sorts by them, when it does.
  pub fn is_crowded(&self) -> bool {
    matches!(self, Self::CrowdedTournament(_))
  }

  /// Tournament size.
  pub fn size(&self) -> usize {
    match self {
      Self::Tournament(k) | Self::CrowdedTournament(k) => *k,
    }
  }

  /// Returns `true` if `challenger` beats `champion`.
  fn prefers<G>(
    &self,
    challenger: &Individual<G>,
    champion: &Individual<G>,
  ) -> bool {
    let (a, b) = (challenger.domination_count(), champion.domination_count());
    match self {
      Self::Tournament(_) => a < b,
      Self::CrowdedTournament(_) => {
        a < b
          || (a == b
            && challenger.crowding_distance() > champion.crowding_distance())
      }
    }
  }

  /// Selects a parent. Consumes exactly `size` draws from `rng` and never
  /// modifies the population.
  ///
  /// # Panics
  ///
  /// Panics if `population` is empty. The engine never calls it with an
  /// empty population.
  pub fn select<'a, G, R: Rng + ?Sized>(
    &self,
    population: &'a [Individual<G>],
    rng: &mut R,
  ) -> &'a Individual<G> {
    assert!(!population.is_empty(), "cannot select from empty population");
    let mut champion = &population[rng.gen_range(0..population.len())];
    for _ in 1..self.size().max(1) {
      let challenger = &population[rng.gen_range(0..population.len())];
      if self.prefers(challenger, champion) {
        champion = challenger;
      }
    }
    champion
  }
}

impl Default for Selection {
  fn default() -> Self {
    Self::CrowdedTournament(Self::DEFAULT_SIZE)
  }
}

impl std::str::FromStr for Selection {
  type Err = Error;

  /// Parses an identifier with the default tournament size.
  fn from_str(s: &str) -> Result<Self> {
    Self::from_name(s, Self::DEFAULT_SIZE)
  }
}

impl fmt::Display for Selection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Tournament(k) => write!(f, "{}({k})", Self::TOURNAMENT),
      Self::CrowdedTournament(k) => write!(f, "{}({k})", Self::CROWDED_TOURNAMENT),
    }
  }
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;

  fn ranked(genotype: u32, count: usize, distance: f64) -> Individual<u32> {
    let mut individual = Individual::new(genotype);
    individual.set_domination_count(count);
    individual.set_crowding_distance(distance);
    individual
  }

  #[test]
  fn test_from_name() {
    assert_eq!(
      Selection::from_name("tournament", 3).unwrap(),
      Selection::Tournament(3)
    );
    assert!(Selection::from_name("crowded_tournament", 3)
      .unwrap()
      .is_crowded());
    assert!(matches!(
      Selection::from_name("roulette", 3),
      Err(Error::UnknownSelection(n)) if n == "roulette"
    ));
    assert!(matches!(
      Selection::from_name("tournament", 0),
      Err(Error::InvalidTournamentSize)
    ));
  }

  #[test]
  fn test_crowded_prefers_higher_distance_on_tie() {
    let s = Selection::CrowdedTournament(2);
    let near = ranked(0, 1, 0.5);
    let far = ranked(1, 1, 2.0);
    assert!(s.prefers(&far, &near));
    assert!(!s.prefers(&near, &far));
    // equal on both keys, first sampled stays
    assert!(!s.prefers(&near, &near.clone()));
  }

  #[test]
  fn test_lower_count_beats_any_distance() {
    let dominated = ranked(0, 2, f64::INFINITY);
    let front = ranked(1, 0, 0.0);
    for s in [Selection::Tournament(2), Selection::CrowdedTournament(2)] {
      assert!(s.prefers(&front, &dominated));
      assert!(!s.prefers(&dominated, &front));
    }
  }

  #[test]
  fn test_plain_tournament_ignores_distance() {
    let s = Selection::Tournament(2);
    assert!(!s.prefers(&ranked(0, 1, 9.0), &ranked(1, 1, 0.0)));
  }

  #[test]
  fn test_exhaustive_tournament_finds_best() {
    let population = vec![
      ranked(0, 3, 0.0),
      ranked(1, 0, 1.0),
      ranked(2, 0, 4.0),
      ranked(3, 1, 9.0),
    ];
    let mut rng = StdRng::seed_from_u64(42);
    // a large tournament samples every individual with near certainty
    let best = Selection::CrowdedTournament(200).select(&population, &mut rng);
    assert_eq!(*best.genotype(), 2);
  }

  #[test]
  fn test_select_is_reproducible() {
    let population: Vec<_> =
      (0..10).map(|i| ranked(i, (i % 3) as usize, f64::from(i))).collect();
    let picks = |seed| {
      let mut rng = StdRng::seed_from_u64(seed);
      (0..20)
        .map(|_| *Selection::Tournament(3).select(&population, &mut rng).genotype())
        .collect::<Vec<_>>()
    };
    assert_eq!(picks(7), picks(7));
  }
}
