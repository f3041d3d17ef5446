//! Initial population operators.

use rand::RngCore;

/// An operator that creates the genotypes of the initial population.
///
/// It receives the engine's random stream, so a seeded run is reproducible
/// as long as the operator draws all its randomness from `rng`.
///
/// # Examples
/// ```
/// # use pareto_gp::initialization::Initialization;
/// use rand::{Rng, RngCore};
/// let i = |size: usize, rng: &mut dyn RngCore| -> Vec<f64> {
///   (0..size).map(|_| rng.gen_range(-10.0..10.0)).collect()
/// };
/// # fn takes<I: Initialization<f64>>(_: &I) {}
/// # takes(&i);
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Initialization<G> {
  /// Returns exactly `size` fresh genotypes.
  fn initialize(&self, size: usize, rng: &mut dyn RngCore) -> Vec<G>;
}

impl<G, F> Initialization<G> for F
where
  F: Fn(usize, &mut dyn RngCore) -> Vec<G>,
{
  fn initialize(&self, size: usize, rng: &mut dyn RngCore) -> Vec<G> {
    self(size, rng)
  }
}

/// Initializes the population from a fixed list of genotypes, e.g. seeds
/// produced by a previous run. Cycles through the list if it is shorter
/// than requested.
#[derive(Clone, Debug, PartialEq)]
pub struct SeededInitialization<G>(pub Vec<G>);

impl<G: Clone> Initialization<G> for SeededInitialization<G> {
  fn initialize(&self, size: usize, _: &mut dyn RngCore) -> Vec<G> {
    self.0.iter().cycle().take(size).cloned().collect()
  }
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, Rng, SeedableRng};

  use super::*;

  fn takes_initialization<I: Initialization<u32>>(i: &I) -> Vec<u32> {
    i.initialize(5, &mut StdRng::seed_from_u64(0))
  }

  #[test]
  fn test_initialization_from_closure() {
    let i = |size: usize, rng: &mut dyn RngCore| -> Vec<u32> {
      (0..size).map(|_| rng.gen_range(0..10)).collect()
    };
    assert_eq!(takes_initialization(&i).len(), 5);
    assert_eq!(takes_initialization(&i), takes_initialization(&i));
  }

  #[test]
  fn test_seeded_initialization_cycles() {
    let i = SeededInitialization(vec![1, 2]);
    assert_eq!(takes_initialization(&i), vec![1, 2, 1, 2, 1]);
    assert!(SeededInitialization::<u32>(vec![])
      .initialize(3, &mut StdRng::seed_from_u64(0))
      .is_empty());
  }
}
