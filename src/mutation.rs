//! Mutation operators.

use rand::RngCore;

/// An operator that derives exactly one child from a parent genotype. The
/// parent is left untouched.
///
/// # Examples
/// ```
/// # use pareto_gp::mutation::Mutation;
/// use rand::{Rng, RngCore};
/// let m = |g: &f64, rng: &mut dyn RngCore| g + rng.gen_range(-1.0..1.0);
/// # fn takes<M: Mutation<f64>>(_: &M) {}
/// # takes(&m);
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Mutation<G> {
  /// Returns a mutated copy of `parent`.
  fn mutate(&self, parent: &G, rng: &mut dyn RngCore) -> G;
}

impl<G, F> Mutation<G> for F
where
  F: Fn(&G, &mut dyn RngCore) -> G,
{
  fn mutate(&self, parent: &G, rng: &mut dyn RngCore) -> G {
    self(parent, rng)
  }
}

/// A mutation that returns an exact copy of its parent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Replication;

impl<G: Clone> Mutation<G> for Replication {
  fn mutate(&self, parent: &G, _: &mut dyn RngCore) -> G {
    parent.clone()
  }
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;

  fn takes_mutation<M: Mutation<i32>>(m: &M) -> i32 {
    m.mutate(&7, &mut StdRng::seed_from_u64(0))
  }

  #[test]
  fn test_mutation_from_closure() {
    let m = |g: &i32, _: &mut dyn RngCore| g * 2;
    assert_eq!(takes_mutation(&m), 14);
  }

  #[test]
  fn test_replication() {
    assert_eq!(takes_mutation(&Replication), 7);
  }
}
