//! Crossover operators.

use rand::RngCore;

/// An operator that recombines two parent genotypes into zero or more
/// children.
///
/// The engine keeps only as many children as it still needs to fill the
/// offspring pool, the rest is discarded.
///
/// # Examples
/// ```
/// # use pareto_gp::crossover::Crossover;
/// use rand::{Rng, RngCore};
/// // blend two real-valued genotypes
/// let c = |a: &f64, b: &f64, rng: &mut dyn RngCore| {
///   let r: f64 = rng.gen();
///   vec![a + r * (b - a), b + r * (a - b)]
/// };
/// # fn takes<C: Crossover<f64>>(_: &C) {}
/// # takes(&c);
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Crossover<G> {
  /// Returns the children of `a` and `b`.
  fn crossover(&self, a: &G, b: &G, rng: &mut dyn RngCore) -> Vec<G>;
}

impl<G, F> Crossover<G> for F
where
  F: Fn(&G, &G, &mut dyn RngCore) -> Vec<G>,
{
  fn crossover(&self, a: &G, b: &G, rng: &mut dyn RngCore) -> Vec<G> {
    self(a, b, rng)
  }
}

/// A crossover that never produces children. With it, offspring only come
/// from mutation.
///
/// **Pair it with a non-zero mutation rate.** A crossover attempt that yields
/// no child is not retried differently, so with a mutation rate of 0 the
/// offspring pool never fills up and the engine never returns.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct NoCrossover;

impl<G> Crossover<G> for NoCrossover {
  fn crossover(&self, _: &G, _: &G, _: &mut dyn RngCore) -> Vec<G> {
    Vec::new()
  }
}
