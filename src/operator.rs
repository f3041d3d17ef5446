//! Parallelization wrappers for objectives.
//!
//! Wrapping an [`Objective`] with [`par_each()`] or [`par_batch()`] only tags
//! it; the evaluation executor then scores individuals on the [rayon] thread
//! pool. Everything else in the engine stays sequential, so the random
//! stream is consumed in the same order no matter how objectives are run.
//!
//! [`Objective`]: crate::objective::Objective
//! [`par_each()`]: IntoPar::par_each
//! [`par_batch()`]: IntoPar::par_batch

use std::marker::PhantomData;

use crate::objective::Objective;

/// A wrapper around an operator that marks it to be executed in parallel for
/// **each** individual.
pub struct ParEach<G, O> {
  operator: O,
  _genotype: PhantomData<fn(&G)>,
}

impl<G, O> ParEach<G, O> {
  pub(crate) fn operator(&self) -> &O {
    &self.operator
  }
}

/// A wrapper around an operator that marks it to be executed in parallel for
/// each **batch** of individuals.
pub struct ParBatch<G, O> {
  operator: O,
  _genotype: PhantomData<fn(&G)>,
}

impl<G, O> ParBatch<G, O> {
  pub(crate) fn operator(&self) -> &O {
    &self.operator
  }
}

/// Converts an objective into a parallelized one.
pub trait IntoPar<G>: Sized {
  /// Creates a wrapper around given objective that marks it to be executed
  /// in parallel for **each** individual.
  ///
  /// **Parallelization is implemented with [rayon]. For cheap objectives it
  /// may only add overhead. Benchmark if in doubt.**
  fn par_each(self) -> ParEach<G, Self> {
    ParEach {
      operator: self,
      _genotype: PhantomData,
    }
  }

  /// Creates a wrapper around given objective that marks it to be executed
  /// in parallel for each **batch** of individuals. Batches are sized so the
  /// work is split evenly across available threads.
  ///
  /// **Parallelization is implemented with [rayon]. For cheap objectives it
  /// may only add overhead. Benchmark if in doubt.**
  fn par_batch(self) -> ParBatch<G, Self> {
    ParBatch {
      operator: self,
      _genotype: PhantomData,
    }
  }
}

impl<G, O: Objective<G>> IntoPar<G> for O {}
