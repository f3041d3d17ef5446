//! **pareto-gp** is the control engine of a multi-objective evolutionary
//! search. It ranks a population by Pareto dominance, keeps it diverse with
//! crowding distances, breeds offspring and replaces the worst half of
//! parents and offspring combined, generation after generation, until the
//! search converges or its budget runs out.
//!
//! Here's a [quick start example](#example) for the impatient.
//!
//! The engine knows nothing about what it evolves. Genotypes are opaque
//! values of any type `G`, and everything that looks inside of them is
//! supplied by you:
//! - An [`Initialization`] creates the first generation
//! - A [`Crossover`] recombines two parents into any number of children
//! - A [`Mutation`] derives exactly one child from one parent
//! - An [`Objective`] or an [`Evaluator`] scores genotypes, lower is better
//!
//! The engine itself handles everything in between:
//! 1. **Select** parents by tournament, see [`Selection`]
//! 2. **Vary** them with crossover or mutation, see [`Variation`]
//! 3. **Evaluate** the offspring on every registered objective
//! 4. **Rank** parents and offspring together by [domination count], then by
//!    [crowding distance] if the selection needs it
//! 5. **Truncate** back to the configured population size
//! 6. **Pick** the generation's best individual, see [`BestPolicy`]
//! 7. **Stop** if a [`ConvergencePolicy`] says so, or after the last
//!    generation
//!
//! # Closures
//!
//! Each collaborator trait is implemented for closures of the matching
//! signature. For example, an [`Objective`] takes a reference to a genotype
//! and returns a [`Score`], so instead of implementing the trait for some
//! struct you can just write a closure of type `Fn(&G) -> f64`.
//!
//! Note, however, that closures have to be annotated with their argument
//! types, otherwise the compiler won't be able to tell which trait you're
//! after. If you're struggling with a closure, implement the trait directly
//! instead. Neither approach is less performant.
//!
//! # Parallelization
//!
//! Evaluation is usually the bottleneck of a search, so objectives can be
//! evaluated in parallel by calling [`par_each()`] or [`par_batch()`] on
//! them. The first evaluates each individual as its own task, the second
//! splits the population in one batch per thread. Everything else runs
//! sequentially, drawing from one random stream in a fixed order, so two
//! runs with the same seed produce the same results.
//! ```
//! # use pareto_gp::{objective::Objectives, operator::IntoPar};
//! let objectives = Objectives::<f64>::new()
//!   .with("f1", (|x: &f64| x.powi(2)).par_batch())?;
//! # Ok::<(), pareto_gp::Error>(())
//! ```
//!
//! # Example
//!
//! Here's a solution for the textbook *Schaffer's Problem No.1*. The engine
//! finds the Pareto optimal set `0 <= x <= 2` in a few generations.
//! ```
//! use pareto_gp::{
//!   config::EngineConfig,
//!   engine::Engine,
//!   objective::Objectives,
//!   selection::Selection,
//! };
//! use rand::{Rng, RngCore};
//!
//! // objective functions `f1(x) = x^2` and `f2(x) = (x - 2)^2`
//! let objectives = Objectives::<f64>::new()
//!   .with("f1", |x: &f64| x.powi(2))?
//!   .with("f2", |x: &f64| (x - 2.0).powi(2))?;
//! let config = EngineConfig::builder()
//!   .population_size(50)
//!   .generations(30)
//!   .crossover_rate(0.7)
//!   .mutation_rate(0.3)
//!   .selection(Selection::CrowdedTournament(2))
//!   .objectives(["f1", "f2"])
//!   .seed(42)
//!   .build();
//! let engine = Engine::builder()
//!   .config(config)
//!   .objectives(objectives)
//!   // initial genotypes lie between -100 and 100
//!   .initializer(|n: usize, rng: &mut dyn RngCore| -> Vec<f64> {
//!     (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect()
//!   })
//!   // a child somewhere on the line through both parents
//!   .crossover(|a: &f64, b: &f64, rng: &mut dyn RngCore| {
//!     vec![a + rng.gen_range(-0.5..1.5) * (b - a)]
//!   })
//!   .mutation(|x: &f64, rng: &mut dyn RngCore| x + rng.gen_range(-1.0..1.0))
//!   .build();
//! let report = engine.run()?;
//! for individual in report.front() {
//!   println!("{} {:?}", individual.genotype(), individual.fitness());
//! }
//! # Ok::<(), pareto_gp::Error>(())
//! ```
//!
//! You can find a longer example in the *demos* folder in the root of the
//! project.
//!
//! [domination count]: crate::ranking::rank
//! [crowding distance]: crate::crowding::assign_crowding_distances
//! [`par_each()`]: crate::operator::IntoPar::par_each
//! [`par_batch()`]: crate::operator::IntoPar::par_batch

#![warn(missing_docs)]

pub mod best;
pub mod config;
pub mod convergence;
pub mod crossover;
pub mod crowding;
pub mod engine;
pub mod error;
mod execution;
pub mod individual;
pub mod initialization;
pub mod mutation;
pub mod objective;
pub mod operator;
pub mod population;
pub mod ranking;
pub mod report;
pub mod score;
pub mod selection;
pub mod variation;

pub use crate::{
  best::BestPolicy,
  config::EngineConfig,
  convergence::{ConvergencePolicy, StopReason},
  crossover::Crossover,
  engine::{Engine, EngineState},
  error::{Error, Result},
  individual::{Fitness, Individual},
  initialization::Initialization,
  mutation::Mutation,
  objective::{Evaluator, Objective, Objectives},
  population::Population,
  report::RunReport,
  score::Score,
  selection::Selection,
  variation::Variation,
};
