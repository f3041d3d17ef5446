//! The generational loop.

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use typed_builder::TypedBuilder;

use crate::{
  config::EngineConfig,
  convergence::{ConvergenceMonitor, StopReason},
  crossover::Crossover,
  crowding::assign_crowding_distances,
  error::{Error, Result},
  individual::Individual,
  initialization::Initialization,
  mutation::Mutation,
  objective::Objectives,
  population::Population,
  ranking::rank,
  report::{GenerationStats, RunReport},
  score::Score,
  variation::Variation,
};

/// Lifecycle of an [`EngineState`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Phase {
  /// Created, the next step builds the initial population.
  Initializing,
  /// Ready for the next step.
  Stepping,
  /// Converged or out of generations.
  Stopped,
}

/// Everything that changes while a run progresses.
///
/// States are independent of each other and of the [`Engine`] that created
/// them, so one engine can drive several runs at once.
#[derive(Clone, Debug)]
pub struct EngineState<G, R> {
  population: Population<G>,
  pareto_front: Vec<usize>,
  best: Option<usize>,
  history: Vec<Individual<G>>,
  generation: usize,
  monitor: ConvergenceMonitor,
  rng: R,
  phase: Phase,
  stop_reason: Option<StopReason>,
}

impl<G, R> EngineState<G, R> {
  /// Current population, ranked.
  pub fn population(&self) -> &Population<G> {
    &self.population
  }

  /// Indices of the current Pareto front in [`population`](Self::population).
  pub fn pareto_front(&self) -> &[usize] {
    &self.pareto_front
  }

  /// Best individual of the current population, once there is one.
  pub fn best(&self) -> Option<&Individual<G>> {
    self.best.map(|idx| &self.population[idx])
  }

  /// Best individual of the initial population, then one per generation.
  pub fn history(&self) -> &[Individual<G>] {
    &self.history
  }

  /// Number of completed steps.
  pub fn generation(&self) -> usize {
    self.generation
  }

  /// Convergence bookkeeping.
  pub fn monitor(&self) -> &ConvergenceMonitor {
    &self.monitor
  }

  /// Current phase.
  pub fn phase(&self) -> Phase {
    self.phase
  }

  /// Why the run stopped, once it has.
  pub fn stop_reason(&self) -> Option<StopReason> {
    self.stop_reason
  }

  /// Returns `true` once no more steps should be taken.
  pub fn is_stopped(&self) -> bool {
    self.phase == Phase::Stopped
  }

  /// Adds already evaluated individuals from elsewhere, e.g. another island.
  /// They compete with the offspring on the next step, after which the
  /// population is back to its configured size.
  pub fn accept_migrants(
    &mut self,
    migrants: impl IntoIterator<Item = Individual<G>>,
  ) {
    let before = self.population.len();
    migrants
      .into_iter()
      .for_each(|migrant| self.population.push(migrant));
    debug!("accepted {} migrants", self.population.len() - before);
  }

  /// Finishes the run.
  pub fn into_report(
    self,
    primary_objective: impl Into<String>,
  ) -> RunReport<G> {
    RunReport {
      population: self.population,
      pareto_front: self.pareto_front,
      history: self.history,
      stop_reason: self.stop_reason.unwrap_or(StopReason::GenerationLimit),
      generations: self.generation,
      primary_objective: primary_objective.into(),
    }
  }
}

/// Multi-objective evolutionary engine with μ+λ replacement.
///
/// Every step produces as many offspring as there are parents, evaluates
/// them, ranks parents and offspring together by domination count and keeps
/// the best half.
///
/// # Examples
/// ```
/// # use pareto_gp::{
/// #   config::EngineConfig, engine::Engine, mutation::Replication,
/// #   objective::Objectives,
/// # };
/// use rand::{Rng, RngCore};
///
/// let objectives = Objectives::<f64>::new()
///   .with("f1", |x: &f64| x.powi(2))?
///   .with("f2", |x: &f64| (x - 2.0).powi(2))?;
/// let engine = Engine::builder()
///   .config(
///     EngineConfig::builder()
///       .population_size(20)
///       .generations(10)
///       .crossover_rate(0.5)
///       .mutation_rate(0.5)
///       .objectives(["f1", "f2"])
///       .build(),
///   )
///   .objectives(objectives)
///   .initializer(|n: usize, rng: &mut dyn RngCore| -> Vec<f64> {
///     (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect()
///   })
///   .crossover(|a: &f64, b: &f64, _: &mut dyn RngCore| vec![(a + b) / 2.0])
///   .mutation(Replication)
///   .build();
/// let report = engine.run()?;
/// assert_eq!(report.population.len(), 20);
/// # Ok::<(), pareto_gp::Error>(())
/// ```
#[derive(TypedBuilder)]
pub struct Engine<G, Ini, Crs, Mut> {
  config: EngineConfig,
  objectives: Objectives<G>,
  initializer: Ini,
  crossover: Crs,
  mutation: Mut,
}

impl<G, Ini, Crs, Mut> Engine<G, Ini, Crs, Mut>
where
  G: Clone,
  Ini: Initialization<G>,
  Crs: Crossover<G>,
  Mut: Mutation<G>,
{
  /// Run parameters.
  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// Registered objectives.
  pub fn objectives(&self) -> &Objectives<G> {
    &self.objectives
  }

  fn primary_objective(&self) -> &str {
    self.config.primary_objective().unwrap_or_default()
  }

  /// Checks the configuration against the objective registry.
  ///
  /// # Errors
  ///
  /// Whatever [`EngineConfig::validate`] reports, and
  /// [`Error::UnknownObjective`] for configured objectives without an
  /// evaluator.
  pub fn validate(&self) -> Result<Variation> {
    self.config.validate()?;
    if let Some(name) = self
      .config
      .objectives
      .iter()
      .find(|name| !self.objectives.contains(name))
    {
      return Err(Error::UnknownObjective(name.clone()));
    }
    self.config.variation()
  }

  /// Validates the configuration and creates an empty state in
  /// [`Phase::Initializing`]. Its first [`step`](Self::step) builds the
  /// initial population.
  ///
  /// # Errors
  ///
  /// See [`validate`](Self::validate).
  pub fn start<R: Rng>(&self, rng: R) -> Result<EngineState<G, R>> {
    self.validate()?;
    Ok(EngineState {
      population: Population::new(),
      pareto_front: vec![],
      best: None,
      history: vec![],
      generation: 0,
      monitor: ConvergenceMonitor::new(self.config.convergence_policy()),
      rng,
      phase: Phase::Initializing,
      stop_reason: None,
    })
  }

  /// Builds, evaluates and ranks the initial population.
  ///
  /// # Errors
  ///
  /// Configuration errors, [`Error::InitializationSize`] if the initializer
  /// doesn't deliver the configured number of genotypes, and any evaluation
  /// or ranking error.
  pub fn initialize<R: Rng>(&self, rng: R) -> Result<EngineState<G, R>> {
    let mut state = self.start(rng)?;
    self.step(&mut state)?;
    Ok(state)
  }

  /// Advances `state` by one phase: builds the initial population of a
  /// started state, breeds the next generation of a stepping one and leaves
  /// a stopped one untouched.
  ///
  /// # Errors
  ///
  /// Any evaluation or ranking error. The state then still holds the
  /// previous generation, but the random stream has moved on, so the run
  /// can't be resumed reproducibly.
  pub fn step<R: Rng>(&self, state: &mut EngineState<G, R>) -> Result<()> {
    match state.phase {
      Phase::Initializing => self.populate(state),
      Phase::Stepping => self.breed(state),
      Phase::Stopped => Ok(()),
    }
  }

  fn populate<R: Rng>(&self, state: &mut EngineState<G, R>) -> Result<()> {
    let size = self.config.population_size;
    let genotypes = self.initializer.initialize(size, &mut state.rng);
    if genotypes.len() != size {
      return Err(Error::InitializationSize {
        expected: size,
        actual: genotypes.len(),
      });
    }
    let mut population = Population::from_genotypes(genotypes);
    self
      .objectives
      .evaluate_all(&self.config.objectives, &mut population)?;
    let (population, best) = self.survivors(population)?;

    state.pareto_front = population.pareto_front();
    state.history.push(population[best].clone());
    state.population = population;
    state.best = Some(best);
    state.phase = Phase::Stepping;
    if self.config.generations == 0 {
      self.stop(state, StopReason::GenerationLimit);
    }
    Ok(())
  }

  fn breed<R: Rng>(&self, state: &mut EngineState<G, R>) -> Result<()> {
    let variation = self.config.variation()?;
    let size = self.config.population_size;
    let mut offspring = variation.offspring(
      &state.population,
      size,
      &self.config.selection,
      &self.crossover,
      &self.mutation,
      &mut state.rng,
    );
    self
      .objectives
      .evaluate_all(&self.config.objectives, &mut offspring)?;
    let pool = state.population.clone().merge(offspring);
    let (population, best) = self.survivors(pool)?;
    let score = self.primary_score(&population, best)?;

    state.pareto_front = population.pareto_front();
    state.history.push(population[best].clone());
    state.population = population;
    state.best = Some(best);
    state.generation += 1;

    info!(
      "generation {}: best {} = {score}",
      state.generation,
      self.primary_objective()
    );
    if let Some(stats) =
      GenerationStats::of(&state.population, self.primary_objective())
    {
      debug!("generation {}: {stats}", state.generation);
    }
    debug!(
      "generation {}: pareto front of {}",
      state.generation,
      state.pareto_front.len()
    );

    if let Some(reason) = state.monitor.observe(score) {
      self.stop(state, reason);
    } else if state.generation >= self.config.generations {
      self.stop(state, StopReason::GenerationLimit);
    }
    Ok(())
  }

  /// Runs from a random stream seeded with the configured seed.
  ///
  /// # Errors
  ///
  /// See [`run_with`](Self::run_with).
  pub fn run(&self) -> Result<RunReport<G>> {
    info!("seed {}", self.config.seed);
    self.run_with(StdRng::seed_from_u64(self.config.seed))
  }

  /// Runs until convergence or until the generation budget is spent.
  ///
  /// # Errors
  ///
  /// See [`initialize`](Self::initialize) and [`step`](Self::step).
  pub fn run_with<R: Rng>(&self, rng: R) -> Result<RunReport<G>> {
    info!(
      "evolving {} individuals for up to {} generations",
      self.config.population_size, self.config.generations
    );
    let mut state = self.initialize(rng)?;
    while !state.is_stopped() {
      self.step(&mut state)?;
    }
    Ok(state.into_report(self.primary_objective()))
  }

  /// Ranks `pool`, keeps its best `population_size` members and picks the
  /// best individual among them.
  fn survivors(
    &self,
    mut pool: Population<G>,
  ) -> Result<(Population<G>, usize)> {
    let objectives = &self.config.objectives;
    rank(&mut pool, objectives)?;
    let crowded = self.config.selection.is_crowded();
    if crowded {
      assign_crowding_distances(&mut pool, objectives)?;
    }
    pool.sort_ranked(crowded);
    pool.truncate(self.config.population_size);
    let best = self.config.best_policy.pick(&mut pool, objectives)?;
    Ok((pool, best))
  }

  fn primary_score(
    &self,
    population: &[Individual<G>],
    index: usize,
  ) -> Result<Score> {
    let name = self.primary_objective();
    population[index]
      .score(name)
      .ok_or_else(|| Error::MissingFitness {
        index,
        objective: name.to_owned(),
      })
  }

  fn stop<R>(&self, state: &mut EngineState<G, R>, reason: StopReason) {
    info!("stopped after {} generations: {reason}", state.generation);
    state.phase = Phase::Stopped;
    state.stop_reason = Some(reason);
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use rand::RngCore;

  use super::*;
  use crate::{
    best::BestPolicy,
    convergence::ConvergencePolicy,
    crossover::NoCrossover,
    mutation::Replication,
    selection::Selection,
  };

  type Genotype = i64;

  fn init(n: usize, rng: &mut dyn RngCore) -> Vec<Genotype> {
    (0..n).map(|_| rng.gen_range(-100..100)).collect()
  }

  fn mutate(g: &Genotype, rng: &mut dyn RngCore) -> Genotype {
    g + rng.gen_range(-5..=5)
  }

  /// Schaffer's first problem on integers.
  fn objectives() -> Objectives<Genotype> {
    Objectives::<Genotype>::new()
      .with("f1", |x: &Genotype| (x * x) as Score)
      .unwrap()
      .with("f2", |x: &Genotype| ((x - 2) * (x - 2)) as Score)
      .unwrap()
  }

  fn config() -> EngineConfig {
    EngineConfig::builder()
      .population_size(12)
      .generations(8)
      .crossover_rate(0.6)
      .mutation_rate(0.3)
      .objectives(["f1", "f2"])
      .seed(17)
      .build()
  }

  fn engine(
    config: EngineConfig,
  ) -> Engine<
    Genotype,
    fn(usize, &mut dyn RngCore) -> Vec<Genotype>,
    impl Crossover<Genotype>,
    fn(&Genotype, &mut dyn RngCore) -> Genotype,
  > {
    Engine::builder()
      .config(config)
      .objectives(objectives())
      .initializer(init as fn(usize, &mut dyn RngCore) -> Vec<Genotype>)
      // over-produces on purpose
      .crossover(|a: &Genotype, b: &Genotype, _: &mut dyn RngCore| {
        vec![(a + b) / 2, a - b, b - a]
      })
      .mutation(mutate as fn(&Genotype, &mut dyn RngCore) -> Genotype)
      .build()
  }

  #[test]
  fn test_population_size_is_kept() {
    let engine = engine(config());
    let mut state = engine.initialize(StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(state.phase(), Phase::Stepping);
    assert_eq!(state.population().len(), 12);
    for generation in 1..=8 {
      engine.step(&mut state).unwrap();
      assert_eq!(state.population().len(), 12);
      assert_eq!(state.generation(), generation);
      assert_eq!(state.history().len(), generation + 1);
    }
    assert!(state.is_stopped());
    assert_eq!(state.stop_reason(), Some(StopReason::GenerationLimit));
  }

  #[test]
  fn test_front_is_over_new_population() {
    let engine = engine(config());
    let mut state = engine.initialize(StdRng::seed_from_u64(2)).unwrap();
    engine.step(&mut state).unwrap();
    let front = state.pareto_front();
    assert!(!front.is_empty());
    assert!(front.iter().all(|&idx| idx < 12));
    assert!(front
      .iter()
      .all(|&idx| state.population()[idx].is_nondominated()));
    // ranked order puts the front first
    assert_eq!(front, (0..front.len()).collect::<Vec<_>>());
  }

  #[test]
  fn test_same_seed_same_history() {
    let history = |seed| {
      let config = EngineConfig {
        seed,
        ..config()
      };
      engine(config)
        .run()
        .unwrap()
        .history
        .into_iter()
        .map(|i| (*i.genotype(), i.fitness().clone()))
        .collect::<Vec<_>>()
    };
    assert_eq!(history(99), history(99));
    assert_eq!(history(99).len(), 9);
  }

  #[test]
  fn test_plain_tournament_skips_crowding() {
    let config = EngineConfig {
      selection: Selection::Tournament(2),
      ..config()
    };
    let report = engine(config).run().unwrap();
    assert!(report
      .population
      .iter()
      .all(|i| i.crowding_distance() == 0.0));
  }

  #[test]
  fn test_unknown_objective() {
    let config = EngineConfig {
      objectives: vec!["f1".to_owned(), "f3".to_owned()],
      ..config()
    };
    assert!(matches!(
      engine(config).run(),
      Err(Error::UnknownObjective(name)) if name == "f3"
    ));
  }

  #[test]
  fn test_initializer_must_fill_population() {
    let engine = Engine::builder()
      .config(config())
      .objectives(objectives())
      .initializer(|_: usize, _: &mut dyn RngCore| vec![1, 2, 3])
      .crossover(NoCrossover)
      .mutation(Replication)
      .build();
    assert!(matches!(
      engine.run(),
      Err(Error::InitializationSize {
        expected: 12,
        actual: 3
      })
    ));
  }

  #[test]
  fn test_short_evaluator_is_fatal() {
    let calls = Cell::new(0);
    let objectives = objectives()
      .with("f3", move |population: &[Individual<Genotype>]| {
        calls.set(calls.get() + 1);
        // drops a score from the first offspring pool on
        let n = population.len() - usize::from(calls.get() > 1);
        vec![0.0; n]
      })
      .unwrap();
    let engine = Engine::builder()
      .config(EngineConfig {
        objectives: vec!["f1".to_owned(), "f3".to_owned()],
        ..config()
      })
      .objectives(objectives)
      .initializer(init)
      .crossover(NoCrossover)
      .mutation(mutate)
      .build();
    let mut state = engine.initialize(StdRng::seed_from_u64(3)).unwrap();
    let before = state.population().clone();
    assert!(matches!(
      engine.step(&mut state),
      Err(Error::EvaluationSize { .. })
    ));
    assert_eq!(state.population(), &before);
    assert_eq!(state.generation(), 0);
  }

  #[test]
  fn test_converges_on_threshold() {
    let config = EngineConfig {
      objectives: vec!["f1".to_owned()],
      best_policy: BestPolicy::FirstFitness,
      generations: 50,
      // every score is above -1
      convergence: Some(ConvergencePolicy::Threshold { threshold: -1.0 }),
      ..config()
    };
    let report = engine(config).run().unwrap();
    assert_eq!(report.stop_reason, StopReason::Threshold);
    assert_eq!(report.generations, 1);
  }

  #[test]
  fn test_converges_on_plateau() {
    let objectives = Objectives::<Genotype>::new()
      .with("flat", |_: &Genotype| 0.5)
      .unwrap();
    let engine = Engine::builder()
      .config(EngineConfig {
        objectives: vec!["flat".to_owned()],
        generations: 100,
        convergence: Some(ConvergencePolicy::ThresholdOrPlateau {
          threshold: 0.99,
          patience: 15,
        }),
        ..config()
      })
      .objectives(objectives)
      .initializer(init)
      .crossover(NoCrossover)
      .mutation(mutate)
      .build();
    let report = engine.run().unwrap();
    assert_eq!(report.stop_reason, StopReason::Plateau);
    // first generation sets the reference, fifteen more repeat it
    assert_eq!(report.generations, 16);
  }

  #[test]
  fn test_zero_generations() {
    let config = EngineConfig {
      generations: 0,
      ..config()
    };
    let report = engine(config).run().unwrap();
    assert_eq!(report.generations, 0);
    assert_eq!(report.history.len(), 1);
    assert_eq!(report.stop_reason, StopReason::GenerationLimit);
  }

  #[test]
  fn test_migrants_are_absorbed() {
    let engine = engine(config());
    let mut state = engine.initialize(StdRng::seed_from_u64(4)).unwrap();
    let mut migrant = Individual::new(2);
    migrant.set_score("f1", 4.0);
    migrant.set_score("f2", 0.0);
    state.accept_migrants([migrant.clone(), migrant]);
    assert_eq!(state.population().len(), 14);
    engine.step(&mut state).unwrap();
    assert_eq!(state.population().len(), 12);
    // nothing dominates a score of 0 on f2 except another one
    assert!(state.population().iter().any(|i| *i.genotype() == 2));
  }

  #[test]
  fn test_first_step_builds_population() {
    let engine = engine(config());
    let mut state = engine.start(StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(state.phase(), Phase::Initializing);
    assert!(state.population().is_empty());
    assert!(state.best().is_none());

    engine.step(&mut state).unwrap();
    assert_eq!(state.phase(), Phase::Stepping);
    assert_eq!(state.population().len(), 12);
    assert_eq!(state.generation(), 0);
    assert_eq!(state.history().len(), 1);
    assert!(state.best().is_some());
  }

  #[test]
  fn test_stopped_state_is_final() {
    let engine = engine(config());
    let mut state = engine.initialize(StdRng::seed_from_u64(6)).unwrap();
    while !state.is_stopped() {
      engine.step(&mut state).unwrap();
    }
    assert_eq!(state.generation(), 8);
    let population = state.population().clone();
    let unchanged = state.monitor().unchanged();

    engine.step(&mut state).unwrap();
    assert_eq!(state.generation(), 8);
    assert_eq!(state.population(), &population);
    assert_eq!(state.history().len(), 9);
    assert_eq!(state.monitor().unchanged(), unchanged);
    assert_eq!(state.stop_reason(), Some(StopReason::GenerationLimit));
  }
}
