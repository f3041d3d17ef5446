use std::{fmt, io};

use pareto_gp::{
  config::EngineConfig,
  engine::Engine,
  objective::Objectives,
  operator::IntoPar,
  selection::Selection,
};
use rand::prelude::*;
use rand_distr::Normal;

// our genotype: a point in 0 <= x <= 5, 0 <= y <= 3
#[derive(Clone, Copy, Debug)]
struct Point(f64, f64);

impl Point {
  fn clamped(x: f64, y: f64) -> Self {
    Self(x.clamp(0.0, 5.0), y.clamp(0.0, 3.0))
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({:.4} {:.4})", self.0, self.1)
  }
}

fn main() -> pareto_gp::Result<()> {
  // try RUST_LOG=debug
  env_logger::init();

  // objective function f1(x, y) = 4x^2 + 4y^2
  let f1 = |&Point(x, y): &Point| 4.0 * x.powi(2) + 4.0 * y.powi(2);
  // and another objective function f2(x, y) = (x - 5)^2 + (y - 5)^2
  let f2 = |&Point(x, y): &Point| (x - 5.0).powi(2) + (y - 5.0).powi(2);
  let objectives = Objectives::<Point>::new()
    .with("f1", f1)?
    // pretend this one is expensive
    .with("f2", f2.par_batch())?;

  let config = EngineConfig::builder()
    .population_size(100)
    .generations(200)
    .crossover_rate(0.8)
    .mutation_rate(0.2)
    .selection(Selection::CrowdedTournament(2))
    .objectives(["f1", "f2"])
    .seed(2024)
    .build();

  // SBX crossover for a pair of floating point values
  let sbx = |a: f64, b: f64, rng: &mut dyn RngCore| -> (f64, f64) {
    let n = 2.0;
    let r: f64 = rng.gen_range(0.0..1.0);
    let beta = if r <= 0.5 {
      (2.0 * r).powf(1.0 / (n + 1.0))
    } else {
      (1.0 / (2.0 * (1.0 - r))).powf(1.0 / (n + 1.0))
    };
    (
      0.5 * ((a + b) - beta * (b - a)),
      0.5 * ((a + b) + beta * (b - a)),
    )
  };
  // ...which is used on both coordinates
  let crossover = |p: &Point, q: &Point, rng: &mut dyn RngCore| {
    let (x1, x2) = sbx(p.0, q.0, rng);
    let (y1, y2) = sbx(p.1, q.1, rng);
    vec![Point::clamped(x1, y1), Point::clamped(x2, y2)]
  };

  // gaussian noise on both coordinates
  let noise = Normal::new(0.0, 0.1).expect("valid standard deviation");
  let mutation = |p: &Point, rng: &mut dyn RngCore| {
    Point::clamped(p.0 + noise.sample(rng), p.1 + noise.sample(rng))
  };

  let initializer = |n: usize, rng: &mut dyn RngCore| -> Vec<Point> {
    (0..n)
      .map(|_| Point(rng.gen_range(0.0..=5.0), rng.gen_range(0.0..=3.0)))
      .collect()
  };

  let engine = Engine::builder()
    .config(config)
    .objectives(objectives)
    .initializer(initializer)
    .crossover(crossover)
    .mutation(mutation)
    .build();
  let report = engine.run()?;

  println!(
    "stopped after {} generations: {}",
    report.generations, report.stop_reason
  );
  print!("front=[");
  for (i, individual) in report.front().enumerate() {
    let sep = if i == 0 { "" } else { "," };
    let fitness = individual.fitness();
    print!(
      "{sep}({:.3},{:.3})",
      fitness.get("f1").unwrap_or_default(),
      fitness.get("f2").unwrap_or_default()
    );
  }
  println!("]");

  println!("best per generation:");
  report.write_models(io::stdout().lock())
}
