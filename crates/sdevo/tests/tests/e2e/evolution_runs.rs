//! End-to-end test: evolving system-dynamics populations.
//!
//! Drives engines through fill/kill/evolve with equation evolution enabled
//! and checks size, ordering and reproducibility.

use sdevo_engine::{init_tracing, Engine, EngineConfig, GrowthConfig};
use sdevo_genome::Model;
use sdevo_tests::{herd_model, single_row_maximum};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config(size: usize) -> EngineConfig {
    EngineConfig::default()
        .with_population_size(size)
        .with_mutation_probability(0.3)
        .with_growth(GrowthConfig::default().with_maximum_new_term_count(3))
}

fn evolving_herd() -> Model {
    herd_model().with_equation_evolution(true)
}

/// An engine over the evolving herd, with its configured console logging
/// installed (`RUST_LOG=debug` shows every generation).
fn herd_engine(size: usize) -> Engine {
    let engine = Engine::from_models(config(size), [evolving_herd()]).unwrap();
    init_tracing(&engine.config().telemetry);
    engine
}

fn assert_descending(engine: &Engine) {
    let values = engine.output().fitness_values();
    assert!(
        values.windows(2).all(|w| w[0] >= w[1]),
        "population out of order: {values:?}"
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn evolution_keeps_population_size_and_order() {
    let mut engine = herd_engine(12);
    engine.evolve(4);
    assert_eq!(engine.output().len(), 12);
    assert_descending(&engine);
    assert!(engine.best_fitness() >= engine.input().fitness());
}

#[test]
fn same_seed_same_population() {
    let mut a = herd_engine(10);
    let mut b = herd_engine(10);
    a.evolve(3);
    b.evolve(3);
    assert_eq!(a.output(), b.output());
    assert_eq!(a.output().fitness_values(), b.output().fitness_values());
}

#[test]
fn reset_replays_the_same_run() {
    let mut engine = herd_engine(8);
    engine.evolve(2);
    let first = engine.output().clone();

    engine.reset();
    assert_eq!(engine.output(), engine.input());
    engine.evolve(2);
    assert_eq!(engine.output(), &first);
}

#[test]
fn evolution_never_changes_the_seed_population() {
    let mut engine = herd_engine(8);
    let seed = engine.input().clone();
    engine.evolve(3);
    assert_eq!(engine.input(), &seed);
}

#[test]
fn mutation_only_runs_keep_rows_stochastic() {
    let mut engine = Engine::from_models(
        config(16).with_crossover_probability(0.0),
        [single_row_maximum()],
    )
    .unwrap();
    engine.evolve(3);
    for model in engine.output() {
        let row: f64 = model.variable(0).unwrap().coefficients.row(0).iter().flatten().sum();
        assert!((row - 1.0).abs() < 1e-9);
    }
}

#[test]
fn evolution_improves_simple_maximum() {
    let mut engine = Engine::from_models(config(20), [single_row_maximum()]).unwrap();
    let start = engine.best_fitness();
    engine.evolve(10);
    assert!(engine.best_fitness() >= start);
    assert_descending(&engine);
}
