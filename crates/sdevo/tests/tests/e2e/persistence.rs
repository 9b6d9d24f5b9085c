//! End-to-end test: engines on disk.
//!
//! Covers directory round trips, template import and stochastic runs that
//! write one engine per run.

use sdevo_engine::stochastic::{run_dir_name, FITNESS_HEADER, FITNESS_REPORT};
use sdevo_engine::{Engine, EngineConfig};
use sdevo_tests::herd_model;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TEMPLATE: &str = r#"{
    "parameters": {
        "random_seed": 7,
        "population_size": 6,
        "mutation_probability_for_cells": 0.25,
        "growth": { "maximum_new_term_count": 2 }
    },
    "model": {
        "node_types": [
            { "name": "Lake", "count": 2, "fitness_equation": "fish" },
            { "name": "River", "count": 1, "fitness_equation": "fish" }
        ],
        "variables": [
            {
                "name": "fish",
                "equations": ["INTEG(fish * growth, 40.0)", "INTEG(fish * growth, 10.0)"],
                "coefficients": [[2.0, 1.0], [1.0, 1.0]]
            },
            {
                "name": "growth",
                "equations": ["0.05", "0.01"],
                "coefficients": [[1.0, null], [null, 1.0]]
            }
        ],
        "fitness_function": "system_dynamics",
        "step_count": 12,
        "equation_evolution": true
    }
}"#;

fn template_engine(dir: &std::path::Path) -> Engine {
    let path = dir.join("template.json");
    std::fs::write(&path, TEMPLATE).unwrap();
    Engine::import_template(&path).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn evolved_engine_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::from_models(
        EngineConfig::default().with_population_size(6),
        [herd_model().with_equation_evolution(true)],
    )
    .unwrap();
    engine.evolve(2);
    engine.write(dir.path()).unwrap();

    let restored = Engine::read(dir.path()).unwrap();
    assert_eq!(restored.config(), engine.config());
    assert_eq!(restored.input(), engine.input());
    assert_eq!(restored.output(), engine.output());
    assert_eq!(
        restored.output().fitness_values(),
        engine.output().fitness_values()
    );
}

#[test]
fn template_import_expands_and_evolves() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = template_engine(dir.path());
    assert_eq!(engine.config().random_seed, 7);
    assert_eq!(engine.config().growth.maximum_new_term_count, 2);

    let seed = engine.input().best().unwrap();
    assert_eq!(seed.node_names(), &["Lake1", "Lake2", "River1"]);
    assert_eq!(seed.variable_count(), 2);
    assert!(engine.best_fitness().is_finite());

    engine.evolve(2);
    assert_eq!(engine.output().len(), 6);
}

#[test]
fn stochastic_run_reports_and_persists_each_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = template_engine(dir.path());
    let out = dir.path().join("runs");
    engine.stochastic_run(&out, 2, 2).unwrap();

    let report = std::fs::read_to_string(out.join(FITNESS_REPORT)).unwrap();
    let mut lines = report.lines();
    assert_eq!(lines.next(), Some(FITNESS_HEADER));
    let rows: Vec<Vec<String>> = lines
        .map(|line| line.split(", ").map(str::to_string).collect())
        .collect();
    assert_eq!(rows.len(), 2 * 2 * 6);
    for row in &rows {
        assert_eq!(row.len(), 4);
        assert!(row[3].parse::<f64>().is_ok() || row[3] == "-inf");
    }

    let second = Engine::read(out.join(run_dir_name(2))).unwrap();
    assert_eq!(second.config().random_seed, 2);
    assert_eq!(second.output().len(), 6);
}
