//! Property tests: populations stay sorted best-first after every insertion.

use proptest::prelude::*;
use sdevo_formulation::InterpreterSandbox;
use sdevo_genome::{FitnessFunctionType, Model, Population, Variable};
use sdevo_tests::matrix;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// A one-node model whose simple-maximum fitness is `weight`, or a broken
/// system-dynamics model when `weight` is `None`.
fn scored(weight: Option<f64>) -> Model {
    match weight {
        Some(weight) => Model::with_node_count(1)
            .with_variable(Variable::new("x", 1).with_coefficients(matrix(vec![vec![weight]])))
            .with_fitness_function(FitnessFunctionType::SimpleMaximum),
        None => Model::with_node_count(1)
            .with_variable(Variable::new("x", 1).with_equations(["INTEG(x"]))
            .with_fitness_equations(["x"])
            .with_fitness_function(FitnessFunctionType::SystemDynamics),
    }
}

fn arb_weights() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::weighted(0.9, 0.0f64..10.0), 0..40)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn every_insertion_keeps_descending_order(weights in arb_weights()) {
        let sandbox = InterpreterSandbox::new();
        let mut population = Population::new();
        for weight in &weights {
            population.insert(scored(*weight), &sandbox);
            let values = population.fitness_values();
            prop_assert!(values.windows(2).all(|w| w[0] >= w[1]), "{:?}", values);
            prop_assert!(values.iter().all(|v| !v.is_nan()));
        }
        prop_assert_eq!(population.len(), weights.len());
    }

    #[test]
    fn population_fitness_is_the_best(weights in arb_weights()) {
        let sandbox = InterpreterSandbox::new();
        let population = Population::from_models(weights.iter().copied().map(scored), &sandbox);
        let best = population
            .fitness_values()
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(population.fitness(), best);
    }
}
