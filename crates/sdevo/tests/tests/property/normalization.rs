//! Property tests: normalized coefficient rows are stochastic.

use proptest::prelude::*;
use sdevo_genome::{CoefficientMatrix, Model, Variable};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// A model with `1..4` variables over `1..6` nodes and sparse positive weights.
fn arb_model() -> impl Strategy<Value = Model> {
    (1usize..6, 1usize..4).prop_flat_map(|(nodes, variables)| {
        prop::collection::vec(
            prop::collection::vec(
                prop::collection::vec(prop::option::weighted(0.6, 0.001f64..100.0), nodes),
                nodes,
            ),
            variables,
        )
        .prop_map(move |matrices| {
            matrices
                .into_iter()
                .enumerate()
                .fold(Model::with_node_count(nodes), |model, (i, rows)| {
                    let coefficients = CoefficientMatrix::from_cells(rows).unwrap();
                    model.with_variable(
                        Variable::new(format!("v{i}"), nodes).with_coefficients(coefficients),
                    )
                })
        })
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn normalized_rows_sum_to_one(mut model in arb_model()) {
        let before = model.clone();
        model.normalize();
        prop_assert!(model.cached_fitness().is_none());

        for (after, original) in model.variables().iter().zip(before.variables()) {
            for row in 0..after.coefficients.size() {
                let present = original.coefficients.row(row).iter().flatten().count();
                if present == 0 {
                    prop_assert_eq!(after.coefficients.row(row), original.coefficients.row(row));
                } else {
                    let sum: f64 = after.coefficients.row(row).iter().flatten().sum();
                    prop_assert!((sum - 1.0).abs() < 1e-9, "row {} sums to {}", row, sum);
                }
            }
        }
    }

    #[test]
    fn normalize_is_idempotent(mut model in arb_model()) {
        model.normalize();
        let once = model.clone();
        model.normalize();
        for (a, b) in model.variables().iter().zip(once.variables()) {
            for (x, y) in a.coefficients.to_cells().iter().flatten().zip(b.coefficients.to_cells().iter().flatten()) {
                match (x, y) {
                    (Some(x), Some(y)) => prop_assert!((x - y).abs() < 1e-12),
                    (None, None) => {}
                    _ => prop_assert!(false, "presence changed"),
                }
            }
        }
    }
}
