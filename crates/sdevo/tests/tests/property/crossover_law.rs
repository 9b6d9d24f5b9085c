//! Property tests: crossover sums shared coefficients and inherits the rest
//! from the first parent.

use proptest::prelude::*;
use sdevo_engine::{cross_over, RandomStream};
use sdevo_genome::{CoefficientMatrix, Model, Variable};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_cells(nodes: usize) -> impl Strategy<Value = Vec<Vec<Option<f64>>>> {
    prop::collection::vec(
        prop::collection::vec(prop::option::of(0.01f64..5.0), nodes),
        nodes,
    )
}

fn model(cells: Vec<Vec<Option<f64>>>) -> Model {
    let nodes = cells.len();
    Model::with_node_count(nodes).with_variable(
        Variable::new("x", nodes).with_coefficients(CoefficientMatrix::from_cells(cells).unwrap()),
    )
}

fn arb_parents() -> impl Strategy<Value = (Vec<Vec<Option<f64>>>, Vec<Vec<Option<f64>>>, u64)> {
    (1usize..5).prop_flat_map(|nodes| (arb_cells(nodes), arb_cells(nodes), any::<u64>()))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn child_coefficients_follow_combination_law((a, b, seed) in arb_parents()) {
        let parent_a = model(a.clone());
        let parent_b = model(b.clone());
        let mut rng = RandomStream::new(seed);
        let child = cross_over(&parent_a, &parent_b, &mut rng);

        let combined: Vec<Vec<Option<f64>>> = a
            .iter()
            .zip(&b)
            .map(|(row_a, row_b)| {
                row_a
                    .iter()
                    .zip(row_b)
                    .map(|(x, y)| match (x, y) {
                        (Some(x), Some(y)) => Some(x + y),
                        (Some(x), None) => Some(*x),
                        (None, kept) => *kept,
                    })
                    .collect()
            })
            .collect();
        let mut expected = CoefficientMatrix::from_cells(combined).unwrap();
        expected.normalize_rows();

        prop_assert_eq!(&child.variable(0).unwrap().coefficients, &expected);
        prop_assert!(child.cached_fitness().is_none());
    }

    #[test]
    fn crossover_never_touches_parents((a, b, seed) in arb_parents()) {
        let parent_a = model(a);
        let parent_b = model(b);
        let (before_a, before_b) = (parent_a.clone(), parent_b.clone());
        let _ = cross_over(&parent_a, &parent_b, &mut RandomStream::new(seed));
        prop_assert_eq!(parent_a, before_a);
        prop_assert_eq!(parent_b, before_b);
    }
}
