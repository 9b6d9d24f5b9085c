//! Shared fixtures for the cross-crate tests.

use sdevo_genome::{CoefficientMatrix, FitnessFunctionType, Model, Variable};

/// Absent coefficient in dense fixture rows.
pub const ABSENT: f64 = f64::NAN;

/// One node holding one stock that doubles every step from 5.0.
pub fn doubling_stock() -> Model {
    Model::with_node_count(1)
        .with_variable(
            Variable::new("x", 1)
                .with_equations(["INTEG(x, 5.0)"])
                .with_coefficients(matrix(vec![vec![1.0]])),
        )
        .with_fitness_equations(["x"])
        .with_fitness_function(FitnessFunctionType::SystemDynamics)
}

/// Five nodes, one variable, one populated row `{0.0, 0.7, 0.3, -, -}`.
pub fn single_row_maximum() -> Model {
    let mut rows = vec![vec![ABSENT; 5]; 5];
    rows[0] = vec![0.0, 0.7, 0.3, ABSENT, ABSENT];
    Model::with_node_count(5)
        .with_variable(Variable::new("x", 5).with_coefficients(matrix(rows)))
        .with_fitness_function(FitnessFunctionType::SimpleMaximum)
}

/// A three-node predator/prey style system with a stock, a flow and a
/// dimensionless rate, evaluated as system dynamics.
pub fn herd_model() -> Model {
    Model::with_node_count(3)
        .with_variable(
            Variable::new("herd", 3)
                .with_equations([
                    "INTEG(herd * rate - grazing, 100.0)",
                    "INTEG(herd * rate, 50.0)",
                    "INTEG(herd * rate - grazing, 75.0)",
                ])
                .with_coefficients(matrix(vec![
                    vec![0.8, 0.2, ABSENT],
                    vec![0.1, 0.8, 0.1],
                    vec![ABSENT, 0.2, 0.8],
                ])),
        )
        .with_variable(
            Variable::new("rate", 3)
                .with_equations(["0.01", "0.02", "0.015"])
                .with_coefficients(matrix(vec![
                    vec![1.0, ABSENT, ABSENT],
                    vec![ABSENT, 1.0, ABSENT],
                    vec![ABSENT, ABSENT, 1.0],
                ])),
        )
        .with_variable(
            Variable::new("grazing", 3)
                .with_equations(["MIN(herd * 0.05, 4.0)", "0.0", "MAX(herd * 0.01, 1.0)"])
                .with_coefficients(matrix(vec![
                    vec![1.0, ABSENT, ABSENT],
                    vec![ABSENT, 1.0, ABSENT],
                    vec![ABSENT, ABSENT, 1.0],
                ])),
        )
        .with_fitness_equations(["herd", "herd", "herd"])
        .with_fitness_function(FitnessFunctionType::SystemDynamics)
        .with_steps(20, 0.5)
}

/// Dense rows to a matrix, `NaN` meaning absent.
///
/// # Panics
///
/// Panics on ragged rows; fixtures are always square.
pub fn matrix(rows: Vec<Vec<f64>>) -> CoefficientMatrix {
    match CoefficientMatrix::from_rows(rows) {
        Ok(matrix) => matrix,
        Err(error) => panic!("fixture matrix is not square: {error}"),
    }
}
