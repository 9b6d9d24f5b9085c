//! End-to-end test: synthesis of small models and their fitness.

use sdevo_formulation::{
    Declaration, Formulation, FormulationError, FormulationResult, FormulationSandbox,
    FormulationSource,
};
use sdevo_genome::{FitnessFunctionType, Model, Variable, COMBINED_SUFFIX, REGULAR_SUFFIX};
use sdevo_tests::{doubling_stock, herd_model, matrix, single_row_maximum};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A backend whose every build fails to compile.
struct FailingCompiler;

impl FormulationSandbox for FailingCompiler {
    fn build(&self, _: &FormulationSource, _: f64) -> FormulationResult<Formulation> {
        Err(FormulationError::UnknownFunction("compile".into()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn single_stock_knits_to_one_accumulation() {
    let model = doubling_stock();
    let knit: Vec<String> = model
        .knit(REGULAR_SUFFIX, COMBINED_SUFFIX)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(knit, vec!["x_Node1_combined += ((x_Node1) * stepSize)"]);

    let declarations: Vec<Declaration> = model
        .extract_declarations(REGULAR_SUFFIX, COMBINED_SUFFIX)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(
        declarations,
        vec![
            Declaration::new("x_Node1", "5.0"),
            Declaration::new("x_Node1_combined", "5.0"),
        ]
    );
}

#[test]
fn single_row_simple_maximum_is_one() {
    let mut model = single_row_maximum();
    assert_eq!(model.fitness(), 1.0);
}

#[test]
fn compile_failure_is_negative_infinity() {
    let mut model = doubling_stock();
    assert_eq!(model.fitness_with(&FailingCompiler), f64::NEG_INFINITY);
    assert_eq!(model.cached_fitness(), Some(f64::NEG_INFINITY));
}

#[test]
fn unknown_symbol_is_negative_infinity() {
    let mut model = doubling_stock().with_fitness_equations(["missing"]);
    assert_eq!(model.fitness(), f64::NEG_INFINITY);
}

#[test]
fn overflow_is_negative_infinity() {
    let mut model = doubling_stock().with_steps(2000, 1.0);
    assert_eq!(model.fitness(), f64::NEG_INFINITY);
}

#[test]
fn doubling_stock_runs_in_process() {
    let mut model = doubling_stock().with_steps(4, 1.0);
    assert_eq!(model.fitness(), 80.0);
}

#[test]
fn herd_model_evaluates_to_finite_fitness() {
    let mut model = herd_model();
    let fitness = model.fitness();
    assert!(fitness.is_finite());
    assert!(fitness > 0.0);

    let source = model.formulation_source().unwrap();
    assert_eq!(source.knit.len(), 9);
    assert_eq!(source.declarations.len(), 18);
    assert_eq!(source.fitness, "(herd_Node1) + (herd_Node2) + (herd_Node3)");
}

#[test]
fn zero_fitness_ignores_equations() {
    let mut model = Model::with_node_count(1)
        .with_variable(Variable::new("x", 1).with_equations(["INTEG(x"]))
        .with_fitness_function(FitnessFunctionType::ZeroFitness);
    assert_eq!(model.fitness(), 0.0);
}

#[test]
fn deeply_nested_equation_scores_negative_infinity() {
    for depth in [1_000, 10_000] {
        let nested = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        let mut model = Model::with_node_count(1)
            .with_variable(
                Variable::new("x", 1)
                    .with_equations([nested])
                    .with_coefficients(matrix(vec![vec![1.0]])),
            )
            .with_fitness_equations(["x"])
            .with_fitness_function(FitnessFunctionType::SystemDynamics);
        assert_eq!(model.fitness(), f64::NEG_INFINITY, "depth {depth}");
    }
}

#[test]
fn modest_nesting_still_evaluates() {
    let nested = format!("INTEG({}x{}, 5.0)", "(".repeat(100), ")".repeat(100));
    let mut model = doubling_stock().with_steps(3, 1.0);
    model.set_equation(0, 0, nested);
    assert_eq!(model.fitness(), 40.0);
}
