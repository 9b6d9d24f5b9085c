//! End-to-end test: synthesized models through the formulation bridge.
//!
//! Builds formulations from genome synthesis, steps them by hand and through
//! the sandbox, and checks that scratch artifacts never outlive an
//! evaluation.

use sdevo_formulation::{Formulation, FormulationSandbox, InterpreterSandbox};
use sdevo_tests::{doubling_stock, herd_model};

#[test]
fn manual_steps_match_sandbox_evaluation() {
    let model = herd_model();
    let source = model.formulation_source().unwrap();

    let mut formulation = Formulation::compile(&source, model.step_size()).unwrap();
    assert!(formulation.is_first_step());
    formulation.run(model.step_count());
    assert!(!formulation.is_first_step());
    let manual = formulation.calculate_fitness().unwrap();

    let sandboxed = InterpreterSandbox::new()
        .evaluate(&source, model.step_size(), model.step_count())
        .unwrap();
    assert_eq!(manual.to_bits(), sandboxed.to_bits());
}

#[test]
fn registers_follow_knit_then_split() {
    let source = doubling_stock().formulation_source().unwrap();
    let mut formulation = Formulation::compile(&source, 0.5).unwrap();
    assert_eq!(formulation.value("x_Node1"), Some(5.0));
    formulation.step();
    assert_eq!(formulation.value("x_Node1_combined"), Some(7.5));
    assert_eq!(formulation.value("x_Node1"), Some(7.5));
    assert_eq!(formulation.value("stepSize"), None);
}

#[test]
fn repeated_evaluations_leave_no_artifacts() {
    let scratch = tempfile::tempdir().unwrap();
    let sandbox = InterpreterSandbox::new().with_scratch_dir(scratch.path());

    let mut fitness = Vec::new();
    for _ in 0..25 {
        let mut model = herd_model();
        fitness.push(model.fitness_with(&sandbox));
    }
    assert!(fitness.windows(2).all(|w| w[0].to_bits() == w[1].to_bits()));

    let mut broken = doubling_stock().with_fitness_equations(["(x"]);
    assert_eq!(broken.fitness_with(&sandbox), f64::NEG_INFINITY);

    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn rendered_program_lists_every_section() {
    let text = herd_model().formulation_source().unwrap().to_string();
    for section in ["# declarations", "# knit", "# split", "# fitness"] {
        assert!(text.contains(section), "missing {section}");
    }
    assert!(text.contains("herd_Node1_combined += ((herd_Node1 * rate_Node1 - grazing_Node1) * stepSize)"));
}
