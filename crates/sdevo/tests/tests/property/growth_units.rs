//! Property tests: grown equations stay dimensionally consistent with the
//! variable they belong to.

use std::collections::HashMap;

use proptest::prelude::*;
use sdevo_engine::{grow_equation, GrowthConfig, RandomStream};
use sdevo_formulation::{BinaryOp, Expr, Parser};
use sdevo_genome::{EquationShape, Model, Variable};
use sdevo_tests::matrix;
use sdevo_units::PhysicalQuantity;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn unit(text: &str) -> PhysicalQuantity {
    PhysicalQuantity::parse(text).unwrap()
}

/// Four variables flowing into node 0: two lengths, a time and a ratio.
fn mixed_units() -> Model {
    let inflow = || matrix(vec![vec![1.0, f64::NAN], vec![f64::NAN, f64::NAN]]);
    Model::with_node_count(2)
        .with_variable(
            Variable::new("depth", 2)
                .with_unit(unit("m"))
                .with_equations(["INTEG(depth * 0.1, 2.0)", "depth"])
                .with_coefficients(inflow()),
        )
        .with_variable(
            Variable::new("width", 2)
                .with_unit(unit("m"))
                .with_equations(["width", ""])
                .with_coefficients(inflow()),
        )
        .with_variable(
            Variable::new("delay", 2)
                .with_unit(unit("s"))
                .with_equations(["delay", ""])
                .with_coefficients(inflow()),
        )
        .with_variable(
            Variable::new("ratio", 2)
                .with_equations(["0.5", ""])
                .with_coefficients(inflow()),
        )
}

/// The unit of an expression, or `None` when it adds incompatible units.
fn infer(expr: &Expr, units: &HashMap<String, PhysicalQuantity>) -> Option<PhysicalQuantity> {
    match expr {
        Expr::Number(_) | Expr::Table(_) => Some(PhysicalQuantity::one()),
        Expr::Variable(name) => units.get(name).copied(),
        Expr::Negate(inner) => infer(inner, units),
        Expr::Binary { op, left, right } => {
            let (l, r) = (infer(left, units)?, infer(right, units)?);
            match op {
                BinaryOp::Add => l.plus(&r).ok(),
                BinaryOp::Sub | BinaryOp::Rem => l.minus(&r).ok(),
                BinaryOp::Mul => l.times(&r).ok(),
                BinaryOp::Div => l.divide(&r).ok(),
            }
        }
        // Only zeroFill appears in grown text; it keeps its argument's unit.
        Expr::Call { args, .. } => infer(args.first()?, units),
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn grown_formula_keeps_the_cell_unit(
        seed in any::<u64>(),
        variable in 0usize..3,
        max_terms in 1usize..6,
    ) {
        let model = mixed_units();
        let units: HashMap<String, PhysicalQuantity> =
            model.variables().iter().map(|v| (v.name.clone(), v.unit)).collect();
        let config = GrowthConfig::default().with_maximum_new_term_count(max_terms);
        let mut rng = RandomStream::new(seed);

        let grown = grow_equation(&model, variable, 0, &config, &mut rng).unwrap();
        let shape = EquationShape::parse(&grown).unwrap();
        let expr = Parser::parse_expression(shape.body()).unwrap();
        let inferred = infer(&expr, &units);

        let target = model.variable(variable).unwrap().unit;
        prop_assert!(inferred.is_some(), "{} adds incompatible units", grown);
        prop_assert!(inferred.unwrap().is_compatible(&target), "{} is not {}", grown, target);
    }

    #[test]
    fn wrapper_and_initial_value_survive(seed in any::<u64>()) {
        let model = mixed_units();
        let mut rng = RandomStream::new(seed);
        let grown = grow_equation(&model, 0, 0, &GrowthConfig::default(), &mut rng).unwrap();
        let shape = EquationShape::parse(&grown).unwrap();
        let is_stock = matches!(shape, EquationShape::Integ { .. });
        prop_assert!(is_stock, "{}", grown);
        prop_assert_eq!(shape.initial(), Some("2.0"));
    }
}
