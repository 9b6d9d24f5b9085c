//! Unit-aware stochastic growth of a single node equation.
//!
//! A grown sub-expression is a random chain of the variables that flow into
//! the node, joined by `+ - * /`. Terms whose units cannot be added are
//! skipped. The sub-expression is then merged into the current formula:
//!
//! ```text
//! compatible unit    (f + e) | (f - e) | (e)     by accumulate probabilities
//! dimensionless      ((f) * e)
//! otherwise          f                           (discarded)
//! ```

use sdevo_genome::equation::EMPTY_FORMULA;
use sdevo_genome::{EquationShape, GenomeError, GenomeResult, Model, Variable};
use sdevo_units::PhysicalQuantity;

use crate::config::GrowthConfig;
use crate::random::RandomStream;

/// Grow the equation of `variable` at `node` and return the new equation
/// text. The stock or initial-value wrapper and its initial value are kept.
///
/// The term count is drawn before anything else, so a growth that finds no
/// variable flowing into `node` still consumes one draw.
pub fn grow_equation(
    model: &Model,
    variable: usize,
    node: usize,
    config: &GrowthConfig,
    rng: &mut RandomStream,
) -> GenomeResult<String> {
    let target = model
        .variable(variable)
        .ok_or_else(|| GenomeError::InvalidModel(format!("no variable at index {variable}")))?;
    let text = target.equations.get(node).ok_or_else(|| {
        GenomeError::InvalidModel(format!("variable '{}' has no node {node}", target.name))
    })?;
    let shape = EquationShape::parse(text)?;

    let term_count = rng.int_inclusive(1, config.maximum_new_term_count);

    let body = shape.body().trim();
    let formula = if body.is_empty() { EMPTY_FORMULA } else { body };

    let eligible: Vec<&Variable> = model
        .variables()
        .iter()
        .filter(|v| v.coefficients.present_in_column(node) > 0)
        .collect();

    let grown = if eligible.is_empty() {
        formula.to_string()
    } else {
        let (expr, unit) = sub_expression(&eligible, term_count, config, rng);
        merge(formula, &expr, &unit, target, config, rng)
    };

    Ok(shape.with_body(grown).to_string())
}

fn sub_expression(
    eligible: &[&Variable],
    term_count: usize,
    config: &GrowthConfig,
    rng: &mut RandomStream,
) -> (String, PhysicalQuantity) {
    let seed = eligible[rng.index(eligible.len())];
    let mut expr = seed.name.clone();
    let mut unit = seed.unit;

    let add = config.addition_probability;
    let sub = add + config.subtraction_probability;
    let mul = sub + config.multiplication_probability;

    for _ in 1..term_count {
        let next = eligible[rng.index(eligible.len())];
        let draw = rng.probability();

        let combined = if draw < add {
            unit.plus(&next.unit)
                .map(|u| (format!("({} + {})", expr, next.name), u))
        } else if draw < sub {
            unit.minus(&next.unit)
                .map(|u| (format!("({} - {})", expr, next.name), u))
        } else if draw < mul {
            unit.times(&next.unit)
                .map(|u| (format!("({} * {})", expr, next.name), u))
        } else {
            unit.divide(&next.unit)
                .map(|u| (format!("({} / zeroFill({}))", expr, next.name), u))
        };

        match combined {
            Ok((e, u)) => {
                expr = e;
                unit = u;
            }
            Err(error) => {
                tracing::trace!(term = %next.name, error = %error, "skipped growth term");
            }
        }
    }
    (expr, unit)
}

fn merge(
    formula: &str,
    expr: &str,
    unit: &PhysicalQuantity,
    target: &Variable,
    config: &GrowthConfig,
    rng: &mut RandomStream,
) -> String {
    if unit.is_compatible(&target.unit) {
        let draw = rng.probability();
        let add = config.accumulate_add_probability;
        let sub = add + config.accumulate_subtract_probability;
        if draw < add {
            format!("({formula} + {expr})")
        } else if draw < sub {
            format!("({formula} - {expr})")
        } else {
            format!("({expr})")
        }
    } else if unit.is_dimensionless() {
        format!("(({formula}) * {expr})")
    } else {
        tracing::debug!(
            variable = %target.name,
            grown = %unit,
            expected = %target.unit,
            "discarded growth with incompatible unit"
        );
        formula.to_string()
    }
}
