//! Crossover and mutation.

use sdevo_genome::{FitnessFunctionType, Model};

use crate::config::GrowthConfig;
use crate::growth::grow_equation;
use crate::random::RandomStream;

/// Probability of taking each gene from the first parent.
const GENE_PROBABILITY: f64 = 0.5;

/// Uniform per-gene crossover. The child starts as a copy of `b`; each
/// fitness equation and node equation is taken from `a` with probability
/// one half. Coefficients present in both parents are summed, coefficients
/// present only in `a` are taken from `a`. The child is normalized.
pub fn cross_over(a: &Model, b: &Model, rng: &mut RandomStream) -> Model {
    let mut child = b.clone();

    let fitness_count = a.fitness_equations().len().min(child.fitness_equations().len());
    for node in 0..fitness_count {
        if rng.probability() <= GENE_PROBABILITY {
            child.set_fitness_equation(node, a.fitness_equations()[node].clone());
        }
    }

    let variable_count = a.variable_count().min(child.variable_count());
    for index in 0..variable_count {
        let (Some(from_a), Some(from_child)) = (a.variable(index), child.variable_mut(index)) else {
            continue;
        };
        let equation_count = from_a.equations.len().min(from_child.equations.len());
        for node in 0..equation_count {
            if rng.probability() <= GENE_PROBABILITY {
                from_child.equations[node] = from_a.equations[node].clone();
            }
        }

        let size = from_a.coefficients.size().min(from_child.coefficients.size());
        for row in 0..size {
            for col in 0..size {
                let combined = match (from_a.coefficients.get(row, col), from_child.coefficients.get(row, col)) {
                    (Some(x), Some(y)) => Some(x + y),
                    (Some(x), None) => Some(x),
                    (None, kept) => kept,
                };
                from_child.coefficients.set(row, col, combined);
            }
        }
    }

    if rng.probability() <= GENE_PROBABILITY {
        child.set_fitness_function_type(a.fitness_function_type());
        if a.fitness_function_type() == FitnessFunctionType::SystemDynamics {
            child.set_step_count(a.step_count());
            child.set_step_size(a.step_size());
        }
    }

    child.normalize();
    tracing::trace!(variables = child.variable_count(), "crossed over");
    child
}

/// Replace each present coefficient with a fresh uniform weight with
/// probability `probability`. When equation evolution is enabled, each row's
/// node equation is regrown with the same probability. The model is
/// normalized afterwards.
pub fn mutate(model: &mut Model, probability: f64, growth: &GrowthConfig, rng: &mut RandomStream) {
    for index in 0..model.variable_count() {
        let size = model
            .variable(index)
            .map_or(0, |v| v.coefficients.size());
        for row in 0..size {
            for col in 0..size {
                let present = model
                    .variable(index)
                    .is_some_and(|v| v.coefficients.get(row, col).is_some());
                if present && rng.probability() <= probability {
                    let weight = rng.uniform(0.0, 1.0);
                    model.set_coefficient(index, row, col, Some(weight));
                }
            }

            if model.equation_evolution() && rng.probability() <= probability {
                match grow_equation(model, index, row, growth, rng) {
                    Ok(equation) => {
                        tracing::trace!(variable = index, node = row, %equation, "regrew equation");
                        model.set_equation(index, row, equation);
                    }
                    Err(error) => {
                        tracing::debug!(variable = index, node = row, error = %error, "equation growth failed");
                    }
                }
            }
        }
    }
    model.normalize();
}
