//! Equation synthesis: knit, split, fitness and declarations.

use std::collections::{BTreeSet, HashMap};

use sdevo_formulation::{Declaration, FormulationSource, STEP_SIZE};

use crate::equation::{EquationShape, DEFAULT_INITIAL};
use crate::error::GenomeResult;
use crate::model::Model;

/// Suffix of the per-node value a variable name is rewritten to.
pub const REGULAR_SUFFIX: &str = "";
/// Suffix of the per-node register a knit equation assigns.
pub const COMBINED_SUFFIX: &str = "_combined";

const SEPARATOR: &str = "_";

/// One node equation of one variable, with names made node-specific.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnitEquation {
    pub variable: String,
    pub node: usize,
    /// The per-node value, e.g. `x_Node1`.
    pub state: String,
    /// The register the equation assigns, e.g. `x_Node1_combined`.
    pub target: String,
    pub shape: EquationShape,
}

impl KnitEquation {
    /// `target = <equation>` with the wrapper left in place.
    pub fn raw(&self) -> String {
        format!("{} = {}", self.target, self.shape)
    }

    /// The statement executed each step. Stocks accumulate their rate over
    /// the step; everything else is assigned its formula.
    pub fn statement(&self) -> String {
        match &self.shape {
            EquationShape::Integ { rate, .. } => {
                format!("{} += (({}) * {})", self.target, rate, STEP_SIZE)
            }
            EquationShape::Initial { expr, .. } => format!("{} = {}", self.target, expr),
            EquationShape::Regular(expr) => format!("{} = {}", self.target, expr),
        }
    }

    /// Initial value of both registers this equation touches.
    pub fn initial(&self) -> &str {
        self.shape.initial().unwrap_or(DEFAULT_INITIAL)
    }
}

fn instance_name(variable: &str, node: &str, suffix: &str) -> String {
    format!("{variable}{SEPARATOR}{node}{suffix}")
}

impl Model {
    fn node_substitutions(&self, node: usize, suffix: &str) -> HashMap<String, String> {
        let node_name = self.node_name(node);
        self.variables()
            .iter()
            .map(|v| (v.name.clone(), instance_name(&v.name, node_name, suffix)))
            .collect()
    }

    /// Every non-empty node equation, source node by source node.
    pub fn knit_equations(
        &self,
        regular_suffix: &str,
        combined_suffix: &str,
    ) -> GenomeResult<Vec<KnitEquation>> {
        let mut equations = Vec::new();
        for node in 0..self.node_count() {
            let substitutions = self.node_substitutions(node, regular_suffix);
            let node_name = self.node_name(node);
            for variable in self.variables() {
                let Some(text) = variable.equations.get(node) else {
                    continue;
                };
                let shape = EquationShape::parse(text)?;
                if shape.is_empty() {
                    continue;
                }
                equations.push(KnitEquation {
                    variable: variable.name.clone(),
                    node,
                    state: instance_name(&variable.name, node_name, regular_suffix),
                    target: instance_name(&variable.name, node_name, combined_suffix),
                    shape: shape.substitute(&substitutions),
                });
            }
        }
        Ok(equations)
    }

    /// Step statements of every knit equation, ordered lexicographically.
    pub fn knit(&self, regular_suffix: &str, combined_suffix: &str) -> GenomeResult<BTreeSet<String>> {
        Ok(self
            .knit_equations(regular_suffix, combined_suffix)?
            .iter()
            .map(KnitEquation::statement)
            .collect())
    }

    /// Each destination's value as the coefficient-weighted sum of the
    /// combined registers of its sources.
    pub fn split(&self, regular_suffix: &str, combined_suffix: &str) -> BTreeSet<String> {
        let mut equations = BTreeSet::new();
        for variable in self.variables() {
            for destination in 0..self.node_count() {
                let terms: Vec<String> = (0..self.node_count())
                    .filter_map(|source| {
                        let coefficient = variable.coefficients.get(source, destination)?;
                        (coefficient != 0.0).then(|| {
                            let register = instance_name(
                                &variable.name,
                                self.node_name(source),
                                combined_suffix,
                            );
                            format!("{coefficient:?} * {register}")
                        })
                    })
                    .collect();
                if !terms.is_empty() {
                    let state =
                        instance_name(&variable.name, self.node_name(destination), regular_suffix);
                    equations.insert(format!("{} = {}", state, terms.join(" + ")));
                }
            }
        }
        equations
    }

    /// The non-empty fitness equations, made node-specific, parenthesized
    /// and summed.
    pub fn fitness_expression(&self, regular_suffix: &str) -> String {
        self.fitness_equations()
            .iter()
            .enumerate()
            .filter(|(_, equation)| !equation.trim().is_empty())
            .map(|(node, equation)| {
                let substitutions = self.node_substitutions(node, regular_suffix);
                format!("({})", crate::equation::substitute_names(equation, &substitutions))
            })
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// A declaration for the state and the combined register of every knit
    /// equation.
    pub fn extract_declarations(
        &self,
        regular_suffix: &str,
        combined_suffix: &str,
    ) -> GenomeResult<BTreeSet<Declaration>> {
        Ok(declarations(&self.knit_equations(regular_suffix, combined_suffix)?))
    }

    /// Everything a sandbox needs to build this model.
    pub fn formulation_source(&self) -> GenomeResult<FormulationSource> {
        let knit = self.knit_equations(REGULAR_SUFFIX, COMBINED_SUFFIX)?;
        let statements: BTreeSet<String> = knit.iter().map(KnitEquation::statement).collect();

        Ok(FormulationSource::new(
            declarations(&knit).into_iter().collect(),
            statements.into_iter().collect(),
            self.split(REGULAR_SUFFIX, COMBINED_SUFFIX).into_iter().collect(),
            self.fitness_expression(REGULAR_SUFFIX),
        ))
    }
}

fn declarations(knit: &[KnitEquation]) -> BTreeSet<Declaration> {
    knit.iter()
        .flat_map(|equation| {
            [
                Declaration::new(&equation.state, equation.initial()),
                Declaration::new(&equation.target, equation.initial()),
            ]
        })
        .collect()
}

/// Names assigned by a set of `name = ...` / `name += ...` equations.
pub fn extract_variables<'a>(equations: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    equations
        .into_iter()
        .filter_map(|equation| {
            let (lhs, _) = equation.split_once('=')?;
            let name = lhs.trim().trim_end_matches('+').trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}
