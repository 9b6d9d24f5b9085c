//! Seed models described per node type.
//!
//! A template names node types, each with an instance count, and gives every
//! variable one equation per node type and a type-by-type coefficient table.
//! Expansion replicates the per-type equations to every instance and spreads
//! each type-level coefficient evenly over its block of instance pairs.

use serde::{Deserialize, Serialize};
use std::path::Path;

use sdevo_genome::{CoefficientMatrix, FitnessFunctionType, Model, Variable};
use sdevo_units::PhysicalQuantity;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};

/// A kind of node and how many instances of it the model has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeType {
    pub name: String,
    pub count: usize,
    #[serde(default)]
    pub fitness_equation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableTemplate {
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    /// One equation per node type.
    pub equations: Vec<String>,
    /// Node type by node type; `null` is absent.
    pub coefficients: Vec<Vec<Option<f64>>>,
}

fn default_step_count() -> usize {
    10
}

fn default_step_size() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTemplate {
    pub node_types: Vec<NodeType>,
    pub variables: Vec<VariableTemplate>,
    #[serde(default)]
    pub fitness_function: FitnessFunctionType,
    #[serde(default = "default_step_count")]
    pub step_count: usize,
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    #[serde(default)]
    pub equation_evolution: bool,
}

/// The on-disk template: engine parameters plus the seed model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateFile {
    #[serde(default)]
    pub parameters: EngineConfig,
    pub model: ModelTemplate,
}

impl ModelTemplate {
    /// The node type of every expanded node, in node order.
    fn node_type_indices(&self) -> Vec<usize> {
        self.node_types
            .iter()
            .enumerate()
            .flat_map(|(t, node_type)| std::iter::repeat(t).take(node_type.count))
            .collect()
    }

    fn node_names(&self) -> Vec<String> {
        self.node_types
            .iter()
            .flat_map(|node_type| (1..=node_type.count).map(move |k| format!("{}{k}", node_type.name)))
            .collect()
    }

    fn check_shape(&self, variable: &VariableTemplate) -> EngineResult<()> {
        let types = self.node_types.len();
        let rows_ok = variable.coefficients.iter().all(|row| row.len() == types);
        if variable.equations.len() != types || variable.coefficients.len() != types || !rows_ok {
            return Err(EngineError::InvalidTemplate(format!(
                "variable '{}' needs {types} equations and a {types}x{types} coefficient table",
                variable.name
            )));
        }
        Ok(())
    }

    /// Expand to a normalized model with one node per node-type instance.
    pub fn expand(&self) -> EngineResult<Model> {
        let kinds = self.node_type_indices();
        if kinds.is_empty() {
            return Err(EngineError::InvalidTemplate("template has no nodes".into()));
        }
        let n = kinds.len();

        let mut model = Model::new(self.node_names())
            .with_fitness_equations(
                kinds
                    .iter()
                    .map(|&t| self.node_types[t].fitness_equation.clone()),
            )
            .with_fitness_function(self.fitness_function)
            .with_steps(self.step_count, self.step_size)
            .with_equation_evolution(self.equation_evolution);

        for template in &self.variables {
            self.check_shape(template)?;

            let unit = match template.unit.as_deref() {
                None => PhysicalQuantity::one(),
                Some(text) => PhysicalQuantity::parse(text).unwrap_or_else(|error| {
                    tracing::debug!(
                        variable = %template.name,
                        unit = text,
                        error = %error,
                        "unknown unit, using dimensionless"
                    );
                    PhysicalQuantity::one()
                }),
            };

            let mut coefficients = CoefficientMatrix::new(n);
            for (row, &row_type) in kinds.iter().enumerate() {
                for (col, &col_type) in kinds.iter().enumerate() {
                    let block =
                        (self.node_types[row_type].count * self.node_types[col_type].count) as f64;
                    let value = template.coefficients[row_type][col_type].map(|v| v / block);
                    coefficients.set(row, col, value);
                }
            }

            model.push_variable(
                Variable::new(&template.name, n)
                    .with_unit(unit)
                    .with_equations(kinds.iter().map(|&t| template.equations[t].clone()))
                    .with_coefficients(coefficients),
            );
        }

        model.validate()?;
        model.normalize();
        Ok(model)
    }
}

impl Engine {
    /// Seed an engine with the expansion of `template`.
    pub fn from_template(config: EngineConfig, template: &ModelTemplate) -> EngineResult<Self> {
        Engine::from_models(config, [template.expand()?])
    }

    /// Read a JSON [`TemplateFile`] and seed an engine from it.
    pub fn import_template(path: impl AsRef<Path>) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let file: TemplateFile = serde_json::from_str(&contents)?;
        tracing::info!(
            path = %path.as_ref().display(),
            node_types = file.model.node_types.len(),
            variables = file.model.variables.len(),
            "importing template"
        );
        Engine::from_template(file.parameters, &file.model)
    }
}
