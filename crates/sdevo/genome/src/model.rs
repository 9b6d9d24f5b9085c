//! The model genome.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use regex::Regex;
use sdevo_formulation::{FormulationSandbox, InterpreterSandbox};

use crate::error::{GenomeError, GenomeResult};
use crate::variable::Variable;

/// How a model's fitness is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessFunctionType {
    /// Always `0.0`.
    #[default]
    ZeroFitness,
    /// Sum over every variable and row of the row's largest present weight.
    SimpleMaximum,
    /// Synthesize, run for `step_count` steps and evaluate the fitness
    /// equations.
    SystemDynamics,
}

impl std::fmt::Display for FitnessFunctionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroFitness => write!(f, "zero fitness"),
            Self::SimpleMaximum => write!(f, "simple maximum"),
            Self::SystemDynamics => write!(f, "system dynamics"),
        }
    }
}

fn default_step_count() -> usize {
    10
}

fn default_step_size() -> f64 {
    1.0
}

/// A candidate system-dynamics model.
///
/// Fitness is computed lazily and cached. Every mutator that can change the
/// simulated dynamics clears the cache. A `NaN` fitness is cached as negative
/// infinity so failed models always sort last.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Model {
    variables: Vec<Variable>,
    fitness_equations: Vec<String>,
    node_names: Vec<String>,
    #[serde(default)]
    fitness_function_type: FitnessFunctionType,
    #[serde(default = "default_step_count")]
    step_count: usize,
    #[serde(default = "default_step_size")]
    step_size: f64,
    #[serde(default)]
    equation_evolution: bool,
    #[serde(skip)]
    cached_fitness: Option<f64>,
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.variables == other.variables
            && self.fitness_equations == other.fitness_equations
            && self.node_names == other.node_names
            && self.fitness_function_type == other.fitness_function_type
            && self.step_count == other.step_count
            && self.step_size == other.step_size
            && self.equation_evolution == other.equation_evolution
    }
}

impl Model {
    /// An empty model over the given nodes with blank fitness equations.
    pub fn new<S: Into<String>>(node_names: impl IntoIterator<Item = S>) -> Self {
        let node_names: Vec<String> = node_names.into_iter().map(Into::into).collect();
        Self {
            variables: Vec::new(),
            fitness_equations: vec![String::new(); node_names.len()],
            node_names,
            fitness_function_type: FitnessFunctionType::default(),
            step_count: default_step_count(),
            step_size: default_step_size(),
            equation_evolution: false,
            cached_fitness: None,
        }
    }

    /// A model whose nodes are named `Node1`, `Node2`, ...
    pub fn with_node_count(count: usize) -> Self {
        Self::new((1..=count).map(|i| format!("Node{i}")))
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.push_variable(variable);
        self
    }

    pub fn with_fitness_equations<S: Into<String>>(
        mut self,
        equations: impl IntoIterator<Item = S>,
    ) -> Self {
        self.fitness_equations = equations.into_iter().map(Into::into).collect();
        self.cached_fitness = None;
        self
    }

    pub fn with_fitness_function(mut self, kind: FitnessFunctionType) -> Self {
        self.set_fitness_function_type(kind);
        self
    }

    pub fn with_steps(mut self, step_count: usize, step_size: f64) -> Self {
        self.set_step_count(step_count);
        self.set_step_size(step_size);
        self
    }

    pub fn with_equation_evolution(mut self, enabled: bool) -> Self {
        self.equation_evolution = enabled;
        self
    }

    // --- Structure ---

    pub fn node_count(&self) -> usize {
        self.fitness_equations.len()
    }

    pub fn node_name(&self, index: usize) -> &str {
        &self.node_names[index]
    }

    pub fn node_names(&self) -> &[String] {
        &self.node_names
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, index: usize) -> Option<&Variable> {
        self.variables.get(index)
    }

    /// Mutable access to one variable. Clears the fitness cache.
    pub fn variable_mut(&mut self, index: usize) -> Option<&mut Variable> {
        self.cached_fitness = None;
        self.variables.get_mut(index)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn push_variable(&mut self, variable: Variable) {
        self.variables.push(variable);
        self.cached_fitness = None;
    }

    /// Replace one node equation of one variable.
    pub fn set_equation(&mut self, variable: usize, node: usize, equation: impl Into<String>) {
        if let Some(v) = self.variable_mut(variable) {
            if let Some(slot) = v.equations.get_mut(node) {
                *slot = equation.into();
            }
        }
    }

    /// Replace one coefficient cell of one variable.
    pub fn set_coefficient(&mut self, variable: usize, row: usize, col: usize, value: Option<f64>) {
        if let Some(v) = self.variable_mut(variable) {
            v.coefficients.set(row, col, value);
        }
    }

    pub fn fitness_equations(&self) -> &[String] {
        &self.fitness_equations
    }

    pub fn set_fitness_equation(&mut self, node: usize, equation: impl Into<String>) {
        if let Some(slot) = self.fitness_equations.get_mut(node) {
            *slot = equation.into();
            self.cached_fitness = None;
        }
    }

    pub fn fitness_function_type(&self) -> FitnessFunctionType {
        self.fitness_function_type
    }

    pub fn set_fitness_function_type(&mut self, kind: FitnessFunctionType) {
        self.fitness_function_type = kind;
        self.cached_fitness = None;
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn set_step_count(&mut self, step_count: usize) {
        self.step_count = step_count;
        self.cached_fitness = None;
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn set_step_size(&mut self, step_size: f64) {
        self.step_size = step_size;
        self.cached_fitness = None;
    }

    pub fn equation_evolution(&self) -> bool {
        self.equation_evolution
    }

    pub fn set_equation_evolution(&mut self, enabled: bool) {
        self.equation_evolution = enabled;
    }

    /// Check that every per-node sequence has one entry per node, every
    /// matrix is N×N and every variable name is a usable identifier.
    pub fn validate(&self) -> GenomeResult<()> {
        let n = self.node_count();
        if self.node_names.len() != n {
            return Err(GenomeError::InvalidModel(format!(
                "{} node names for {} nodes",
                self.node_names.len(),
                n
            )));
        }
        for variable in &self.variables {
            if !identifier_pattern().is_match(&variable.name) {
                return Err(GenomeError::InvalidModel(format!(
                    "variable name '{}' is not an identifier",
                    variable.name
                )));
            }
            if variable.equations.len() != n || variable.coefficients.size() != n {
                return Err(GenomeError::InvalidModel(format!(
                    "variable '{}' has {} equations and a {}x{} matrix, expected {}",
                    variable.name,
                    variable.equations.len(),
                    variable.coefficients.size(),
                    variable.coefficients.size(),
                    n
                )));
            }
        }
        Ok(())
    }

    // --- Fitness ---

    pub fn cached_fitness(&self) -> Option<f64> {
        self.cached_fitness
    }

    pub fn invalidate_fitness(&mut self) {
        self.cached_fitness = None;
    }

    /// Cached fitness, evaluating system-dynamics models in-process.
    pub fn fitness(&mut self) -> f64 {
        self.fitness_with(&InterpreterSandbox::default())
    }

    /// Cached fitness, evaluating system-dynamics models with `sandbox`.
    pub fn fitness_with<S: FormulationSandbox + ?Sized>(&mut self, sandbox: &S) -> f64 {
        if let Some(fitness) = self.cached_fitness {
            return fitness;
        }
        let raw = self.calculate_fitness(sandbox);
        let fitness = if raw.is_nan() { f64::NEG_INFINITY } else { raw };
        self.cached_fitness = Some(fitness);
        fitness
    }

    /// Uncached fitness; may be `NaN` when a system-dynamics build or run
    /// fails.
    pub fn calculate_fitness<S: FormulationSandbox + ?Sized>(&self, sandbox: &S) -> f64 {
        match self.fitness_function_type {
            FitnessFunctionType::ZeroFitness => 0.0,
            FitnessFunctionType::SimpleMaximum => self.simple_maximum_fitness(),
            FitnessFunctionType::SystemDynamics => self.system_dynamics_fitness(sandbox),
        }
    }

    fn simple_maximum_fitness(&self) -> f64 {
        self.variables
            .iter()
            .flat_map(|v| (0..v.coefficients.size()).map(move |row| v.coefficients.row_max(row)))
            .sum()
    }

    fn system_dynamics_fitness<S: FormulationSandbox + ?Sized>(&self, sandbox: &S) -> f64 {
        let result = self.formulation_source().and_then(|source| {
            sandbox
                .evaluate(&source, self.step_size, self.step_count)
                .map_err(GenomeError::from)
        });
        match result {
            Ok(fitness) => fitness,
            Err(error) => {
                tracing::debug!(error = %error, "system dynamics evaluation failed");
                f64::NAN
            }
        }
    }

    /// Scale every coefficient row to sum to one. Clears the fitness cache.
    pub fn normalize(&mut self) {
        for variable in &mut self.variables {
            variable.coefficients.normalize_rows();
        }
        self.cached_fitness = None;
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
            .unwrap_or_else(|e| unreachable!("identifier pattern is valid: {e}"))
    })
}
