use sdevo_units::PhysicalQuantity;
use serde::{Deserialize, Serialize};

use crate::matrix::CoefficientMatrix;

/// A named quantity with one equation per node and an N×N influence matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub unit: PhysicalQuantity,
    pub equations: Vec<String>,
    pub coefficients: CoefficientMatrix,
}

impl Variable {
    /// A dimensionless variable with empty equations and no coefficients.
    pub fn new(name: impl Into<String>, node_count: usize) -> Self {
        Self {
            name: name.into(),
            unit: PhysicalQuantity::one(),
            equations: vec![String::new(); node_count],
            coefficients: CoefficientMatrix::new(node_count),
        }
    }

    pub fn with_unit(mut self, unit: PhysicalQuantity) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_equations<S: Into<String>>(mut self, equations: impl IntoIterator<Item = S>) -> Self {
        self.equations = equations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_coefficients(mut self, coefficients: CoefficientMatrix) -> Self {
        self.coefficients = coefficients;
        self
    }

    pub fn node_count(&self) -> usize {
        self.equations.len()
    }
}
