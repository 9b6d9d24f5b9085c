#![deny(unsafe_code)]
//! # sdevo-genome
//!
//! The genome of a system-dynamics model and the synthesis that turns it into
//! a runnable formulation.
//!
//! A [`Model`] holds an ordered list of [`Variable`]s. Each variable carries
//! one equation per node and an N×N [`CoefficientMatrix`] whose present cells
//! route the variable's combined value from a source node to destination
//! nodes. Synthesis expands that compact form into explicit per-node
//! statements:
//!
//! - **knit**: each node's equations with variable names made node-specific,
//!   assigned to the `_combined` registers (stocks accumulate with `+=`);
//! - **split**: each destination's value as the coefficient-weighted sum of
//!   the combined registers;
//! - **fitness**: the per-node fitness equations summed into one expression.
//!
//! A [`Population`] keeps models sorted best-first by fitness.

pub mod equation;
pub mod error;
pub mod matrix;
pub mod model;
pub mod population;
pub mod synthesis;
pub mod variable;

pub use equation::{substitute_names, EquationShape};
pub use error::{GenomeError, GenomeResult};
pub use matrix::CoefficientMatrix;
pub use model::{FitnessFunctionType, Model};
pub use population::Population;
pub use synthesis::{extract_variables, KnitEquation, COMBINED_SUFFIX, REGULAR_SUFFIX};
pub use variable::Variable;
