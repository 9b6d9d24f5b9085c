//! The textual input to a formulation build.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved read-only symbol bound to the configured step size.
pub const STEP_SIZE: &str = "stepSize";

/// A state register with its initial-value expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub initial: String,
}

impl Declaration {
    pub fn new(name: impl Into<String>, initial: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: initial.into(),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.initial)
    }
}

/// Declarations, knit statements, split statements and the fitness
/// expression of one model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormulationSource {
    pub declarations: Vec<Declaration>,
    pub knit: Vec<String>,
    pub split: Vec<String>,
    pub fitness: String,
}

impl FormulationSource {
    pub fn new(
        declarations: Vec<Declaration>,
        knit: Vec<String>,
        split: Vec<String>,
        fitness: impl Into<String>,
    ) -> Self {
        Self {
            declarations,
            knit,
            split,
            fitness: fitness.into(),
        }
    }
}

/// Renders the program text written to scratch artifacts.
impl fmt::Display for FormulationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# declarations")?;
        for declaration in &self.declarations {
            writeln!(f, "{}", declaration)?;
        }
        writeln!(f, "# knit")?;
        for line in &self.knit {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "# split")?;
        for line in &self.split {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "# fitness")?;
        writeln!(f, "{}", self.fitness)
    }
}
