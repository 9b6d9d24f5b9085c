//! Formulation error types

/// Errors raised while building or running a formulation
#[derive(Debug, thiserror::Error)]
pub enum FormulationError {
    #[error("parse error at line {line}, column {col}: {message}")]
    Parse {
        line: usize,
        col: usize,
        message: String,
    },

    #[error("expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("unknown symbol: '{0}'")]
    UnknownSymbol(String),

    #[error("unknown function: '{0}'")]
    UnknownFunction(String),

    #[error("function '{name}' expects {expected} argument(s), found {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid argument for '{function}': {message}")]
    InvalidArgument { function: String, message: String },

    #[error("duplicate declaration: '{0}'")]
    DuplicateDeclaration(String),

    #[error("assignment to undeclared variable: '{0}'")]
    UndeclaredTarget(String),

    #[error("'{0}' is a reserved symbol")]
    ReservedSymbol(String),

    #[error("fitness expression is empty")]
    EmptyFitness,

    #[error("fitness evaluated to a non-finite value: {0}")]
    NonFiniteFitness(f64),

    #[error("scratch artifact error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for formulation operations
pub type FormulationResult<T> = Result<T, FormulationError>;
