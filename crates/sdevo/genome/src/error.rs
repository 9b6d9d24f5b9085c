use sdevo_formulation::FormulationError;

/// Errors from genome construction and equation synthesis.
#[derive(Debug, thiserror::Error)]
pub enum GenomeError {
    #[error("malformed equation '{equation}': {message}")]
    MalformedEquation { equation: String, message: String },
    #[error("shape mismatch: {0}")]
    Shape(String),
    #[error("invalid model: {0}")]
    InvalidModel(String),
    #[error("formulation failed: {0}")]
    Formulation(#[from] FormulationError),
}

/// Result type alias for genome operations
pub type GenomeResult<T> = Result<T, GenomeError>;
