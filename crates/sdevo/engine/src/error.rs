use sdevo_formulation::FormulationError;
use sdevo_genome::GenomeError;

/// Errors from engine construction, configuration and persistence.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("genome error: {0}")]
    Genome(#[from] GenomeError),

    #[error("formulation error: {0}")]
    Formulation(#[from] FormulationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    #[error("seed population is empty")]
    EmptyPopulation,
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
