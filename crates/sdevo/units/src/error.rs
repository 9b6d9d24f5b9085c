/// Errors from unit parsing and dimensional arithmetic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("unknown unit symbol: '{0}'")]
    UnknownUnit(String),
    #[error("malformed unit expression '{input}': {message}")]
    Malformed { input: String, message: String },
    #[error("incompatible dimensions: [{left}] and [{right}]")]
    Incompatible { left: String, right: String },
    #[error("dimension exponent out of range combining [{left}] and [{right}]")]
    ExponentOverflow { left: String, right: String },
}
