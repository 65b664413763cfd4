//! Error types for parameter validation

use thiserror::Error;

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, ParamError>;

/// Errors raised by per-field validation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParamError {
    /// Value does not match the field's declared type
    #[error("parameter '{name}' expects {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Numeric value outside the declared bounds
    #[error("parameter '{name}' value {value} is out of bounds [{low}, {high}]")]
    OutOfBounds {
        name: String,
        value: f64,
        low: f64,
        high: f64,
    },

    /// Bounds/errors/free supplied for a field that is not a numeric parameter
    #[error("field '{name}' is not a numeric parameter")]
    NotNumeric { name: String },
}
