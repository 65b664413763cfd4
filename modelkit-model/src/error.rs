//! Error types for the model container

use modelkit_params::ParamError;
use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while building or mutating a model
#[derive(Debug, Error)]
pub enum ModelError {
    /// A per-field validation failure (type mismatch, out of bounds, ...)
    #[error(transparent)]
    Param(#[from] ParamError),

    /// One or more required parameters were never set
    #[error("required parameters missing: {names:?}")]
    MissingRequired { names: Vec<String> },

    /// The name resolves to neither a schema field nor a stored attribute
    #[error("model has no attribute '{name}'")]
    UnknownAttribute { name: String },

    /// The name cannot be resolved against the schema at all
    #[error("unknown parameter: {name}")]
    UnknownParameter { name: String },

    /// Duplicate field or alias name in a schema
    #[error("duplicate parameter name: {name}")]
    DuplicateName { name: String },

    /// A stale derived parameter was read with no loader registered
    #[error("derived parameter '{name}' has no loader")]
    NoLoader { name: String },

    /// A loader was registered for a field that is not derived
    #[error("'{name}' is not a derived parameter")]
    NotDerived { name: String },

    /// A typed read found no current value
    #[error("parameter '{name}' is unset")]
    Unset { name: String },

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
