//! Entity access errors

use thiserror::Error;

use crate::validators::errors::ValidationError;

/// Result type for entity reads and writes.
pub type EntityResult<T> = Result<T, EntityError>;

/// A failed loader invocation on a lazy entity.
#[derive(Debug, Clone, Error)]
#[error("load failed: {0}")]
pub struct LoadError(pub String);

/// Errors raised by entity access.
#[derive(Debug, Clone, Error)]
pub enum EntityError {
    /// The field name is not declared on the schema.
    #[error("invalid field \"{0}\"")]
    UnknownField(String),

    /// The field is declared but unset and has no default.
    #[error("field \"{0}\" is not set")]
    Missing(String),

    /// A write or merge failed the field's validator.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The lazy entity's loader failed; observed at the await point.
    #[error(transparent)]
    Load(#[from] LoadError),
}
