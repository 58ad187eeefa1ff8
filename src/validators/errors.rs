//! Validation and configuration error types
//!
//! Validation failures carry a detail tree that mirrors the shape of the
//! input: scalar validators produce a single `(code, message)` leaf, while
//! Object and Array validators aggregate per-field / per-index sub-errors
//! into groups keyed the same way the input was keyed. Error locations are
//! walkable programmatically and render to JSON for transport.
//!
//! Structural misuse of the builder API is a `ConfigurationError`, raised
//! once at construction time and never at validate time.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for construction-time configuration.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Location of a sub-error inside a detail group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    /// Object property name.
    Field(String),
    /// Array element index.
    Index(usize),
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKey::Field(name) => write!(f, "{}", name),
            ErrorKey::Index(i) => write!(f, "{}", i),
        }
    }
}

/// One node of a validation error, mirroring the input's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// A single failed check.
    Leaf {
        /// Stable error code, e.g. `min_length` or `required`.
        code: &'static str,
        /// Rendered message template.
        message: String,
    },
    /// Sub-errors keyed by field name or element index.
    Group(IndexMap<ErrorKey, ErrorDetail>),
}

impl ErrorDetail {
    /// Returns the code when this node is a leaf.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            ErrorDetail::Leaf { code, .. } => Some(code),
            ErrorDetail::Group(_) => None,
        }
    }

    /// Returns the message when this node is a leaf.
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorDetail::Leaf { message, .. } => Some(message),
            ErrorDetail::Group(_) => None,
        }
    }

    /// Looks up the sub-error for an object field.
    pub fn field(&self, name: &str) -> Option<&ErrorDetail> {
        match self {
            ErrorDetail::Group(map) => map.get(&ErrorKey::Field(name.to_string())),
            ErrorDetail::Leaf { .. } => None,
        }
    }

    /// Looks up the sub-error for an array index.
    pub fn index(&self, i: usize) -> Option<&ErrorDetail> {
        match self {
            ErrorDetail::Group(map) => map.get(&ErrorKey::Index(i)),
            ErrorDetail::Leaf { .. } => None,
        }
    }

    /// Renders the detail tree as JSON, messages at the leaves.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ErrorDetail::Leaf { message, .. } => serde_json::Value::String(message.clone()),
            ErrorDetail::Group(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, detail)| (key.to_string(), detail.to_json()))
                    .collect(),
            ),
        }
    }
}

/// A failed validation, carrying a shape-mirroring detail tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    detail: ErrorDetail,
}

impl ValidationError {
    /// Creates a single-check failure.
    pub fn single(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            detail: ErrorDetail::Leaf {
                code,
                message: message.into(),
            },
        }
    }

    /// Creates an aggregated failure from per-key sub-errors.
    pub fn grouped(entries: IndexMap<ErrorKey, ErrorDetail>) -> Self {
        Self {
            detail: ErrorDetail::Group(entries),
        }
    }

    /// Returns the detail tree.
    pub fn detail(&self) -> &ErrorDetail {
        &self.detail
    }

    /// Returns the code when the error is a single leaf.
    pub fn code(&self) -> Option<&'static str> {
        self.detail.code()
    }

    /// Shorthand for walking into an object field's sub-error.
    pub fn field(&self, name: &str) -> Option<&ErrorDetail> {
        self.detail.field(name)
    }

    /// Shorthand for walking into an array element's sub-error.
    pub fn index(&self, i: usize) -> Option<&ErrorDetail> {
        self.detail.index(i)
    }

    /// Renders the error as JSON for transport.
    pub fn to_json(&self) -> serde_json::Value {
        self.detail.to_json()
    }

    pub(crate) fn into_detail(self) -> ErrorDetail {
        self.detail
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            ErrorDetail::Leaf { message, .. } => write!(f, "{}", message),
            group => write!(f, "{}", group.to_json()),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Structural misuse of the construction API.
///
/// Raised at schema/validator construction or startup-configuration time,
/// never while validating request data.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    #[error("Cannot use reserved name \"{name}\" on schema \"{schema}\", as it clashes with the entity interface")]
    ReservedName { schema: String, name: String },

    #[error("Duplicate field \"{name}\" on schema \"{schema}\"")]
    DuplicateField { schema: String, name: String },

    #[error("Invalid pattern /{pattern}/: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Union must declare at least one alternative")]
    EmptyUnion,

    #[error("Schema \"{0}\" is already registered")]
    DuplicateSchema(String),

    #[error("Cannot load message overrides from {path}: {reason}")]
    MessageCatalog { path: String, reason: String },
}
