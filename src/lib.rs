//! veritype - a strict, composable schema validation and serialization engine
//!
//! Raw JSON-like input flows through a schema's Object validator into a
//! two-phase entity store, and back out through the encoder hook as plain
//! JSON. Field-level string formats (dates, UUIDs, custom converters)
//! apply only at the read/serialize boundary.

pub mod config;
pub mod entity;
pub mod formats;
pub mod schema;
pub mod validators;
pub mod value;

pub use config::{install, Config};
pub use entity::{Entity, EntityError, EntityResult, FieldLoader, FieldState, LazyEntity, LoadError};
pub use schema::{Schema, SchemaBuilder, SchemaExt};
pub use validators::{ConfigurationError, ErrorDetail, ErrorKey, ValidationError, Validator};
pub use value::Value;
