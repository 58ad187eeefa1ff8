//! Global name→schema registry
//!
//! Ref validators hold only a schema name and resolve it here the first
//! time they are dereferenced. Deferring the lookup is what lets a schema
//! mention itself (or a mutual partner) while it is still being built.
//! Registration happens at startup; reads dominate afterwards.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;

use super::Schema;
use crate::validators::errors::{ConfigResult, ConfigurationError};

lazy_static! {
    static ref SCHEMAS: RwLock<HashMap<String, Arc<Schema>>> = RwLock::new(HashMap::new());
}

/// Registers a schema under its own name.
///
/// Names are unique for the life of the process; a second registration
/// under the same name is a configuration error.
pub fn register(schema: &Arc<Schema>) -> ConfigResult<()> {
    let mut schemas = SCHEMAS.write().unwrap_or_else(|e| e.into_inner());
    if schemas.contains_key(schema.name()) {
        return Err(ConfigurationError::DuplicateSchema(schema.name().to_string()));
    }
    schemas.insert(schema.name().to_string(), schema.clone());
    tracing::debug!(schema = %schema.name(), "schema registered");
    Ok(())
}

/// Resolves a schema by name.
pub fn get(name: &str) -> Option<Arc<Schema>> {
    let schemas = SCHEMAS.read().unwrap_or_else(|e| e.into_inner());
    schemas.get(name).cloned()
}
