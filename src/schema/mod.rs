//! Entity schemas
//!
//! A schema is one Object validator bound to an entity type name,
//! generated once at construction time from an ordered field declaration
//! set. Schemas are immutable after `build()` and shared behind `Arc`.

mod builder;
pub mod registry;

pub use builder::SchemaBuilder;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::entity::Entity;
use crate::validators::errors::ValidationResult;
use crate::validators::{Kind, Validator};
use crate::value::Value;

/// The validator describing an entire entity's field set.
#[derive(Debug)]
pub struct Schema {
    name: String,
    object: Validator,
    empty_default: bool,
}

impl Schema {
    /// Starts declaring a new schema.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    pub(crate) fn from_parts(name: String, object: Validator, empty_default: bool) -> Self {
        Self {
            name,
            object,
            empty_default,
        }
    }

    /// The entity type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The whole-entity Object validator.
    pub fn object_validator(&self) -> &Validator {
        &self.object
    }

    /// Declared properties, in declaration order.
    pub fn properties(&self) -> &IndexMap<String, Validator> {
        match &self.object.kind {
            Kind::Object(rules) => &rules.properties,
            // The builder is the only constructor; the kind is always Object.
            _ => unreachable!("schema validator is always an object"),
        }
    }

    /// Property names without defaults, in declaration order.
    pub fn required(&self) -> &[String] {
        match &self.object.kind {
            Kind::Object(rules) => &rules.required,
            _ => unreachable!("schema validator is always an object"),
        }
    }

    /// Whether embedding this schema as a field materializes an empty
    /// object default.
    pub fn has_empty_default(&self) -> bool {
        self.empty_default
    }

}

/// Validation entry point for shared schemas.
///
/// The collaborator boundary: a web layer decodes a request body into a
/// raw value and calls `validate` with coercion on and `force_format`
/// set, receiving either a fully formatted entity or one structured
/// validation error.
pub trait SchemaExt {
    fn validate(
        &self,
        value: Value,
        allow_coerce: bool,
        force_format: bool,
    ) -> ValidationResult<Entity>;
}

impl SchemaExt for Arc<Schema> {
    fn validate(
        &self,
        value: Value,
        allow_coerce: bool,
        force_format: bool,
    ) -> ValidationResult<Entity> {
        let mut entity = Entity::from_value(self, value)?;
        if force_format {
            entity.format(allow_coerce)?;
        }
        Ok(entity)
    }
}
