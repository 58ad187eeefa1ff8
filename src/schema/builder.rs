//! Schema builder
//!
//! Turns an ordered field declaration set into one Object validator bound
//! to a new entity type. Inherited properties come first, in the base's
//! own declared order; a same-named redeclaration replaces the inherited
//! validator in place, keeping its position. Newly declared fields sort by
//! their creation position, which recovers declaration order even when
//! validators were constructed out of line.
//!
//! Structural misuse is rejected here, at construction time, so a bad
//! declaration never survives to request validation.

use std::sync::Arc;

use indexmap::IndexMap;

use super::Schema;
use crate::validators::errors::{ConfigResult, ConfigurationError};
use crate::validators::{object, AdditionalProperties, Kind, ObjectRules, Validator};

/// Field names that clash with the entity interface surface.
const RESERVED_NAMES: [&str; 5] = ["keys", "items", "values", "get", "validator"];

/// Declares the field set for a new entity type.
pub struct SchemaBuilder {
    name: String,
    base: Option<Arc<Schema>>,
    fields: Vec<(String, Validator)>,
    additional: AdditionalProperties,
    min_properties: Option<usize>,
    max_properties: Option<usize>,
    empty_default: bool,
}

impl SchemaBuilder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            fields: Vec::new(),
            additional: AdditionalProperties::Drop,
            min_properties: None,
            max_properties: None,
            empty_default: false,
        }
    }

    /// Declares a field. Declaration order is preserved.
    pub fn field(mut self, name: impl Into<String>, validator: Validator) -> Self {
        self.fields.push((name.into(), validator));
        self
    }

    /// Inherits every property of `base`, in the base's declared order.
    /// Same-named declarations on this builder override in place.
    pub fn extends(mut self, base: &Arc<Schema>) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Policy for keys outside the declared property set. Defaults to
    /// dropping them.
    pub fn additional_properties(mut self, policy: AdditionalProperties) -> Self {
        self.additional = policy;
        self
    }

    /// Requires at least `min` supplied properties. An empty input reports
    /// `empty` when the minimum is one or more.
    pub fn min_properties(mut self, min: usize) -> Self {
        self.min_properties = Some(min);
        self
    }

    /// Caps the number of supplied properties.
    pub fn max_properties(mut self, max: usize) -> Self {
        self.max_properties = Some(max);
        self
    }

    /// Embedding this schema as a field of another entity materializes an
    /// empty object default instead of being required.
    pub fn with_empty_default(mut self) -> Self {
        self.empty_default = true;
        self
    }

    /// Builds the schema, rejecting structural misuse.
    pub fn build(self) -> ConfigResult<Arc<Schema>> {
        for (name, _) in &self.fields {
            if RESERVED_NAMES.contains(&name.as_str()) {
                return Err(ConfigurationError::ReservedName {
                    schema: self.name.clone(),
                    name: name.clone(),
                });
            }
        }

        let mut declared = self.fields;
        declared.sort_by_key(|(_, validator)| validator.position());

        let mut properties: IndexMap<String, Validator> = match &self.base {
            Some(base) => base.properties().clone(),
            None => IndexMap::new(),
        };
        let inherited: Vec<String> = properties.keys().cloned().collect();
        let mut overridden: Vec<String> = Vec::new();

        for (name, validator) in declared {
            let inherited_slot = inherited.iter().any(|n| *n == name);
            if inherited_slot && !overridden.iter().any(|n| *n == name) {
                // Inherited field overridden in place: position preserved,
                // validator replaced.
                overridden.push(name.clone());
                properties[&name] = validator;
            } else if properties.contains_key(&name) {
                return Err(ConfigurationError::DuplicateField {
                    schema: self.name.clone(),
                    name,
                });
            } else {
                properties.insert(name, validator);
            }
        }

        for validator in properties.values() {
            check_composites(validator)?;
        }

        let required: Vec<String> = properties
            .iter()
            .filter(|(_, validator)| !validator.has_default())
            .map(|(name, _)| name.clone())
            .collect();

        let rules = ObjectRules {
            def_name: self.name.clone(),
            properties,
            required,
            additional: self.additional,
            min_properties: self.min_properties,
            max_properties: self.max_properties,
        };

        tracing::debug!(schema = %self.name, "schema built");
        Ok(Arc::new(Schema::from_parts(
            self.name,
            object(rules),
            self.empty_default,
        )))
    }
}

/// Rejects malformed composite declarations anywhere in the field tree.
fn check_composites(validator: &Validator) -> ConfigResult<()> {
    match &validator.kind {
        Kind::Union(alternatives) => {
            if alternatives.is_empty() {
                return Err(ConfigurationError::EmptyUnion);
            }
            for alternative in alternatives {
                check_composites(alternative)?;
            }
        }
        Kind::Array(rules) => match &rules.items {
            crate::validators::Items::One(item) => check_composites(item)?,
            crate::validators::Items::Tuple(shape) => {
                for item in shape {
                    check_composites(item)?;
                }
            }
            crate::validators::Items::Any => {}
        },
        Kind::Object(rules) => {
            for child in rules.properties.values() {
                check_composites(child)?;
            }
        }
        _ => {}
    }
    Ok(())
}
