//! Entity container
//!
//! An entity is an ordered field store bound to a schema, with two-phase
//! state. Before `format()` the store holds exactly what the caller
//! supplied, untouched. `format()` runs the whole-entity validator once,
//! replacing the store with the validated result and materializing
//! defaults for omitted fields; a second call is a no-op. Deleting a field
//! after formatting immediately re-materializes its default (or null);
//! before formatting it simply removes the field until the next sweep.
//!
//! Reads come in two flavors. `get` returns the native value.
//! `get_formatted` is the mapping-style read: it additionally applies the
//! format registry's `to_string` when the field's validator declares a
//! format, which is the only place a native value turns back into a
//! string.

mod errors;
mod lazy;

pub use errors::{EntityError, EntityResult, LoadError};
pub use lazy::{FieldLoader, LazyEntity};

use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::formats;
use crate::schema::Schema;
use crate::validators::errors::{ValidationError, ValidationResult};
use crate::value::Value;

/// Per-field state inside the store.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldState {
    /// Declared but not supplied.
    Unset,
    /// Supplied by the caller, not yet swept by `format()`.
    Raw(Value),
    /// Validated/coerced by a `format()` sweep (or written post-format).
    Formatted(Value),
}

impl FieldState {
    fn value(&self) -> Option<&Value> {
        match self {
            FieldState::Unset => None,
            FieldState::Raw(v) | FieldState::Formatted(v) => Some(v),
        }
    }

    fn is_set(&self) -> bool {
        !matches!(self, FieldState::Unset)
    }
}

/// A raw/formatted dual-state mapping bound to a schema.
#[derive(Debug, Clone)]
pub struct Entity {
    schema: Arc<Schema>,
    store: IndexMap<String, FieldState>,
    formatted: bool,
    allow_coerce: bool,
}

impl Entity {
    /// An empty entity: every declared field unset.
    pub fn new(schema: &Arc<Schema>) -> Self {
        let store = schema
            .properties()
            .keys()
            .map(|name| (name.clone(), FieldState::Unset))
            .collect();
        Self {
            schema: schema.clone(),
            store,
            formatted: false,
            allow_coerce: false,
        }
    }

    /// Builds an entity from a mapping value, storing it raw.
    ///
    /// Unknown keys stay in the store until `format()` applies the
    /// schema's additional-properties policy.
    pub fn from_value(schema: &Arc<Schema>, value: Value) -> ValidationResult<Self> {
        let supplied = match value {
            Value::Object(map) => map,
            _ => return Err(ValidationError::single("type", "Must be an object.")),
        };

        let mut entity = Self::new(schema);
        for (name, value) in supplied {
            entity.store.insert(name, FieldState::Raw(value));
        }
        Ok(entity)
    }

    /// Builds an entity from ordered field pairs, storing them raw.
    pub fn from_pairs(
        schema: &Arc<Schema>,
        pairs: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let mut entity = Self::new(schema);
        for (name, value) in pairs {
            entity.store.insert(name, FieldState::Raw(value));
        }
        entity
    }

    /// Builds an entity from any serializable source, pulling only
    /// declared fields. A declared field the source lacks falls back to
    /// its own default, or stays unset.
    pub fn from_source<T: Serialize>(
        schema: &Arc<Schema>,
        source: &T,
    ) -> ValidationResult<Self> {
        let encoded = serde_json::to_value(source)
            .map_err(|_| ValidationError::single("type", "Must be an object."))?;
        let attrs = match Value::from(encoded) {
            Value::Object(map) => map,
            _ => return Err(ValidationError::single("type", "Must be an object.")),
        };

        let mut entity = Self::new(schema);
        for (name, validator) in schema.properties() {
            if let Some(value) = attrs.get(name) {
                entity.store.insert(name.clone(), FieldState::Raw(value.clone()));
            } else if let Some(default) = validator.get_default() {
                entity.store.insert(name.clone(), FieldState::Raw(default));
            }
        }
        Ok(entity)
    }

    /// The schema this entity is bound to.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Whether a full `format()` sweep has run.
    pub fn formatted(&self) -> bool {
        self.formatted
    }

    /// The coercion mode the last `format()` sweep used.
    pub fn allow_coerce(&self) -> bool {
        self.allow_coerce
    }

    /// Runs the whole-entity validator over the raw store, replacing it
    /// with the validated result. Idempotent: once formatted, further
    /// calls are no-ops even with a different coercion flag.
    pub fn format(&mut self, allow_coerce: bool) -> ValidationResult<()> {
        if self.formatted {
            return Ok(());
        }

        let raw: IndexMap<String, Value> = self
            .store
            .iter()
            .filter_map(|(name, state)| state.value().map(|v| (name.clone(), v.clone())))
            .collect();

        let validated = self
            .schema
            .object_validator()
            .validate(&Value::Object(raw), allow_coerce)?;
        let validated = match validated {
            Value::Object(map) => map,
            // The object validator only ever yields an object here.
            other => unreachable!("object validator returned {}", other.type_name()),
        };

        // Declared fields first, in declaration order, then any extras the
        // additional-properties policy let through.
        let mut store: IndexMap<String, FieldState> = IndexMap::new();
        for name in self.schema.properties().keys() {
            match validated.get(name) {
                Some(value) => store.insert(name.clone(), FieldState::Formatted(value.clone())),
                None => store.insert(name.clone(), FieldState::Formatted(Value::Null)),
            };
        }
        for (name, value) in validated {
            if !store.contains_key(&name) {
                store.insert(name, FieldState::Formatted(value));
            }
        }

        self.store = store;
        self.formatted = true;
        self.allow_coerce = allow_coerce;
        Ok(())
    }

    /// Attribute-style read: the native value, as stored.
    ///
    /// An absent field lazily materializes its default into the store;
    /// without one the read fails, naming the field.
    pub fn get(&mut self, name: &str) -> EntityResult<Value> {
        if let Some(state) = self.store.get(name) {
            if let Some(value) = state.value() {
                return Ok(value.clone());
            }
        } else if !self.schema.properties().contains_key(name) {
            return Err(EntityError::UnknownField(name.to_string()));
        }

        let validator = self
            .schema
            .properties()
            .get(name)
            .ok_or_else(|| EntityError::UnknownField(name.to_string()))?;
        match validator.get_default() {
            Some(default) => {
                let state = if self.formatted {
                    FieldState::Formatted(default.clone())
                } else {
                    FieldState::Raw(default.clone())
                };
                self.store.insert(name.to_string(), state);
                Ok(default)
            }
            None => Err(EntityError::Missing(name.to_string())),
        }
    }

    /// Mapping-style read: like `get`, but a declared format renders the
    /// native value back to its string form.
    pub fn get_formatted(&mut self, name: &str) -> EntityResult<Value> {
        let value = self.get(name)?;
        if value.is_null() {
            return Ok(value);
        }
        if let Some(format) = self
            .schema
            .properties()
            .get(name)
            .and_then(|v| v.format_name())
        {
            if let Some(handler) = formats::get(format) {
                if let Some(rendered) = handler.to_string(&value) {
                    return Ok(Value::String(rendered));
                }
            }
        }
        Ok(value)
    }

    /// Validated write. Unknown field names are rejected immediately and
    /// coercion is always disabled on direct writes.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> EntityResult<()> {
        let validator = self
            .schema
            .properties()
            .get(name)
            .ok_or_else(|| EntityError::UnknownField(name.to_string()))?;

        let validated = validator.validate(&value.into(), false)?;
        let state = if self.formatted {
            FieldState::Formatted(validated)
        } else {
            FieldState::Raw(validated)
        };
        self.store.insert(name.to_string(), state);
        Ok(())
    }

    /// Applies several writes in order, stopping at the first failure.
    pub fn update(
        &mut self,
        pairs: impl IntoIterator<Item = (String, Value)>,
    ) -> EntityResult<()> {
        for (name, value) in pairs {
            self.set(&name, value)?;
        }
        Ok(())
    }

    /// Deletes a field. After a `format()` sweep the field immediately
    /// re-materializes its default (or null); before one, it is simply
    /// removed until the next sweep.
    pub fn remove(&mut self, name: &str) -> EntityResult<()> {
        if !self.store.contains_key(name) {
            return Err(EntityError::UnknownField(name.to_string()));
        }

        let declared = self.schema.properties().contains_key(name);
        if self.formatted && declared {
            let default = self
                .schema
                .properties()
                .get(name)
                .and_then(|v| v.get_default())
                .unwrap_or(Value::Null);
            self.store
                .insert(name.to_string(), FieldState::Formatted(default));
        } else if declared {
            self.store.insert(name.to_string(), FieldState::Unset);
        } else {
            self.store.shift_remove(name);
        }
        Ok(())
    }

    /// Whether the field currently holds a value.
    pub fn contains(&self, name: &str) -> bool {
        self.store.get(name).map_or(false, FieldState::is_set)
    }

    /// Number of fields currently holding values.
    pub fn len(&self) -> usize {
        self.store.values().filter(|s| s.is_set()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over set fields in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.store
            .iter()
            .filter_map(|(name, state)| state.value().map(|v| (name.as_str(), v)))
    }

    /// Set field names, in store order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(name, _)| name)
    }

    /// The current store as a plain value, whatever state it is in. No
    /// implicit `format()`.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        )
    }

    /// Expands the entity to plain JSON, applying field-level string
    /// formats at this boundary only. Operates on the current state.
    pub fn to_json(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        for (name, value) in self.iter() {
            out.insert(name.to_string(), self.render_field(name, value));
        }
        serde_json::Value::Object(out)
    }

    /// Serializes to a JSON string via the encoder hook.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn render_field(&self, name: &str, value: &Value) -> serde_json::Value {
        if !value.is_null() {
            if let Some(format) = self
                .schema
                .properties()
                .get(name)
                .and_then(|v| v.format_name())
            {
                if let Some(handler) = formats::get(format) {
                    if let Some(rendered) = handler.to_string(value) {
                        return serde_json::Value::String(rendered);
                    }
                }
            }
        }
        value.to_json()
    }

    /// Merges a loader-discovered field without clobbering set values.
    pub(crate) fn merge_loaded(&mut self, name: String, value: Value) -> EntityResult<()> {
        if self.contains(&name) {
            return Ok(());
        }
        let declared = self.schema.properties().contains_key(&name);
        if self.formatted && declared {
            // Past the sweep, merged fields go through the field validator
            // like any other write.
            return self.set(&name, value);
        }
        self.store.insert(name, FieldState::Raw(value));
        Ok(())
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &self.render_field(name, value))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::validators::{date, integer, string, NumericRules, StringRules};

    fn person() -> Arc<Schema> {
        Schema::builder("EntityPerson")
            .field("name", string(StringRules::default()))
            .field(
                "age",
                integer(NumericRules::default()).default_value(0i64),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_entity_has_no_set_fields() {
        let entity = Entity::new(&person());
        assert!(!entity.contains("name"));
        assert_eq!(entity.len(), 0);
        assert!(entity.is_empty());
    }

    #[test]
    fn test_from_value_requires_mapping() {
        let err = Entity::from_value(&person(), Value::Integer(3)).unwrap_err();
        assert_eq!(err.code(), Some("type"));
        assert_eq!(err.to_string(), "Must be an object.");
    }

    #[test]
    fn test_store_holds_raw_values_before_format() {
        let mut entity = Entity::from_value(
            &person(),
            Value::from(serde_json::json!({"name": "a", "age": "41"})),
        )
        .unwrap();
        // No coercion, no defaults, exactly what was supplied.
        assert_eq!(entity.get("age").unwrap(), Value::from("41"));
        assert!(!entity.formatted());
    }

    #[test]
    fn test_format_validates_and_materializes_defaults() {
        let mut entity =
            Entity::from_value(&person(), Value::from(serde_json::json!({"name": "a"}))).unwrap();
        entity.format(false).unwrap();
        assert!(entity.formatted());
        assert_eq!(entity.get("age").unwrap(), Value::Integer(0));
        assert_eq!(entity.len(), 2);
    }

    #[test]
    fn test_format_is_idempotent() {
        let mut entity = Entity::from_value(
            &person(),
            Value::from(serde_json::json!({"name": "a", "age": "41"})),
        )
        .unwrap();
        entity.format(true).unwrap();
        assert_eq!(entity.get("age").unwrap(), Value::Integer(41));

        // A second sweep, even with a different flag, changes nothing.
        entity.format(false).unwrap();
        assert_eq!(entity.get("age").unwrap(), Value::Integer(41));
    }

    #[test]
    fn test_format_collects_required_errors() {
        let schema = Schema::builder("EntityRequired")
            .field("first", string(StringRules::default()))
            .field("second", string(StringRules::default()))
            .build()
            .unwrap();
        let mut entity = Entity::new(&schema);

        let err = entity.format(false).unwrap_err();
        assert_eq!(
            err.field("first").and_then(|d| d.code()),
            Some("required")
        );
        assert_eq!(
            err.field("second").and_then(|d| d.code()),
            Some("required")
        );
        assert!(!entity.formatted());
    }

    #[test]
    fn test_get_materializes_default_lazily() {
        let mut entity = Entity::new(&person());
        assert!(!entity.contains("age"));
        assert_eq!(entity.get("age").unwrap(), Value::Integer(0));
        // The default is now stored.
        assert!(entity.contains("age"));
    }

    #[test]
    fn test_get_without_default_fails_naming_field() {
        let mut entity = Entity::new(&person());
        match entity.get("name") {
            Err(EntityError::Missing(name)) => assert_eq!(name, "name"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_get_unknown_field() {
        let mut entity = Entity::new(&person());
        assert!(matches!(
            entity.get("nope"),
            Err(EntityError::UnknownField(_))
        ));
    }

    #[test]
    fn test_set_validates_without_coercion() {
        let mut entity = Entity::new(&person());
        entity.set("age", 41i64).unwrap();
        assert_eq!(entity.get("age").unwrap(), Value::Integer(41));

        let err = entity.set("age", "41").unwrap_err();
        assert!(matches!(err, EntityError::Validation(_)));
    }

    #[test]
    fn test_set_unknown_field_rejected() {
        let mut entity = Entity::new(&person());
        assert!(matches!(
            entity.set("nope", 1i64),
            Err(EntityError::UnknownField(_))
        ));
    }

    #[test]
    fn test_update_applies_in_order() {
        let mut entity = Entity::new(&person());
        entity
            .update(vec![
                ("name".to_string(), Value::from("a")),
                ("age".to_string(), Value::Integer(3)),
            ])
            .unwrap();
        assert_eq!(entity.len(), 2);
    }

    #[test]
    fn test_remove_before_format_unsets() {
        let mut entity =
            Entity::from_value(&person(), Value::from(serde_json::json!({"age": 3}))).unwrap();
        entity.remove("age").unwrap();
        assert!(!entity.contains("age"));
    }

    #[test]
    fn test_remove_after_format_rematerializes_default() {
        let mut entity =
            Entity::from_value(&person(), Value::from(serde_json::json!({"name": "a", "age": 3})))
                .unwrap();
        entity.format(false).unwrap();

        entity.remove("age").unwrap();
        assert!(entity.contains("age"));
        assert_eq!(entity.get("age").unwrap(), Value::Integer(0));

        // No default: null.
        entity.remove("name").unwrap();
        assert!(entity.contains("name"));
        assert_eq!(entity.get("name").unwrap(), Value::Null);
        assert_eq!(entity.len(), 2);
    }

    #[test]
    fn test_from_source_pulls_declared_fields() {
        #[derive(serde::Serialize)]
        struct Source {
            name: String,
            ignored: bool,
        }

        let mut entity = Entity::from_source(
            &person(),
            &Source {
                name: "a".to_string(),
                ignored: true,
            },
        )
        .unwrap();

        assert_eq!(entity.get("name").unwrap(), Value::from("a"));
        // Missing attribute fell back to the field default.
        assert_eq!(entity.get("age").unwrap(), Value::Integer(0));
        assert!(matches!(
            entity.get("ignored"),
            Err(EntityError::UnknownField(_))
        ));
    }

    #[test]
    fn test_to_value_reflects_current_state() {
        let mut entity =
            Entity::from_value(&person(), Value::from(serde_json::json!({"name": "a"}))).unwrap();
        assert_eq!(
            entity.to_value(),
            Value::from(serde_json::json!({"name": "a"}))
        );

        entity.format(false).unwrap();
        assert_eq!(
            entity.to_value(),
            Value::from(serde_json::json!({"name": "a", "age": 0}))
        );
    }

    #[test]
    fn test_formatted_read_applies_format() {
        let schema = Schema::builder("EntityDated")
            .field("day", date())
            .build()
            .unwrap();
        let mut entity =
            Entity::from_value(&schema, Value::from(serde_json::json!({"day": "1977-10-10"})))
                .unwrap();
        entity.format(false).unwrap();

        // Native value inside, string at the mapping-style read.
        assert!(matches!(entity.get("day").unwrap(), Value::Date(_)));
        assert_eq!(
            entity.get_formatted("day").unwrap(),
            Value::from("1977-10-10")
        );
        // The store still holds the native form.
        assert!(matches!(entity.get("day").unwrap(), Value::Date(_)));
    }

    #[test]
    fn test_to_json_applies_format_at_the_boundary() {
        let schema = Schema::builder("EntityJson")
            .field("day", date())
            .field("count", integer(NumericRules::default()))
            .build()
            .unwrap();
        let mut entity = Entity::from_value(
            &schema,
            Value::from(serde_json::json!({"day": "1977-10-10", "count": 3})),
        )
        .unwrap();
        entity.format(false).unwrap();

        assert_eq!(
            entity.to_json(),
            serde_json::json!({"day": "1977-10-10", "count": 3})
        );
        assert_eq!(
            entity.to_json_string().unwrap(),
            r#"{"day":"1977-10-10","count":3}"#
        );
    }

    #[test]
    fn test_to_json_without_format_keeps_raw_state() {
        let entity =
            Entity::from_value(&person(), Value::from(serde_json::json!({"age": "41"}))).unwrap();
        // No sweep ran: serialization shows the raw store.
        assert_eq!(entity.to_json(), serde_json::json!({"age": "41"}));
        assert!(!entity.formatted());
    }
}
