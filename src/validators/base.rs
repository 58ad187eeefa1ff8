//! Validator base: common options, defaults, and the validate dispatch
//!
//! Every validator carries the same cross-cutting options (`allow_null`, a
//! default value or factory, instance message overrides) next to its
//! kind-specific rules. Validators are immutable once constructed; the
//! builder methods consume and return by value.
//!
//! Construction order is recorded by a process-wide monotonic counter. The
//! counter recovers declaration order when a schema assembles its property
//! list; it is never used for identity.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::array::ArrayRules;
use super::errors::{ValidationError, ValidationResult};
use super::messages;
use super::numeric::NumericRules;
use super::object::ObjectRules;
use super::string::StringRules;
use crate::schema::Schema;
use crate::value::Value;

static CREATION_COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) fn next_position() -> u64 {
    CREATION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Default resolution for an omitted field.
#[derive(Clone)]
pub enum FieldDefault {
    /// No default; the field is required.
    None,
    /// A static value, cloned on materialization.
    Value(Value),
    /// A zero-argument factory, invoked on each materialization.
    Factory(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::None => write!(f, "None"),
            FieldDefault::Value(v) => write!(f, "Value({:?})", v),
            FieldDefault::Factory(_) => write!(f, "Factory(..)"),
        }
    }
}

/// Shared options attached in one place, typically to a whole union.
#[derive(Clone, Default)]
pub struct Options {
    pub allow_null: bool,
    pub default: Option<Value>,
    pub default_factory: Option<Arc<dyn Fn() -> Value + Send + Sync>>,
}

#[derive(Debug, Clone)]
pub(crate) enum Kind {
    Any,
    String(StringRules),
    Integer(NumericRules),
    Number(NumericRules),
    Boolean,
    Object(ObjectRules),
    Array(ArrayRules),
    Union(Vec<Validator>),
    Proxy(Arc<Schema>),
    Ref(String),
}

impl Kind {
    /// Message-table name for this kind.
    pub(crate) fn table(&self) -> &'static str {
        match self {
            Kind::Any => messages::VALIDATOR,
            Kind::String(_) => messages::STRING,
            Kind::Integer(_) | Kind::Number(_) => messages::NUMERIC,
            Kind::Boolean => messages::BOOLEAN,
            Kind::Object(_) => messages::OBJECT,
            Kind::Array(_) => messages::ARRAY,
            Kind::Union(_) => messages::UNION,
            Kind::Proxy(_) | Kind::Ref(_) => messages::PROXY,
        }
    }

    /// Short label used when a union names its alternatives.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Kind::Any => "Any",
            Kind::String(_) => "String",
            Kind::Integer(_) => "Integer",
            Kind::Number(_) => "Number",
            Kind::Boolean => "Boolean",
            Kind::Object(_) => "Object",
            Kind::Array(_) => "Array",
            Kind::Union(_) => "Union",
            Kind::Proxy(_) => "Proxy",
            Kind::Ref(_) => "Ref",
        }
    }
}

/// A rule object encoding legality, coercion, and default behavior for one
/// field.
#[derive(Debug, Clone)]
pub struct Validator {
    pub(crate) kind: Kind,
    pub(crate) allow_null: bool,
    pub(crate) default: FieldDefault,
    pub(crate) overrides: Option<HashMap<String, String>>,
    pub(crate) position: u64,
}

impl Validator {
    pub(crate) fn from_kind(kind: Kind) -> Self {
        Self {
            kind,
            allow_null: false,
            default: FieldDefault::None,
            overrides: None,
            position: next_position(),
        }
    }

    /// Permits `null` as a valid value.
    ///
    /// A nullable field without an explicit default defaults to null, so
    /// omitting it is never a `required` error.
    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        if matches!(self.default, FieldDefault::None) {
            self.default = FieldDefault::Value(Value::Null);
        }
        self
    }

    /// Sets a static default for the field.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    /// Sets a zero-argument factory default, invoked per materialization.
    pub fn default_factory(mut self, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = FieldDefault::Factory(Arc::new(factory));
        self
    }

    /// Overrides message templates for this validator instance only.
    pub fn with_messages(mut self, entries: &[(&str, &str)]) -> Self {
        let map = entries
            .iter()
            .map(|(code, template)| (code.to_string(), template.to_string()))
            .collect();
        self.overrides = Some(map);
        self
    }

    /// Attaches shared options in one place. Lets `allow_null` or a default
    /// be declared once for a whole union instead of per alternative.
    pub fn with_options(mut self, options: Options) -> Self {
        if let Some(value) = options.default {
            self.default = FieldDefault::Value(value);
        }
        if let Some(factory) = options.default_factory {
            self.default = FieldDefault::Factory(factory);
        }
        if options.allow_null {
            self = self.allow_null();
        }
        self
    }

    /// Whether an omitted field backed by this validator has a default.
    pub fn has_default(&self) -> bool {
        !matches!(self.default, FieldDefault::None)
    }

    /// Materializes the default, invoking the factory when present.
    pub fn get_default(&self) -> Option<Value> {
        match &self.default {
            FieldDefault::None => None,
            FieldDefault::Value(v) => Some(v.clone()),
            FieldDefault::Factory(f) => Some(f()),
        }
    }

    /// Declaration-order position assigned at construction.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The format-registry name declared on a string validator, if any.
    pub fn format_name(&self) -> Option<&str> {
        match &self.kind {
            Kind::String(rules) => rules.format.as_deref(),
            _ => None,
        }
    }

    /// Validates a value, returning the validated (possibly coerced) form.
    ///
    /// The coercion flag propagates top-down through every nested
    /// validator: object properties, array items, union alternatives, and
    /// proxy/ref targets all see the caller's flag.
    pub fn validate(&self, value: &Value, allow_coerce: bool) -> ValidationResult<Value> {
        if value.is_null() {
            if self.allow_null {
                return Ok(Value::Null);
            }
            return Err(self.error("null", &[]));
        }

        match &self.kind {
            Kind::Any => Ok(value.clone()),
            Kind::String(rules) => rules.validate(self, value),
            Kind::Integer(rules) => rules.validate_integer(self, value, allow_coerce),
            Kind::Number(rules) => rules.validate_number(self, value, allow_coerce),
            Kind::Boolean => super::boolean::validate(self, value, allow_coerce),
            Kind::Object(rules) => rules.validate(self, value, allow_coerce),
            Kind::Array(rules) => rules.validate(self, value, allow_coerce),
            Kind::Union(alternatives) => {
                super::union::validate(self, alternatives, value, allow_coerce)
            }
            Kind::Proxy(schema) => schema.object_validator().validate(value, allow_coerce),
            Kind::Ref(name) => match crate::schema::registry::get(name) {
                Some(schema) => schema.object_validator().validate(value, allow_coerce),
                None => Err(ValidationError::single(
                    "type",
                    format!("Unknown schema reference \"{}\".", name),
                )),
            },
        }
    }

    /// Builds a leaf error from this validator's message tables.
    ///
    /// Resolution order: instance override, then the project catalog, then
    /// the built-in table for this kind.
    pub(crate) fn error(&self, code: &'static str, params: &[(&str, String)]) -> ValidationError {
        let template = self
            .overrides
            .as_ref()
            .and_then(|map| map.get(code).cloned())
            .unwrap_or_else(|| messages::template(self.kind.table(), code));
        ValidationError::single(code, messages::render(&template, params))
    }
}

/// A validator accepting any non-null JSON value as-is.
pub fn any() -> Validator {
    Validator::from_kind(Kind::Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_counter_is_monotonic() {
        let a = any();
        let b = any();
        let c = any();
        assert!(a.position() < b.position());
        assert!(b.position() < c.position());
    }

    #[test]
    fn test_any_accepts_values() {
        let v = any();
        assert_eq!(v.validate(&Value::Integer(3), false).unwrap(), Value::Integer(3));
        assert_eq!(
            v.validate(&Value::String("x".into()), false).unwrap(),
            Value::String("x".into())
        );
    }

    #[test]
    fn test_null_rejected_without_allow_null() {
        let err = any().validate(&Value::Null, false).unwrap_err();
        assert_eq!(err.code(), Some("null"));
    }

    #[test]
    fn test_null_allowed_with_allow_null() {
        let v = any().allow_null();
        assert_eq!(v.validate(&Value::Null, false).unwrap(), Value::Null);
    }

    #[test]
    fn test_default_value_and_factory() {
        let v = any().default_value(3i64);
        assert!(v.has_default());
        assert_eq!(v.get_default(), Some(Value::Integer(3)));

        let v = any().default_factory(|| Value::Array(vec![]));
        assert_eq!(v.get_default(), Some(Value::Array(vec![])));

        assert!(!any().has_default());
        assert_eq!(any().get_default(), None);
    }

    #[test]
    fn test_instance_message_override() {
        let v = any().with_messages(&[("null", "required value")]);
        let err = v.validate(&Value::Null, false).unwrap_err();
        assert_eq!(err.to_string(), "required value");
    }
}
