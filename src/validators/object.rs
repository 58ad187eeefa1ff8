//! Object validator
//!
//! Validates a whole entity: declared properties run in declaration order,
//! missing required fields are collected rather than failing fast, and the
//! additional-properties policy decides what happens to unknown keys. One
//! error is raised per validate call, carrying a per-field detail map.

use indexmap::IndexMap;

use super::base::{Kind, Validator};
use super::errors::{ErrorDetail, ErrorKey, ValidationError, ValidationResult};
use crate::value::Value;

/// Policy for keys not present in the declared property set.
#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    /// Silently drop unknown keys. The policy entity schemas use.
    Drop,
    /// Reject unknown keys with an `invalid_property` error.
    Reject,
    /// Pass unknown keys through untouched.
    Allow,
    /// Validate each unknown key's value with the given validator.
    Typed(Box<Validator>),
}

#[derive(Debug, Clone)]
pub(crate) struct ObjectRules {
    pub def_name: String,
    pub properties: IndexMap<String, Validator>,
    /// Property names without defaults, in declaration order.
    pub required: Vec<String>,
    pub additional: AdditionalProperties,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
}

impl ObjectRules {
    pub(crate) fn validate(
        &self,
        ctx: &Validator,
        value: &Value,
        allow_coerce: bool,
    ) -> ValidationResult<Value> {
        let input = match value.as_object() {
            Some(map) => map,
            None => return Err(ctx.error("type", &[])),
        };

        if let Some(min) = self.min_properties {
            if input.len() < min {
                if input.is_empty() {
                    return Err(ctx.error("empty", &[]));
                }
                return Err(ctx.error("min_properties", &[("min_properties", min.to_string())]));
            }
        }
        if let Some(max) = self.max_properties {
            if input.len() > max {
                return Err(ctx.error("max_properties", &[("max_properties", max.to_string())]));
            }
        }

        let mut validated: IndexMap<String, Value> = IndexMap::new();
        let mut failures: IndexMap<ErrorKey, ErrorDetail> = IndexMap::new();

        for (name, child) in &self.properties {
            match input.get(name) {
                Some(raw) => match child.validate(raw, allow_coerce) {
                    Ok(valid) => {
                        validated.insert(name.clone(), valid);
                    }
                    Err(err) => {
                        failures.insert(ErrorKey::Field(name.clone()), err.into_detail());
                    }
                },
                None => {
                    if let Some(default) = child.get_default() {
                        validated.insert(name.clone(), default);
                    } else if self.required.iter().any(|r| r == name) {
                        let err = ctx.error("required", &[("field_name", name.clone())]);
                        failures.insert(ErrorKey::Field(name.clone()), err.into_detail());
                    }
                }
            }
        }

        for (name, raw) in input {
            if self.properties.contains_key(name) {
                continue;
            }
            match &self.additional {
                AdditionalProperties::Drop => {}
                AdditionalProperties::Allow => {
                    validated.insert(name.clone(), raw.clone());
                }
                AdditionalProperties::Reject => {
                    let err = ctx.error("invalid_property", &[]);
                    failures.insert(ErrorKey::Field(name.clone()), err.into_detail());
                }
                AdditionalProperties::Typed(extra) => match extra.validate(raw, allow_coerce) {
                    Ok(valid) => {
                        validated.insert(name.clone(), valid);
                    }
                    Err(err) => {
                        failures.insert(ErrorKey::Field(name.clone()), err.into_detail());
                    }
                },
            }
        }

        if !failures.is_empty() {
            return Err(ValidationError::grouped(failures));
        }
        Ok(Value::Object(validated))
    }
}

/// An object field with explicit rules. Entity schemas build theirs
/// through the schema builder; this exists for free-standing use.
pub(crate) fn object(rules: ObjectRules) -> Validator {
    Validator::from_kind(Kind::Object(rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::numeric::{integer, NumericRules};
    use crate::validators::string::{string, StringRules};

    fn sample() -> Validator {
        let mut properties = IndexMap::new();
        properties.insert("name".to_string(), string(StringRules::default()));
        properties.insert("age".to_string(), integer(NumericRules::default()));
        object(ObjectRules {
            def_name: "Example".to_string(),
            required: properties.keys().cloned().collect(),
            properties,
            additional: AdditionalProperties::Drop,
            min_properties: None,
            max_properties: None,
        })
    }

    fn input(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_valid_object() {
        let result = sample()
            .validate(&input(serde_json::json!({"name": "a", "age": 3})), false)
            .unwrap();
        let map = result.as_object().unwrap();
        assert_eq!(map.get("name"), Some(&Value::String("a".to_string())));
        assert_eq!(map.get("age"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_missing_required_fields_are_collected() {
        let err = sample().validate(&input(serde_json::json!({})), false).unwrap_err();
        assert_eq!(err.field("name").and_then(ErrorDetail::code), Some("required"));
        assert_eq!(err.field("age").and_then(ErrorDetail::code), Some("required"));
    }

    #[test]
    fn test_field_errors_keep_their_key() {
        let err = sample()
            .validate(&input(serde_json::json!({"name": 7, "age": 3})), false)
            .unwrap_err();
        assert_eq!(err.field("name").and_then(ErrorDetail::code), Some("type"));
        assert!(err.field("age").is_none());
    }

    #[test]
    fn test_unknown_keys_dropped_by_default_policy() {
        let result = sample()
            .validate(
                &input(serde_json::json!({"name": "a", "age": 3, "extra": true})),
                false,
            )
            .unwrap();
        assert!(result.as_object().unwrap().get("extra").is_none());
    }

    #[test]
    fn test_unknown_keys_rejected_when_policy_says_so() {
        let mut properties = IndexMap::new();
        properties.insert("name".to_string(), string(StringRules::default()));
        let v = object(ObjectRules {
            def_name: "Strict".to_string(),
            required: vec!["name".to_string()],
            properties,
            additional: AdditionalProperties::Reject,
            min_properties: None,
            max_properties: None,
        });

        let err = v
            .validate(&input(serde_json::json!({"name": "a", "extra": 1})), false)
            .unwrap_err();
        assert_eq!(err.field("extra").and_then(ErrorDetail::code), Some("invalid_property"));
    }

    #[test]
    fn test_defaults_fill_omitted_fields() {
        let mut properties = IndexMap::new();
        properties.insert(
            "name".to_string(),
            string(StringRules::default()).default_value("anonymous"),
        );
        let v = object(ObjectRules {
            def_name: "Defaulted".to_string(),
            required: vec![],
            properties,
            additional: AdditionalProperties::Drop,
            min_properties: None,
            max_properties: None,
        });

        let result = v.validate(&input(serde_json::json!({})), false).unwrap();
        assert_eq!(
            result.as_object().unwrap().get("name"),
            Some(&Value::String("anonymous".to_string()))
        );
    }

    #[test]
    fn test_non_object_input() {
        let err = sample().validate(&Value::Integer(3), false).unwrap_err();
        assert_eq!(err.code(), Some("type"));
    }

    #[test]
    fn test_coercion_propagates_to_properties() {
        let result = sample()
            .validate(&input(serde_json::json!({"name": "a", "age": "41"})), true)
            .unwrap();
        assert_eq!(result.as_object().unwrap().get("age"), Some(&Value::Integer(41)));
    }
}
