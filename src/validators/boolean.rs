//! Boolean validator
//!
//! Coercion accepts the usual form-encoded spellings: `"1"`, `"true"`,
//! `"on"` for true; `"0"`, `"false"`, `"off"`, `""` for false; `"none"`
//! and `"null"` map to null when the field allows it. Anything else is a
//! type error. Without the coercion flag only real booleans pass.

use super::base::{Kind, Validator};
use super::errors::ValidationResult;
use crate::value::Value;

pub(crate) fn validate(
    ctx: &Validator,
    value: &Value,
    allow_coerce: bool,
) -> ValidationResult<Value> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Integer(i) if allow_coerce => Ok(Value::Bool(*i != 0)),
        Value::String(s) if allow_coerce => match s.to_lowercase().as_str() {
            "1" | "true" | "on" => Ok(Value::Bool(true)),
            "0" | "false" | "off" | "" => Ok(Value::Bool(false)),
            "none" | "null" if ctx.allow_null => Ok(Value::Null),
            _ => Err(ctx.error("type", &[])),
        },
        _ => Err(ctx.error("type", &[])),
    }
}

/// A boolean field.
pub fn boolean() -> Validator {
    Validator::from_kind(Kind::Boolean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_booleans() {
        let v = boolean();
        assert_eq!(v.validate(&Value::Bool(true), false).unwrap(), Value::Bool(true));
        assert_eq!(v.validate(&Value::Bool(false), false).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_strict_mode_rejects_everything_else() {
        let v = boolean();
        assert_eq!(v.validate(&Value::Integer(1), false).unwrap_err().code(), Some("type"));
        assert_eq!(v.validate(&Value::from("true"), false).unwrap_err().code(), Some("type"));
    }

    #[test]
    fn test_string_coercion_table() {
        let v = boolean();
        for raw in ["1", "true", "on", "True", "ON"] {
            assert_eq!(v.validate(&Value::from(raw), true).unwrap(), Value::Bool(true));
        }
        for raw in ["0", "false", "off", ""] {
            assert_eq!(v.validate(&Value::from(raw), true).unwrap(), Value::Bool(false));
        }
    }

    #[test]
    fn test_integer_coercion() {
        let v = boolean();
        assert_eq!(v.validate(&Value::Integer(1), true).unwrap(), Value::Bool(true));
        assert_eq!(v.validate(&Value::Integer(0), true).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_null_spellings_require_allow_null() {
        let strict = boolean();
        assert_eq!(strict.validate(&Value::from("none"), true).unwrap_err().code(), Some("type"));

        let nullable = boolean().allow_null();
        assert_eq!(nullable.validate(&Value::from("none"), true).unwrap(), Value::Null);
        assert_eq!(nullable.validate(&Value::from("null"), true).unwrap(), Value::Null);
    }

    #[test]
    fn test_unknown_spelling_fails() {
        let v = boolean().allow_null();
        let err = v.validate(&Value::from("nul"), true).unwrap_err();
        assert_eq!(err.code(), Some("type"));
    }
}
