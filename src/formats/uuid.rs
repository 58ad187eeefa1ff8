//! UUID format handler

use uuid::Uuid;

use super::FormatHandler;
use crate::value::Value;

/// `UUID`: hyphenated UUID string, native form `Value::Uuid`.
pub struct UuidFormat;

impl FormatHandler for UuidFormat {
    fn name(&self) -> &str {
        "UUID"
    }

    fn is_native(&self, value: &Value) -> bool {
        matches!(value, Value::Uuid(_))
    }

    fn parse(&self, raw: &str) -> Option<Value> {
        Uuid::parse_str(raw).ok().map(Value::Uuid)
    }

    fn to_string(&self, value: &Value) -> Option<String> {
        value.native_string().or_else(|| value.as_str().map(String::from))
    }
}
