//! Proxy and Ref validators
//!
//! Both embed another entity's schema as a field. Proxy holds the schema
//! directly; Ref holds only a name, resolved against the global schema
//! registry the first time it is dereferenced. Lazy resolution is what
//! makes self-referential and mutually recursive schemas constructible
//! without infinite recursion.

use std::sync::Arc;

use indexmap::IndexMap;

use super::base::{Kind, Validator};
use crate::schema::Schema;
use crate::value::Value;

/// Embeds a nested schema by direct reference.
///
/// Structural validation is entirely the wrapped schema's; the proxy level
/// contributes only `allow_null` and default semantics. A schema built
/// `with_empty_default` embeds with a materialized empty object default.
pub fn proxy(schema: &Arc<Schema>) -> Validator {
    let validator = Validator::from_kind(Kind::Proxy(schema.clone()));
    if schema.has_empty_default() {
        validator.default_value(Value::Object(IndexMap::new()))
    } else {
        validator
    }
}

/// Embeds a nested schema by registry name, resolved on first use.
pub fn reference(name: impl Into<String>) -> Validator {
    Validator::from_kind(Kind::Ref(name.into()))
}
