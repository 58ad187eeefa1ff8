//! Union validator
//!
//! Alternatives are tried strictly in declared order and the first success
//! wins; there is no cross-alternative backtracking of partial coercions.
//! Failure raises one `union` error naming every alternative's type.

use super::base::{Kind, Validator};
use super::errors::ValidationResult;
use crate::value::Value;

pub(crate) fn validate(
    ctx: &Validator,
    alternatives: &[Validator],
    value: &Value,
    allow_coerce: bool,
) -> ValidationResult<Value> {
    for alternative in alternatives {
        if let Ok(valid) = alternative.validate(value, allow_coerce) {
            return Ok(valid);
        }
    }

    let labels: Vec<&str> = alternatives.iter().map(|a| a.kind.label()).collect();
    Err(ctx.error("union", &[("items", format!("[{}]", labels.join(", ")))]))
}

/// An ordered choice between alternatives; first success wins.
///
/// Shared options belong on the union itself via
/// [`with_options`](Validator::with_options), not on each alternative.
pub fn union(alternatives: Vec<Validator>) -> Validator {
    Validator::from_kind(Kind::Union(alternatives))
}
