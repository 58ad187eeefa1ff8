//! String validator
//!
//! Pattern matching is full-match against the raw string and runs before
//! any format conversion. A declared format delegates string⇄native
//! conversion to the format registry: native input passes through untouched
//! and string input is parsed into its native form, so a formatted store
//! never holds the string twice.

use std::fmt;

use regex::Regex;

use super::base::{Kind, Validator};
use super::errors::{ConfigResult, ConfigurationError, ValidationResult};
use crate::formats;
use crate::value::Value;

/// A compiled full-match pattern.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` with full-match semantics. A malformed expression
    /// is a configuration error, surfaced at construction.
    pub fn new(source: &str) -> ConfigResult<Self> {
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
            ConfigurationError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as declared, without the full-match wrapping.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern(/{}/)", self.source)
    }
}

/// Shorthand for [`Pattern::new`].
pub fn pattern(source: &str) -> ConfigResult<Pattern> {
    Pattern::new(source)
}

/// Rules for a string field.
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    /// Minimum length in characters. Zero means "may be empty".
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Full-match pattern, applied to the raw string before any coercion.
    pub pattern: Option<Pattern>,
    /// Permitted values. A single entry reports `exact` instead of `enum`.
    pub choices: Option<Vec<String>>,
    /// Format-registry name for string⇄native conversion.
    pub format: Option<String>,
}

impl StringRules {
    pub(crate) fn validate(&self, ctx: &Validator, value: &Value) -> ValidationResult<Value> {
        // A value already in native form passes straight through; it was
        // parsed on a previous pass.
        if let Some(name) = &self.format {
            if let Some(handler) = formats::get(name) {
                if handler.is_native(value) {
                    return Ok(value.clone());
                }
            }
        }

        let raw = match value.as_str() {
            Some(s) => s,
            None => return Err(ctx.error("type", &[])),
        };

        if let Some(choices) = &self.choices {
            if !choices.iter().any(|choice| choice == raw) {
                if choices.len() == 1 {
                    return Err(ctx.error("exact", &[("exact", choices[0].clone())]));
                }
                return Err(ctx.error("enum", &[("enum", format!("{:?}", choices))]));
            }
        }

        if let Some(min) = self.min_length {
            let len = raw.chars().count();
            if len < min {
                if raw.is_empty() {
                    return Err(ctx.error("blank", &[]));
                }
                return Err(ctx.error("min_length", &[("min_length", min.to_string())]));
            }
        }

        if let Some(max) = self.max_length {
            if raw.chars().count() > max {
                return Err(ctx.error("max_length", &[("max_length", max.to_string())]));
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.matches(raw) {
                return Err(ctx.error("pattern", &[("pattern", pattern.source().to_string())]));
            }
        }

        if let Some(name) = &self.format {
            if let Some(handler) = formats::get(name) {
                return handler
                    .parse(raw)
                    .ok_or_else(|| ctx.error("format", &[("format", name.clone())]));
            }
        }

        Ok(Value::String(raw.to_string()))
    }
}

/// A string field with the given rules.
pub fn string(rules: StringRules) -> Validator {
    Validator::from_kind(Kind::String(rules))
}

/// An ISO-8601 date field (`YYYY-MM-DD`), stored natively.
pub fn date() -> Validator {
    string(StringRules {
        format: Some("date".to_string()),
        ..Default::default()
    })
}

/// A time field (`HH:MM[:SS[.ffffff]]`), stored natively.
pub fn time() -> Validator {
    string(StringRules {
        format: Some("time".to_string()),
        ..Default::default()
    })
}

/// A datetime field with optional UTC offset, stored natively.
pub fn datetime() -> Validator {
    string(StringRules {
        format: Some("datetime".to_string()),
        ..Default::default()
    })
}

/// A datetime field parsed with the configured strftime pattern.
pub fn format_datetime() -> Validator {
    string(StringRules {
        format: Some("format_datetime".to_string()),
        ..Default::default()
    })
}

/// A UUID field, stored natively.
pub fn uuid() -> Validator {
    string(StringRules {
        format: Some("UUID".to_string()),
        ..Default::default()
    })
}
