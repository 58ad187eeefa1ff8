//! Array validator
//!
//! `items` is either one validator applied to every element or a fixed
//! positional shape. Element errors keep their index, so a failure in the
//! third element reads back as entry `2` of the error detail.

use indexmap::IndexMap;

use super::base::{Kind, Validator};
use super::errors::{ErrorDetail, ErrorKey, ValidationError, ValidationResult};
use crate::value::Value;

/// Element schema for an array field.
#[derive(Debug, Clone)]
pub enum Items {
    /// Elements may be any value.
    Any,
    /// One validator for every element.
    One(Box<Validator>),
    /// A fixed positional shape; element `i` validates against entry `i`.
    Tuple(Vec<Validator>),
}

/// Policy for elements beyond a fixed positional shape.
#[derive(Debug, Clone)]
pub enum AdditionalItems {
    /// Pass extra elements through untouched.
    Allow,
    /// Reject extra elements with an `additional_items` error.
    Reject,
    /// Validate extra elements with the given validator.
    Typed(Box<Validator>),
}

/// Rules for an array field.
#[derive(Debug, Clone)]
pub struct ArrayRules {
    pub items: Items,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub additional_items: AdditionalItems,
    /// Rejects value-equal duplicates, erroring at the duplicate's index.
    pub unique_items: bool,
}

impl Default for ArrayRules {
    fn default() -> Self {
        Self {
            items: Items::Any,
            min_items: None,
            max_items: None,
            additional_items: AdditionalItems::Allow,
            unique_items: false,
        }
    }
}

impl ArrayRules {
    pub(crate) fn validate(
        &self,
        ctx: &Validator,
        value: &Value,
        allow_coerce: bool,
    ) -> ValidationResult<Value> {
        let input = match value.as_array() {
            Some(items) => items,
            None => return Err(ctx.error("type", &[])),
        };

        if let (Some(min), Some(max)) = (self.min_items, self.max_items) {
            if min == max && input.len() != min {
                return Err(ctx.error("exact_items", &[("min_items", min.to_string())]));
            }
        }
        if let Some(min) = self.min_items {
            if input.len() < min {
                if input.is_empty() {
                    return Err(ctx.error("empty", &[]));
                }
                return Err(ctx.error("min_items", &[("min_items", min.to_string())]));
            }
        }
        if let Some(max) = self.max_items {
            if input.len() > max {
                return Err(ctx.error("max_items", &[("max_items", max.to_string())]));
            }
        }

        let mut validated: Vec<Value> = Vec::with_capacity(input.len());
        let mut failures: IndexMap<ErrorKey, ErrorDetail> = IndexMap::new();

        for (i, element) in input.iter().enumerate() {
            let child = match &self.items {
                Items::Any => None,
                Items::One(v) => Some(v.as_ref()),
                Items::Tuple(shape) => match shape.get(i) {
                    Some(v) => Some(v),
                    None => match &self.additional_items {
                        AdditionalItems::Allow => None,
                        AdditionalItems::Typed(extra) => Some(extra.as_ref()),
                        AdditionalItems::Reject => {
                            let err = ctx.error("additional_items", &[]);
                            failures.insert(ErrorKey::Index(i), err.into_detail());
                            continue;
                        }
                    },
                },
            };

            let outcome = match child {
                Some(v) => v.validate(element, allow_coerce),
                None => Ok(element.clone()),
            };
            match outcome {
                Ok(valid) => {
                    if self.unique_items && validated.contains(&valid) {
                        let err = ctx.error("unique_items", &[]);
                        failures.insert(ErrorKey::Index(i), err.into_detail());
                        continue;
                    }
                    validated.push(valid);
                }
                Err(err) => {
                    failures.insert(ErrorKey::Index(i), err.into_detail());
                }
            }
        }

        if !failures.is_empty() {
            return Err(ValidationError::grouped(failures));
        }
        Ok(Value::Array(validated))
    }
}

/// A homogeneous array: every element validates against `items`.
pub fn array(items: Validator) -> Validator {
    array_with(ArrayRules {
        items: Items::One(Box::new(items)),
        ..Default::default()
    })
}

/// A fixed-shape array: element `i` validates against `shape[i]`.
pub fn tuple(shape: Vec<Validator>) -> Validator {
    array_with(ArrayRules {
        items: Items::Tuple(shape),
        ..Default::default()
    })
}

/// An array field with full control over the rules.
pub fn array_with(rules: ArrayRules) -> Validator {
    Validator::from_kind(Kind::Array(rules))
}
