//! Integer and Number validators
//!
//! Both kinds share one rules struct. Integer rejects non-whole values;
//! with coercion enabled, numeric strings and booleans convert. The
//! multiple-of check uses a tolerant remainder so float steps like 1.5
//! behave as declared.

use super::base::{Kind, Validator};
use super::errors::{ValidationError, ValidationResult};
use crate::value::Value;

const MULTIPLE_TOLERANCE: f64 = 1e-9;

/// Rules shared by integer and number fields.
#[derive(Debug, Clone, Default)]
pub struct NumericRules {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Makes `minimum` an open bound.
    pub exclusive_minimum: bool,
    /// Makes `maximum` an open bound.
    pub exclusive_maximum: bool,
    pub multiple_of: Option<f64>,
    /// Permitted values. A single entry reports `exact` instead of `enum`.
    pub choices: Option<Vec<f64>>,
}

impl NumericRules {
    pub(crate) fn validate_integer(
        &self,
        ctx: &Validator,
        value: &Value,
        allow_coerce: bool,
    ) -> ValidationResult<Value> {
        let candidate = match value {
            Value::Integer(i) => *i,
            Value::Bool(b) => {
                if !allow_coerce {
                    return Err(ctx.error("type", &[]));
                }
                *b as i64
            }
            Value::Number(f) => {
                if !f.is_finite() {
                    return Err(ctx.error("finite", &[]));
                }
                if f.fract() != 0.0 {
                    return Err(ctx.error("integer", &[]));
                }
                *f as i64
            }
            Value::String(s) => {
                if !allow_coerce {
                    return Err(ctx.error("type", &[]));
                }
                match s.parse::<i64>() {
                    Ok(i) => i,
                    Err(_) => match s.parse::<f64>() {
                        Ok(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
                        Ok(_) => return Err(ctx.error("integer", &[])),
                        Err(_) => return Err(ctx.error("type", &[])),
                    },
                }
            }
            _ => return Err(ctx.error("type", &[])),
        };

        self.check(ctx, candidate as f64)?;
        Ok(Value::Integer(candidate))
    }

    pub(crate) fn validate_number(
        &self,
        ctx: &Validator,
        value: &Value,
        allow_coerce: bool,
    ) -> ValidationResult<Value> {
        let candidate = match value {
            Value::Integer(i) => *i as f64,
            Value::Number(f) => *f,
            Value::Bool(b) => {
                if !allow_coerce {
                    return Err(ctx.error("type", &[]));
                }
                *b as i64 as f64
            }
            Value::String(s) => {
                if !allow_coerce {
                    return Err(ctx.error("type", &[]));
                }
                match s.parse::<f64>() {
                    Ok(f) => f,
                    Err(_) => return Err(ctx.error("type", &[])),
                }
            }
            _ => return Err(ctx.error("type", &[])),
        };

        if !candidate.is_finite() {
            return Err(ctx.error("finite", &[]));
        }
        self.check(ctx, candidate)?;
        Ok(Value::Number(candidate))
    }

    fn check(&self, ctx: &Validator, value: f64) -> Result<(), ValidationError> {
        if let Some(choices) = &self.choices {
            if !choices.iter().any(|choice| *choice == value) {
                if choices.len() == 1 {
                    return Err(ctx.error("exact", &[("exact", display(choices[0]))]));
                }
                let listed: Vec<String> = choices.iter().map(|c| display(*c)).collect();
                return Err(ctx.error("enum", &[("enum", format!("[{}]", listed.join(", ")))]));
            }
        }

        if let Some(minimum) = self.minimum {
            if self.exclusive_minimum {
                if value <= minimum {
                    return Err(ctx.error("exclusive_minimum", &[("minimum", display(minimum))]));
                }
            } else if value < minimum {
                return Err(ctx.error("minimum", &[("minimum", display(minimum))]));
            }
        }

        if let Some(maximum) = self.maximum {
            if self.exclusive_maximum {
                if value >= maximum {
                    return Err(ctx.error("exclusive_maximum", &[("maximum", display(maximum))]));
                }
            } else if value > maximum {
                return Err(ctx.error("maximum", &[("maximum", display(maximum))]));
            }
        }

        if let Some(step) = self.multiple_of {
            let ratio = value / step;
            if (ratio - ratio.round()).abs() > MULTIPLE_TOLERANCE {
                return Err(ctx.error("multiple_of", &[("multiple_of", display(step))]));
            }
        }

        Ok(())
    }
}

/// Renders a constraint value without a trailing `.0` for whole numbers.
fn display(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// An integer field with the given rules.
pub fn integer(rules: NumericRules) -> Validator {
    Validator::from_kind(Kind::Integer(rules))
}

/// A floating-point field with the given rules.
pub fn number(rules: NumericRules) -> Validator {
    Validator::from_kind(Kind::Number(rules))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(rules: NumericRules) -> Validator {
        integer(rules)
    }

    #[test]
    fn test_minimum() {
        let v = bounded(NumericRules {
            minimum: Some(10.0),
            ..Default::default()
        });
        assert!(v.validate(&Value::Integer(11), false).is_ok());
        assert!(v.validate(&Value::Integer(10), false).is_ok());
        let err = v.validate(&Value::Integer(9), false).unwrap_err();
        assert_eq!(err.code(), Some("minimum"));
    }

    #[test]
    fn test_exclusive_minimum() {
        let v = bounded(NumericRules {
            minimum: Some(10.0),
            exclusive_minimum: true,
            ..Default::default()
        });
        assert!(v.validate(&Value::Integer(11), false).is_ok());
        let err = v.validate(&Value::Integer(10), false).unwrap_err();
        assert_eq!(err.code(), Some("exclusive_minimum"));
        assert_eq!(err.to_string(), "Must be greater than 10.");
    }

    #[test]
    fn test_maximum_and_exclusive_maximum() {
        let v = bounded(NumericRules {
            maximum: Some(3.0),
            ..Default::default()
        });
        assert!(v.validate(&Value::Integer(2), false).is_ok());
        assert_eq!(
            v.validate(&Value::Integer(4), false).unwrap_err().code(),
            Some("maximum")
        );

        let v = bounded(NumericRules {
            maximum: Some(3.0),
            exclusive_maximum: true,
            ..Default::default()
        });
        assert_eq!(
            v.validate(&Value::Integer(3), false).unwrap_err().code(),
            Some("exclusive_maximum")
        );
    }

    #[test]
    fn test_integer_rejects_fractions() {
        let v = integer(NumericRules::default());
        let err = v.validate(&Value::Number(1.1), false).unwrap_err();
        assert_eq!(err.code(), Some("integer"));
        // Whole floats narrow cleanly.
        assert_eq!(v.validate(&Value::Number(3.0), false).unwrap(), Value::Integer(3));
    }

    #[test]
    fn test_number_requires_finite() {
        let v = number(NumericRules::default());
        let err = v.validate(&Value::Number(f64::INFINITY), false).unwrap_err();
        assert_eq!(err.code(), Some("finite"));
    }

    #[test]
    fn test_multiple_of_integer_step() {
        let v = integer(NumericRules {
            multiple_of: Some(3.0),
            ..Default::default()
        });
        assert!(v.validate(&Value::Integer(6), false).is_ok());
        let err = v.validate(&Value::Integer(4), false).unwrap_err();
        assert_eq!(err.code(), Some("multiple_of"));
    }

    #[test]
    fn test_multiple_of_float_step() {
        let v = integer(NumericRules {
            multiple_of: Some(1.5),
            ..Default::default()
        });
        assert!(v.validate(&Value::Integer(6), false).is_ok());
        assert_eq!(
            v.validate(&Value::Integer(4), false).unwrap_err().code(),
            Some("multiple_of")
        );
    }

    #[test]
    fn test_enum_and_exact() {
        let v = integer(NumericRules {
            choices: Some(vec![1.0, 2.0]),
            ..Default::default()
        });
        assert!(v.validate(&Value::Integer(1), false).is_ok());
        assert_eq!(
            v.validate(&Value::Integer(3), false).unwrap_err().code(),
            Some("enum")
        );

        let v = integer(NumericRules {
            choices: Some(vec![1.0]),
            ..Default::default()
        });
        assert_eq!(
            v.validate(&Value::Integer(2), false).unwrap_err().code(),
            Some("exact")
        );
    }

    #[test]
    fn test_coercion_from_string_and_bool() {
        let v = integer(NumericRules::default());
        assert_eq!(
            v.validate(&Value::from("123"), true).unwrap(),
            Value::Integer(123)
        );
        assert_eq!(v.validate(&Value::Bool(true), true).unwrap(), Value::Integer(1));

        // Without the flag both stay type errors.
        assert_eq!(v.validate(&Value::from("123"), false).unwrap_err().code(), Some("type"));
        assert_eq!(v.validate(&Value::Bool(true), false).unwrap_err().code(), Some("type"));
    }

    #[test]
    fn test_number_accepts_integers() {
        let v = number(NumericRules::default());
        assert_eq!(v.validate(&Value::Integer(100), false).unwrap(), Value::Number(100.0));
        assert_eq!(v.validate(&Value::Number(99.5), false).unwrap(), Value::Number(99.5));
    }
}
