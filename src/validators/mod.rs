//! Field validators
//!
//! A validator encodes legality, coercion, and default behavior for one
//! field. Primitive kinds (string, integer, number, boolean) compose into
//! objects, arrays, unions, and schema references; the schema builder
//! assembles an Object validator for a whole entity.
//!
//! Validators are immutable values. Constructor functions assign a
//! process-wide declaration position; option methods (`allow_null`,
//! defaults, message overrides) consume and return the validator.

mod array;
mod base;
mod boolean;
pub mod errors;
pub mod messages;
mod numeric;
mod object;
mod proxy;
mod string;
mod union;

pub use array::{array, array_with, tuple, AdditionalItems, ArrayRules, Items};
pub use base::{any, FieldDefault, Options, Validator};
pub use boolean::boolean;
pub use errors::{
    ConfigResult, ConfigurationError, ErrorDetail, ErrorKey, ValidationError, ValidationResult,
};
pub use numeric::{integer, number, NumericRules};
pub use object::AdditionalProperties;
pub use proxy::{proxy, reference};
pub use string::{
    date, datetime, format_datetime, pattern, string, time, uuid, Pattern, StringRules,
};
pub use union::union;

pub(crate) use base::Kind;
pub(crate) use object::{object, ObjectRules};
