//! Error-message templates
//!
//! Each validator kind has a built-in table of `code -> template` entries.
//! A project may layer localized or customized templates on top by pointing
//! startup configuration at a JSON file shaped like
//! `{"String": {"exact": "..."}, ...}`; those entries override the
//! built-ins kind-wide. Instance-level overrides, attached to a single
//! validator, take precedence over both.
//!
//! Templates substitute `{placeholder}` markers with the validator's own
//! constraint values at error-construction time.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use lazy_static::lazy_static;

use super::errors::{ConfigResult, ConfigurationError};

/// Table names, matching the validator kind that raises the code.
pub(crate) const VALIDATOR: &str = "Validator";
pub(crate) const STRING: &str = "String";
pub(crate) const NUMERIC: &str = "NumericType";
pub(crate) const BOOLEAN: &str = "Boolean";
pub(crate) const OBJECT: &str = "Object";
pub(crate) const ARRAY: &str = "Array";
pub(crate) const UNION: &str = "Union";
pub(crate) const PROXY: &str = "Proxy";

fn builtin_tables() -> HashMap<&'static str, HashMap<String, String>> {
    let mut tables = HashMap::new();

    let table = |entries: &[(&str, &str)]| -> HashMap<String, String> {
        entries
            .iter()
            .map(|(code, template)| (code.to_string(), template.to_string()))
            .collect()
    };

    tables.insert(VALIDATOR, table(&[("null", "May not be null.")]));
    tables.insert(
        STRING,
        table(&[
            ("type", "Must be a string."),
            ("null", "May not be null."),
            ("blank", "Must not be blank."),
            ("max_length", "Must have no more than {max_length} characters."),
            ("min_length", "Must have at least {min_length} characters."),
            ("pattern", "Must match the pattern /{pattern}/."),
            ("format", "Must be a valid {format}."),
            ("enum", "Must be one of {enum}."),
            ("exact", "Must be {exact}."),
        ]),
    );
    tables.insert(
        NUMERIC,
        table(&[
            ("type", "Must be a number."),
            ("null", "May not be null."),
            ("integer", "Must be an integer."),
            ("finite", "Must be finite."),
            ("minimum", "Must be greater than or equal to {minimum}."),
            ("exclusive_minimum", "Must be greater than {minimum}."),
            ("maximum", "Must be less than or equal to {maximum}."),
            ("exclusive_maximum", "Must be less than {maximum}."),
            ("multiple_of", "Must be a multiple of {multiple_of}."),
            ("enum", "Must be one of {enum}."),
            ("exact", "Must be {exact}."),
        ]),
    );
    tables.insert(
        BOOLEAN,
        table(&[
            ("type", "Must be a valid boolean."),
            ("null", "May not be null."),
        ]),
    );
    tables.insert(
        OBJECT,
        table(&[
            ("type", "Must be an object."),
            ("null", "May not be null."),
            ("invalid_key", "Object keys must be strings."),
            ("required", "The \"{field_name}\" field is required."),
            ("invalid_property", "Invalid property name."),
            ("empty", "Must not be empty."),
            ("max_properties", "Must have no more than {max_properties} properties."),
            ("min_properties", "Must have at least {min_properties} properties."),
        ]),
    );
    tables.insert(
        ARRAY,
        table(&[
            ("type", "Must be an array."),
            ("null", "May not be null."),
            ("empty", "Must not be empty."),
            ("exact_items", "Must have {min_items} items."),
            ("min_items", "Must have at least {min_items} items."),
            ("max_items", "Must have no more than {max_items} items."),
            ("additional_items", "May not contain additional items."),
            ("unique_items", "This item is not unique."),
        ]),
    );
    tables.insert(
        UNION,
        table(&[
            ("null", "Must not be null."),
            ("union", "Must match one of the union types: {items}."),
        ]),
    );
    tables.insert(PROXY, table(&[("null", "May not be null.")]));

    tables
}

lazy_static! {
    /// Built-ins merged with any project overrides. Written once at
    /// startup, read-mostly afterwards.
    static ref CATALOG: RwLock<HashMap<&'static str, HashMap<String, String>>> =
        RwLock::new(builtin_tables());
}

/// Loads a project override table from a JSON file and merges it over the
/// built-ins, kind by kind.
///
/// Expected at startup, before validators begin raising errors. Unknown
/// kind names in the file are skipped with a warning rather than rejected,
/// so one catalog file can serve several engine versions.
pub fn load_overrides(path: &Path) -> ConfigResult<()> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigurationError::MessageCatalog {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let parsed: HashMap<String, HashMap<String, String>> = serde_json::from_str(&content)
        .map_err(|e| ConfigurationError::MessageCatalog {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {}", e),
        })?;

    let mut catalog = CATALOG.write().unwrap_or_else(|e| e.into_inner());
    for (kind, overrides) in parsed {
        match catalog.get_mut(kind.as_str()) {
            Some(table) => table.extend(overrides),
            None => {
                tracing::warn!(kind = %kind, "unknown validator kind in message catalog, skipping");
            }
        }
    }
    tracing::debug!(path = %path.display(), "message overrides installed");
    Ok(())
}

/// Resolves the template for `(kind, code)` from the merged catalog.
pub(crate) fn template(kind: &str, code: &str) -> String {
    let catalog = CATALOG.read().unwrap_or_else(|e| e.into_inner());
    catalog
        .get(kind)
        .and_then(|table| table.get(code))
        .cloned()
        .unwrap_or_else(|| code.to_string())
}

/// Substitutes `{placeholder}` markers with constraint values.
pub(crate) fn render(template: &str, params: &[(&str, String)]) -> String {
    let mut message = template.to_string();
    for (name, value) in params {
        message = message.replace(&format!("{{{}}}", name), value);
    }
    message
}
