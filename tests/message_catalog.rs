//! Message Catalog Tests
//!
//! Startup configuration: a project-supplied override file layers
//! localized templates over the built-in tables, kind by kind. These run
//! in their own binary because the catalog is process-wide.

use std::io::Write;

use veritype::schema::{Schema, SchemaExt};
use veritype::validators::{integer, string, ErrorDetail, NumericRules, StringRules};
use veritype::{Config, Value};

fn write_catalog(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_overrides_change_rendered_messages() {
    let catalog = write_catalog(
        r#"{
            "String": {"type": "Expected text."},
            "NumericType": {"exact": "Only {exact} is accepted."}
        }"#,
    );

    veritype::install(&Config {
        error_messages_path: Some(catalog.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap();

    let schema = Schema::builder("CatalogExample")
        .field("name", string(StringRules::default()))
        .field(
            "level",
            integer(NumericRules {
                choices: Some(vec![3.0]),
                ..Default::default()
            }),
        )
        .build()
        .unwrap();

    let err = schema
        .validate(
            Value::from(serde_json::json!({"name": 1, "level": 4})),
            false,
            true,
        )
        .unwrap_err();

    assert_eq!(
        err.field("name").and_then(ErrorDetail::message),
        Some("Expected text.")
    );
    assert_eq!(
        err.field("level").and_then(ErrorDetail::message),
        Some("Only 3 is accepted.")
    );

    // Codes are stable regardless of the rendered text.
    assert_eq!(err.field("name").and_then(ErrorDetail::code), Some("type"));
    assert_eq!(err.field("level").and_then(ErrorDetail::code), Some("exact"));
}

#[test]
fn test_instance_overrides_beat_the_catalog() {
    let schema = Schema::builder("CatalogInstance")
        .field(
            "name",
            string(StringRules::default()).with_messages(&[("type", "name must be text")]),
        )
        .build()
        .unwrap();

    let err = schema
        .validate(Value::from(serde_json::json!({"name": 1})), false, true)
        .unwrap_err();
    assert_eq!(
        err.field("name").and_then(ErrorDetail::message),
        Some("name must be text")
    );
}

#[test]
fn test_malformed_catalog_is_a_configuration_error() {
    let catalog = write_catalog("not json at all");
    let result = veritype::install(&Config {
        error_messages_path: Some(catalog.path().to_path_buf()),
        ..Default::default()
    });
    assert!(result.is_err());
}
