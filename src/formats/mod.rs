//! Format registry: pluggable string⇄native converters
//!
//! A format handler turns a raw string into a native value at validate
//! time and back into a string at the serialization boundary. Handlers are
//! looked up by name lazily, the first time a validator or an entity read
//! needs one. The built-ins (`date`, `time`, `datetime`,
//! `format_datetime`, `UUID`) are present from the start; custom handlers
//! and configuration install once at startup, before concurrent reads
//! begin.

mod datetime;
mod uuid;

pub use self::datetime::{DateFormat, DateTimeFormat, FormatDateTime, TimeFormat};
pub use self::uuid::UuidFormat;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::FixedOffset;
use lazy_static::lazy_static;

use crate::value::Value;

/// A named string⇄native converter.
pub trait FormatHandler: Send + Sync {
    /// Registry name, as referenced by string validators.
    fn name(&self) -> &str;

    /// Whether the value is already in this format's native form.
    fn is_native(&self, value: &Value) -> bool;

    /// Parses a raw string into the native form. `None` means invalid.
    fn parse(&self, raw: &str) -> Option<Value>;

    /// Renders a value back to its string form for serialization.
    fn to_string(&self, value: &Value) -> Option<String>;
}

/// Registry defaults supplied once by the surrounding application.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// strftime pattern used by the `format_datetime` converter.
    pub datetime_format: String,
    /// Offset assumed for datetimes parsed without an explicit zone.
    /// `None` keeps them naive.
    pub default_offset: Option<FixedOffset>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            default_offset: None,
        }
    }
}

fn default_handlers() -> HashMap<String, Arc<dyn FormatHandler>> {
    let handlers: Vec<Arc<dyn FormatHandler>> = vec![
        Arc::new(DateFormat),
        Arc::new(TimeFormat),
        Arc::new(DateTimeFormat::new(None)),
        Arc::new(FormatDateTime::new("%Y-%m-%d %H:%M:%S")),
        Arc::new(UuidFormat),
    ];
    handlers
        .into_iter()
        .map(|h| (h.name().to_string(), h))
        .collect()
}

lazy_static! {
    static ref REGISTRY: RwLock<HashMap<String, Arc<dyn FormatHandler>>> =
        RwLock::new(default_handlers());
}

/// Installs (or replaces) a handler under its own name.
pub fn install(handler: Arc<dyn FormatHandler>) {
    let name = handler.name().to_string();
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    registry.insert(name.clone(), handler);
    tracing::debug!(format = %name, "format handler installed");
}

/// Applies registry defaults, replacing the configurable built-ins.
pub fn configure(config: &FormatConfig) {
    install(Arc::new(DateTimeFormat::new(config.default_offset)));
    install(Arc::new(FormatDateTime::new(&config.datetime_format)));
}

/// Looks up a handler by name.
pub fn get(name: &str) -> Option<Arc<dyn FormatHandler>> {
    let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    registry.get(name).cloned()
}
