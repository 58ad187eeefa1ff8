//! One-shot startup configuration
//!
//! The surrounding application supplies these once, before validation
//! begins: a path to an error-message override catalog (locale or
//! customization) and the format-registry defaults. The engine never
//! reloads them.

use std::path::PathBuf;

use crate::formats::{self, FormatConfig};
use crate::validators::errors::ConfigResult;
use crate::validators::messages;

/// Engine configuration consumed by [`install`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// JSON file of message-template overrides, merged over the built-in
    /// tables kind by kind.
    pub error_messages_path: Option<PathBuf>,
    /// Format-registry defaults (strftime pattern, default offset).
    pub formats: FormatConfig,
}

/// Applies the configuration. Expected exactly once, at startup.
pub fn install(config: &Config) -> ConfigResult<()> {
    if let Some(path) = &config.error_messages_path {
        messages::load_overrides(path)?;
    }
    formats::configure(&config.formats);
    tracing::debug!("engine configuration installed");
    Ok(())
}
