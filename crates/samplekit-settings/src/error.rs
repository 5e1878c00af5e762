//! Error types for settings loading and lookup.

use std::path::PathBuf;

/// A required setting was not supplied by any layer.
///
/// Examples surface this when they touch a credential or endpoint that the
/// operator never configured. The runner treats it as "skip this example",
/// never as a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConfigurationNotFound {
    /// The key as it was requested, e.g. `OpenAI:ApiKey`.
    pub key: String,
    /// Human-readable description of what is missing.
    pub message: String,
}

impl ConfigurationNotFound {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let message = format!("Configuration key '{key}' not found");
        Self { key, message }
    }

    /// Attach a custom message, e.g. naming the whole section.
    pub fn with_message(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Errors produced while assembling settings layers.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings document root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for settings assembly.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;
