//! samplekit settings - layered configuration for example programs
//!
//! Provides:
//! - A case-insensitive, `:`-keyed settings object built from JSON documents
//!   and environment variables
//! - Typed views over the well-known service sections
//! - [`ConfigurationNotFound`], the error examples raise when a required
//!   setting is absent

pub mod error;
pub mod provider;
pub mod sections;

pub use error::{ConfigurationNotFound, SettingsError, SettingsResult};
pub use provider::{Settings, SettingsBuilder, ENV_DELIMITER, KEY_DELIMITER};
pub use sections::{AzureOpenAiSettings, BingSettings, OpenAiSettings};
