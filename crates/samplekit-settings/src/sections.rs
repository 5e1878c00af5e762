//! Typed views over well-known settings sections.
//!
//! Each section is resolved on demand from a [`Settings`] instance. The
//! first required key that is absent aborts resolution with
//! [`ConfigurationNotFound`].

use crate::error::ConfigurationNotFound;
use crate::provider::Settings;

/// `OpenAI:*` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiSettings {
    pub service_id: Option<String>,
    pub model_id: String,
    pub api_key: String,
}

impl OpenAiSettings {
    pub const SECTION: &'static str = "OpenAI";

    pub fn resolve(settings: &Settings) -> Result<Self, ConfigurationNotFound> {
        Ok(Self {
            service_id: optional(settings, Self::SECTION, "ServiceId"),
            model_id: required(settings, Self::SECTION, "ModelId")?,
            api_key: required(settings, Self::SECTION, "ApiKey")?,
        })
    }
}

/// `AzureOpenAI:*` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureOpenAiSettings {
    pub service_id: Option<String>,
    pub deployment_name: String,
    pub endpoint: String,
    /// `None` only when resolved for an ambient credential.
    pub api_key: Option<String>,
}

impl AzureOpenAiSettings {
    pub const SECTION: &'static str = "AzureOpenAI";

    /// Resolve for key-based authentication; `ApiKey` is required.
    pub fn resolve(settings: &Settings) -> Result<Self, ConfigurationNotFound> {
        let mut section = Self::resolve_for_ambient_credential(settings)?;
        section.api_key = Some(required(settings, Self::SECTION, "ApiKey")?);
        Ok(section)
    }

    /// Resolve for callers that authenticate with an ambient identity
    /// (managed identity, developer login). Only the deployment and the
    /// endpoint are required; a configured `ApiKey` is still picked up.
    pub fn resolve_for_ambient_credential(
        settings: &Settings,
    ) -> Result<Self, ConfigurationNotFound> {
        Ok(Self {
            service_id: optional(settings, Self::SECTION, "ServiceId"),
            deployment_name: required(settings, Self::SECTION, "DeploymentName")?,
            endpoint: required(settings, Self::SECTION, "Endpoint")?,
            api_key: settings
                .require(&format!("{}:ApiKey", Self::SECTION))
                .ok()
                .map(str::to_string),
        })
    }
}

/// `Bing:*` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BingSettings {
    pub api_key: String,
}

impl BingSettings {
    pub const SECTION: &'static str = "Bing";

    pub fn resolve(settings: &Settings) -> Result<Self, ConfigurationNotFound> {
        let key = format!("{}:ApiKey", Self::SECTION);
        let api_key = settings.require(&key).map_err(|_| {
            ConfigurationNotFound::with_message(key.clone(), "Bing credentials not found")
        })?;
        Ok(Self {
            api_key: api_key.to_string(),
        })
    }
}

fn required(
    settings: &Settings,
    section: &str,
    field: &str,
) -> Result<String, ConfigurationNotFound> {
    settings
        .require(&format!("{section}:{field}"))
        .map(str::to_string)
}

fn optional(settings: &Settings, section: &str, field: &str) -> Option<String> {
    settings
        .get(&format!("{section}:{field}"))
        .map(str::to_string)
}
