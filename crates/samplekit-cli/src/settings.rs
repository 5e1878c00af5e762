//! Built-in settings document and the layering used by the binary.

use std::path::Path;

use anyhow::{Context, Result};
use samplekit_settings::Settings;

/// Defaults shipped with the binary. Credentials are never part of it;
/// supply them through the environment (`OpenAI__ApiKey`, `Bing__ApiKey`, ...)
/// or a `--settings` file.
pub const DEFAULT_SETTINGS: &str = r#"{
  "MsGraph": {
    "ClientId": "<Your App Client ID>",
    "TenantId": "<tenant ID>",
    "Scopes": ["User.Read", "Files.ReadWrite", "Tasks.ReadWrite", "Mail.Send"],
    "RedirectUri": "http://localhost"
  },
  "OneDrivePathToFile": "<path to a text file in your OneDrive>",
  "DefaultCompletionServiceId": "gpt-35-turbo",
  "OpenAI": {
    "ServiceId": "gpt-3.5-turbo",
    "ModelId": "gpt-3.5-turbo"
  },
  "AzureOpenAI": {
    "ServiceId": "gpt-35-turbo",
    "DeploymentName": "gpt-35-turbo",
    "ChatDeploymentName": "gpt-35-turbo",
    "ModelId": "gpt-3.5-turbo",
    "Endpoint": "https://eastus-shared-prd-cs.openai.azure.com"
  }
}"#;

/// Defaults, then the optional settings file, then the environment.
pub fn load_settings(file: Option<&Path>) -> Result<Settings> {
    let mut builder = Settings::builder()
        .add_json_str(DEFAULT_SETTINGS)
        .context("built-in settings document is invalid")?;

    if let Some(path) = file {
        builder = builder
            .add_json_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?;
    }

    Ok(builder.add_environment_variables().build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_parse_and_carry_no_api_keys() {
        let settings = Settings::builder()
            .add_json_str(DEFAULT_SETTINGS)
            .expect("valid defaults")
            .build();
        assert_eq!(settings.get("OpenAI:ModelId"), Some("gpt-3.5-turbo"));
        assert_eq!(settings.get("MsGraph:Scopes:3"), Some("Mail.Send"));
        assert!(settings.get("OpenAI:ApiKey").is_none());
        assert!(settings.get("AzureOpenAI:ApiKey").is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"OpenAI": {{"ModelId": "gpt-4"}}}}"#).expect("write");

        let settings = load_settings(Some(file.path())).expect("load");
        assert_eq!(settings.get("OpenAI:ModelId"), Some("gpt-4"));
        assert_eq!(settings.get("OpenAI:ServiceId"), Some("gpt-3.5-turbo"));
    }

    #[test]
    fn test_invalid_file_is_reported_with_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");

        let err = load_settings(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("failed to load settings from"));
    }
}
