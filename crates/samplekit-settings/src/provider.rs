//! Layered settings built from JSON documents and environment variables.
//!
//! Keys are hierarchical and `:`-separated (`OpenAI:ApiKey`). Lookups are
//! case-insensitive. Each layer added to a [`SettingsBuilder`] overrides
//! values from the layers before it.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigurationNotFound, SettingsError, SettingsResult};

/// Separator between path segments of a settings key.
pub const KEY_DELIMITER: &str = ":";

/// Stand-in for [`KEY_DELIMITER`] in environment variable names.
pub const ENV_DELIMITER: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: String,
}

/// Immutable, queryable settings handed to every example.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    entries: BTreeMap<String, Entry>,
}

impl Settings {
    /// Start a new layered builder.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Look up a value; `None` when no layer supplied it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&normalize(key))
            .map(|entry| entry.value.as_str())
    }

    /// Look up a value that the caller cannot do without.
    ///
    /// Empty strings count as missing.
    pub fn require(&self, key: &str) -> Result<&str, ConfigurationNotFound> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigurationNotFound::new(key)),
        }
    }

    /// Whether any key lives under `section` (e.g. `OpenAI`).
    pub fn contains_section(&self, section: &str) -> bool {
        let prefix = format!("{}{}", normalize(section), KEY_DELIMITER);
        self.entries
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(&prefix))
    }

    /// Keys in their original spelling, sorted case-insensitively.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder applying settings layers in order; later layers win.
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    entries: BTreeMap<String, Entry>,
}

impl SettingsBuilder {
    /// Layer an in-memory JSON document.
    pub fn add_json_str(mut self, document: &str) -> SettingsResult<Self> {
        let root: Value = serde_json::from_str(document)?;
        self.merge_json(&root)?;
        Ok(self)
    }

    /// Layer a JSON document read from disk.
    pub fn add_json_file(self, path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading settings file");
        self.add_json_str(&document)
    }

    /// Layer the process environment; `__` in a variable name stands for `:`.
    pub fn add_environment_variables(self) -> Self {
        self.add_variables(std::env::vars())
    }

    /// Layer environment-style `(NAME, value)` pairs.
    pub fn add_variables<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in vars {
            let key = name.as_ref().replace(ENV_DELIMITER, KEY_DELIMITER);
            if key.is_empty() {
                continue;
            }
            self.insert(key, value.into());
        }
        self
    }

    /// Layer a single value.
    pub fn add_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Settings {
        Settings {
            entries: self.entries,
        }
    }

    fn merge_json(&mut self, root: &Value) -> SettingsResult<()> {
        let Value::Object(map) = root else {
            return Err(SettingsError::NotAnObject {
                found: json_kind(root),
            });
        };
        let mut flat = Vec::new();
        for (key, value) in map {
            flatten(key, value, &mut flat);
        }
        for (key, value) in flat {
            self.insert(key, value);
        }
        Ok(())
    }

    fn insert(&mut self, key: String, value: String) {
        self.entries.insert(normalize(&key), Entry { key, value });
    }
}

fn normalize(key: &str) -> String {
    key.to_ascii_lowercase()
}

fn flatten(path: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((path.to_string(), b.to_string())),
        Value::Number(n) => out.push((path.to_string(), n.to_string())),
        Value::String(s) => out.push((path.to_string(), s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(&format!("{path}{KEY_DELIMITER}{index}"), item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten(&format!("{path}{KEY_DELIMITER}{key}"), item, out);
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_objects_flatten_to_colon_paths() {
        let settings = Settings::builder()
            .add_json_str(r#"{"OpenAI": {"ModelId": "gpt-3.5-turbo", "Retries": 2}}"#)
            .expect("valid json")
            .build();
        assert_eq!(settings.get("OpenAI:ModelId"), Some("gpt-3.5-turbo"));
        assert_eq!(settings.get("OpenAI:Retries"), Some("2"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let settings = Settings::builder()
            .add_value("AzureOpenAI:Endpoint", "https://example.invalid")
            .build();
        assert_eq!(
            settings.get("azureopenai:ENDPOINT"),
            Some("https://example.invalid")
        );
    }

    #[test]
    fn test_arrays_use_index_segments() {
        let settings = Settings::builder()
            .add_json_str(r#"{"MsGraph": {"Scopes": ["User.Read", "Mail.Send"]}}"#)
            .expect("valid json")
            .build();
        assert_eq!(settings.get("MsGraph:Scopes:0"), Some("User.Read"));
        assert_eq!(settings.get("MsGraph:Scopes:1"), Some("Mail.Send"));
    }

    #[test]
    fn test_null_is_absent() {
        let settings = Settings::builder()
            .add_json_str(r#"{"Bing": {"ApiKey": null}}"#)
            .expect("valid json")
            .build();
        assert_eq!(settings.get("Bing:ApiKey"), None);
    }

    #[test]
    fn test_require_missing_key() {
        let settings = Settings::default();
        let err = settings.require("Bing:ApiKey").unwrap_err();
        assert_eq!(err.key, "Bing:ApiKey");
    }

    #[test]
    fn test_require_treats_blank_as_missing() {
        let settings = Settings::builder().add_value("OpenAI:ApiKey", "  ").build();
        assert!(settings.require("OpenAI:ApiKey").is_err());
    }

    #[test]
    fn test_env_delimiter_maps_to_sections() {
        let settings = Settings::builder()
            .add_variables([("OpenAI__ApiKey", "sk-test")])
            .build();
        assert_eq!(settings.get("OpenAI:ApiKey"), Some("sk-test"));
        assert!(settings.contains_section("openai"));
    }

    #[test]
    fn test_contains_section_requires_full_segment() {
        let settings = Settings::builder().add_value("OpenAIExtra:Key", "x").build();
        assert!(!settings.contains_section("OpenAI"));
        assert!(settings.contains_section("OpenAIExtra"));
    }

    #[test]
    fn test_non_object_root_rejected() {
        let err = Settings::builder().add_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, SettingsError::NotAnObject { found: "an array" }));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = Settings::builder().add_json_str("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
