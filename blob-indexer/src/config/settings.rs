//! Settings loading and validation.
//!
//! Settings come from a JSON file (`appsettings.json` by default), flattened
//! into string keys, with optional environment variable overrides. Nested
//! objects flatten to `Parent:Child` keys.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::ConfigError;

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Environment variable overriding the settings file path.
pub const SETTINGS_PATH_ENV: &str = "BLOB_INDEXER_SETTINGS";

pub const SEARCH_SERVICE_NAME: &str = "SearchServiceName";
pub const SEARCH_SERVICE_ADMIN_API_KEY: &str = "SearchServiceAdminApiKey";
pub const AZURE_BLOB_STORAGE_CONNECTION_STRING: &str = "AzureBlobStorageConnectionString";
pub const SEARCH_SERVICE_ENDPOINT: &str = "SearchServiceEndpoint";

/// A required setting and the placeholder text shipped in the template file.
#[derive(Debug, Clone, Copy)]
pub struct RequiredSetting {
    pub key: &'static str,
    pub placeholder: &'static str,
    pub env: &'static str,
}

/// Required settings, in the order they are checked.
pub static REQUIRED_SETTINGS: [RequiredSetting; 3] = [
    RequiredSetting {
        key: SEARCH_SERVICE_NAME,
        placeholder: "Put your search service name here",
        env: "SEARCH_SERVICE_NAME",
    },
    RequiredSetting {
        key: SEARCH_SERVICE_ADMIN_API_KEY,
        placeholder: "Put your primary or secondary key here",
        env: "SEARCH_SERVICE_ADMIN_API_KEY",
    },
    RequiredSetting {
        key: AZURE_BLOB_STORAGE_CONNECTION_STRING,
        placeholder: "Put your Azure Blob Storage connection string here",
        env: "AZURE_BLOB_STORAGE_CONNECTION_STRING",
    },
];

const ENDPOINT_ENV: &str = "SEARCH_SERVICE_ENDPOINT";

/// Raw key/value settings as loaded, before validation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    values: HashMap<String, String>,
}

impl AppSettings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path_str.clone(),
            },
            _ => ConfigError::Read {
                path: path_str.clone(),
                message: e.to_string(),
            },
        })?;

        let settings = Self::from_json_str(&contents).map_err(|message| ConfigError::Parse {
            path: path_str.clone(),
            message,
        })?;
        debug!(path = %path_str, keys = settings.values.len(), "Loaded settings file");
        Ok(settings)
    }

    /// Parse settings from JSON text. The root must be an object.
    pub fn from_json_str(contents: &str) -> Result<Self, String> {
        let root: Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;
        if !root.is_object() {
            return Err("settings root must be a JSON object".to_string());
        }

        let mut values = HashMap::new();
        flatten(None, &root, &mut values);
        Ok(Self { values })
    }

    /// Build settings from key/value pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Replace file values with any of the override variables that are set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    /// Replace file values using `lookup` to resolve override variable names.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = REQUIRED_SETTINGS
            .iter()
            .map(|s| (s.env, s.key))
            .chain(std::iter::once((ENDPOINT_ENV, SEARCH_SERVICE_ENDPOINT)));

        for (var, key) in overrides {
            if let Some(value) = lookup(var) {
                debug!(key = key, variable = var, "Setting overridden from environment");
                self.set(key, value);
            }
        }
    }

    /// Check that every required value was filled in.
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - Validated settings
    /// * `Err(ConfigError)` - The first missing or placeholder value, checked in
    ///   the order of [`REQUIRED_SETTINGS`], or an invalid endpoint override
    pub fn validate(&self) -> Result<Settings, ConfigError> {
        for required in &REQUIRED_SETTINGS {
            match self.get(required.key).map(str::trim) {
                None | Some("") => return Err(ConfigError::Missing { key: required.key }),
                Some(value) if value == required.placeholder => {
                    return Err(ConfigError::Placeholder { key: required.key })
                }
                Some(_) => {}
            }
        }

        let endpoint = match self.get(SEARCH_SERVICE_ENDPOINT).map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(Url::parse(raw).map_err(|e| ConfigError::InvalidEndpoint {
                value: raw.to_string(),
                message: e.to_string(),
            })?),
        };

        let value = |key: &str| self.get(key).map(str::trim).unwrap_or_default().to_string();
        Ok(Settings {
            search_service_name: value(SEARCH_SERVICE_NAME),
            admin_api_key: value(SEARCH_SERVICE_ADMIN_API_KEY),
            storage_connection_string: value(AZURE_BLOB_STORAGE_CONNECTION_STRING),
            endpoint,
        })
    }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("AppSettings").field("keys", &keys).finish()
    }
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut HashMap<String, String>) {
    let key_for = |name: &str| match prefix {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_string(),
    };

    match value {
        Value::Object(map) => {
            for (name, child) in map {
                flatten(Some(&key_for(name)), child, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten(Some(&key_for(&i.to_string())), child, out);
            }
        }
        Value::String(s) => {
            if let Some(prefix) = prefix {
                out.insert(prefix.to_string(), s.clone());
            }
        }
        Value::Null => {}
        other => {
            if let Some(prefix) = prefix {
                out.insert(prefix.to_string(), other.to_string());
            }
        }
    }
}

/// Validated settings, passed explicitly into the workflow.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub search_service_name: String,
    pub admin_api_key: String,
    pub storage_connection_string: String,
    /// Overrides `https://{search_service_name}.search.windows.net`.
    pub endpoint: Option<Url>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("search_service_name", &self.search_service_name)
            .field("admin_api_key", &"<redacted>")
            .field("storage_connection_string", &"<redacted>")
            .field("endpoint", &self.endpoint.as_ref().map(Url::as_str))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid() -> AppSettings {
        AppSettings::from_pairs([
            (SEARCH_SERVICE_NAME, "svc"),
            (SEARCH_SERVICE_ADMIN_API_KEY, "key123"),
            (
                AZURE_BLOB_STORAGE_CONNECTION_STRING,
                "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=secret;",
            ),
        ])
    }

    #[test]
    fn test_validate_valid_settings() {
        let settings = valid().validate().unwrap();

        assert_eq!(settings.search_service_name, "svc");
        assert_eq!(settings.admin_api_key, "key123");
        assert!(settings.endpoint.is_none());
    }

    #[test]
    fn test_each_placeholder_is_rejected() {
        for required in &REQUIRED_SETTINGS {
            let mut settings = valid();
            settings.set(required.key, required.placeholder);

            assert_eq!(
                settings.validate(),
                Err(ConfigError::Placeholder { key: required.key }),
                "placeholder for {} should be rejected",
                required.key
            );
        }
    }

    #[test]
    fn test_each_missing_value_is_rejected() {
        for required in &REQUIRED_SETTINGS {
            let mut values = valid().values;
            values.remove(required.key);
            let settings = AppSettings { values };

            assert_eq!(
                settings.validate(),
                Err(ConfigError::Missing { key: required.key })
            );
        }
    }

    #[test]
    fn test_blank_value_is_missing() {
        let mut settings = valid();
        settings.set(SEARCH_SERVICE_ADMIN_API_KEY, "   ");

        assert_eq!(
            settings.validate(),
            Err(ConfigError::Missing {
                key: SEARCH_SERVICE_ADMIN_API_KEY
            })
        );
    }

    #[test]
    fn test_first_failure_wins() {
        let settings = AppSettings::from_pairs(
            REQUIRED_SETTINGS
                .iter()
                .map(|r| (r.key, r.placeholder))
                .collect::<Vec<_>>(),
        );

        assert_eq!(
            settings.validate(),
            Err(ConfigError::Placeholder {
                key: SEARCH_SERVICE_NAME
            })
        );
    }

    #[test]
    fn test_endpoint_override() {
        let mut settings = valid();
        settings.set(SEARCH_SERVICE_ENDPOINT, "http://localhost:8080");
        assert_eq!(
            settings.validate().unwrap().endpoint.unwrap().as_str(),
            "http://localhost:8080/"
        );

        settings.set(SEARCH_SERVICE_ENDPOINT, "not a url");
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_from_json_flattens() {
        let settings = AppSettings::from_json_str(
            r#"{
                "SearchServiceName": "svc",
                "Logging": { "Level": "Debug", "Retries": 3 },
                "Hosts": ["a", "b"],
                "Unset": null
            }"#,
        )
        .unwrap();

        assert_eq!(settings.get("SearchServiceName"), Some("svc"));
        assert_eq!(settings.get("Logging:Level"), Some("Debug"));
        assert_eq!(settings.get("Logging:Retries"), Some("3"));
        assert_eq!(settings.get("Hosts:1"), Some("b"));
        assert_eq!(settings.get("Unset"), None);
    }

    #[test]
    fn test_from_json_requires_object() {
        assert!(AppSettings::from_json_str("[1, 2]").is_err());
        assert!(AppSettings::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "SearchServiceName": "svc", "SearchServiceAdminApiKey": "key123",
                 "AzureBlobStorageConnectionString": "conn" }}"#
        )
        .unwrap();

        let settings = AppSettings::load(file.path()).unwrap();
        assert_eq!(settings.validate().unwrap().storage_connection_string, "conn");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppSettings::load(dir.path().join("appsettings.json")).unwrap_err();

        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "SearchServiceName=svc").unwrap();

        let err = AppSettings::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut settings = valid();
        settings.apply_overrides(|name| match name {
            "SEARCH_SERVICE_ADMIN_API_KEY" => Some("from-env".to_string()),
            "SEARCH_SERVICE_ENDPOINT" => Some("http://127.0.0.1:7700".to_string()),
            _ => None,
        });

        assert_eq!(settings.get(SEARCH_SERVICE_ADMIN_API_KEY), Some("from-env"));
        assert_eq!(settings.get(SEARCH_SERVICE_NAME), Some("svc"));
        assert_eq!(
            settings.get(SEARCH_SERVICE_ENDPOINT),
            Some("http://127.0.0.1:7700")
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let settings = valid();
        let validated = settings.validate().unwrap();

        assert!(!format!("{:?}", settings).contains("AccountKey"));
        assert!(!format!("{:?}", validated).contains("key123"));
        assert!(!format!("{:?}", validated).contains("AccountKey"));
    }
}
