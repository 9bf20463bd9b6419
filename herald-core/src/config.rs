//! YAML configuration loading.
//!
//! Three kinds of files are read:
//! - notification templates ([`NotificationTemplate`])
//! - the service config holding backend options and credentials ([`ServiceConfig`])
//! - variable files: a YAML (or JSON) mapping used as the render binding
//!
//! Every loader takes an explicit path; missing files are reported as
//! [`ConfigError::NotFound`], malformed ones as [`ConfigError::Parse`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::spec::NotificationTemplate;
use crate::types::Recipient;

/// Opsgenie's public API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.opsgenie.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// An Opsgenie API key. `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

// ---------------------------------------------------------------------------
// Service config
// ---------------------------------------------------------------------------

/// Root of the service config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default)]
    pub opsgenie: OpsgenieOptions,
}

/// Backend endpoint and per-recipient credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OpsgenieOptions {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_keys: BTreeMap<Recipient, ApiKey>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for OpsgenieOptions {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_keys: BTreeMap::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OpsgenieOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings that can only fail at send time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("opsgenie.apiUrl must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("opsgenie.timeoutSecs must be positive".into()));
        }
        let blank = self
            .api_keys
            .iter()
            .find(|(_, key)| key.expose().trim().is_empty());
        if let Some((recipient, _)) = blank {
            return Err(ConfigError::Invalid(format!(
                "opsgenie.apiKeys.{recipient} is empty"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a notification template.
pub fn load_template_at(path: &Path) -> Result<NotificationTemplate, ConfigError> {
    read_yaml(path)
}

/// Load and validate the service config.
pub fn load_service_config_at(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let config: ServiceConfig = read_yaml(path)?;
    config.opsgenie.validate()?;
    Ok(config)
}

/// Load a variables file. YAML is a superset of JSON, so both work.
///
/// An empty file yields an empty mapping.
pub fn load_vars_at(
    path: &Path,
) -> Result<serde_json::Map<String, serde_json::Value>, ConfigError> {
    let value: Option<serde_json::Value> = read_yaml(path)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(serde_json::Map::new()),
        Some(serde_json::Value::Object(map)) => Ok(map),
        Some(_) => Err(ConfigError::Invalid(format!(
            "variables file {} must contain a mapping",
            path.display()
        ))),
    }
}

/// `<home>/.herald/config.yaml` — pure, no I/O.
pub fn default_config_path_at(home: &Path) -> PathBuf {
    home.join(".herald").join("config.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("s3cr3t");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        assert_eq!(key.expose(), "s3cr3t");
    }

    #[test]
    fn options_default_to_public_endpoint() {
        let cfg: ServiceConfig = serde_yaml::from_str("opsgenie:\n  apiKeys:\n    team-x: k\n")
            .expect("parse");
        assert_eq!(cfg.opsgenie.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.opsgenie.timeout(), Duration::from_secs(30));
        assert_eq!(
            cfg.opsgenie.api_keys[&Recipient::from("team-x")].expose(),
            "k"
        );
    }

    #[test]
    fn validate_rejects_empty_key() {
        let mut opts = OpsgenieOptions::default();
        opts.api_keys.insert(Recipient::from("ops"), ApiKey::new("  "));
        let err = opts.validate().unwrap_err();
        assert!(err.to_string().contains("apiKeys.ops"), "got: {err}");
    }

    #[test]
    fn validate_rejects_empty_url() {
        let opts = OpsgenieOptions {
            api_url: String::new(),
            ..OpsgenieOptions::default()
        };
        assert!(matches!(opts.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn default_config_path_is_under_dot_herald() {
        let p = default_config_path_at(Path::new("/home/u"));
        assert_eq!(p, PathBuf::from("/home/u/.herald/config.yaml"));
    }
}
