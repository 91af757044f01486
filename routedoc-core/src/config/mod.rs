mod loader;

use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::path::Path;

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
    /// The value at `key` could not be deserialized into the requested type.
    Deserialize { key: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
            ConfigError::Deserialize { key, message } => {
                write!(f, "Config deserialization error for '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from YAML files, `.env` files, and environment variables.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml` (base)
/// 2. `application-{profile}.yaml` (profile override, deep-merged)
/// 3. `.env` and `.env.{profile}` files (loaded into the process environment)
/// 4. Environment variables overriding existing leaves
///    (`SWAGGER_PATH` overrides `swagger.path`, matched case-insensitively)
///
/// `.env` files never overwrite already-set environment variables.
///
/// Profile is determined by: `ROUTEDOC_PROFILE` env var > argument > default `"dev"`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    root: Value,
    profile: String,
}

impl AppConfig {
    /// Load configuration for the given profile from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."), profile)
    }

    /// Load configuration for the given profile from `dir`.
    pub fn load_from_dir(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        let active_profile =
            std::env::var("ROUTEDOC_PROFILE").unwrap_or_else(|_| profile.to_string());

        let mut root = Value::Mapping(Default::default());
        loader::load_yaml_file(&dir.join("application.yaml"), &mut root)?;
        loader::load_yaml_file(&dir.join(format!("application-{active_profile}.yaml")), &mut root)?;

        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{active_profile}")));

        loader::overlay_env(&mut root, std::env::vars());

        Ok(AppConfig {
            root,
            profile: active_profile,
        })
    }

    /// Create a config from a YAML string (useful for testing).
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut root = Value::Mapping(Default::default());
        loader::merge_yaml_str(yaml, &mut root)?;
        Ok(AppConfig {
            root,
            profile: profile.to_string(),
        })
    }

    /// Create an empty config (useful for testing).
    pub fn empty() -> Self {
        AppConfig {
            root: Value::Mapping(Default::default()),
            profile: "test".to_string(),
        }
    }

    /// Deserialize the value at a dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the key does not exist, or
    /// `ConfigError::Deserialize` if the value has the wrong shape.
    pub fn get<V: DeserializeOwned>(&self, key: &str) -> Result<V, ConfigError> {
        let value = loader::lookup(&self.root, key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        serde_yaml::from_value(value.clone()).map_err(|e| ConfigError::Deserialize {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Deserialize a whole section, falling back to `V::default()` when absent.
    pub fn section<V: DeserializeOwned + Default>(&self, key: &str) -> Result<V, ConfigError> {
        match self.get(key) {
            Err(ConfigError::NotFound(_)) => Ok(V::default()),
            other => other,
        }
    }

    /// Check whether a key exists in the config.
    pub fn contains_key(&self, key: &str) -> bool {
        loader::lookup(&self.root, key).is_some()
    }

    /// The active profile name.
    pub fn profile(&self) -> &str {
        &self.profile
    }
}
