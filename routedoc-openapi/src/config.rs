use crate::document::Documentation;
use routedoc_core::{AppConfig, ConfigError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_PATH: &str = "/swagger";
pub const DEFAULT_SCALAR_VERSION: &str = "1.12.5";
pub const DEFAULT_SWAGGER_UI_VERSION: &str = "5.9.0";

/// Which interactive viewer renders the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    #[default]
    #[serde(rename = "scalar")]
    Scalar,
    #[serde(rename = "swagger-ui")]
    SwaggerUi,
}

/// One `exclude` entry: a plain string is an exact path,
/// `{ pattern: "..." }` is a regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExcludeEntry {
    Path(String),
    Pattern { pattern: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}

/// Configuration of the documentation plugin.
///
/// Deserializable from the `swagger` section of `application.yaml`:
///
/// ```yaml
/// swagger:
///   provider: swagger-ui
///   path: /docs
///   exclude:
///     - /internal
///     - pattern: "^/admin"
///   documentation:
///     info:
///       title: Pet Store
///       version: 2.0.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwaggerConfig {
    pub provider: Provider,
    /// Mount path of the viewer; the document is served at `{path}/json`.
    pub path: String,
    pub documentation: Documentation,
    pub exclude_static_file: bool,
    #[serde(deserialize_with = "one_or_many")]
    pub exclude: Vec<ExcludeEntry>,
    pub scalar_version: String,
    pub scalar_config: Map<String, Value>,
    /// swagger-ui version pin.
    pub version: String,
    /// swagger-ui stylesheet URL. Defaults to the unpkg stylesheet of `version`.
    pub theme: Option<String>,
    pub swagger_options: Map<String, Value>,
    pub auto_dark_mode: bool,
}

impl Default for SwaggerConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Scalar,
            path: DEFAULT_PATH.to_string(),
            documentation: Documentation::default(),
            exclude_static_file: true,
            exclude: Vec::new(),
            scalar_version: DEFAULT_SCALAR_VERSION.to_string(),
            scalar_config: Map::new(),
            version: DEFAULT_SWAGGER_UI_VERSION.to_string(),
            theme: None,
            swagger_options: Map::new(),
            auto_dark_mode: true,
        }
    }
}

impl SwaggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `swagger` section; a missing section yields the defaults.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ConfigError> {
        config.section("swagger")
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn with_documentation(mut self, documentation: Documentation) -> Self {
        self.documentation = documentation;
        self
    }

    pub fn with_exclude_static_file(mut self, enabled: bool) -> Self {
        self.exclude_static_file = enabled;
        self
    }

    /// Exclude one exact path.
    pub fn exclude_path(mut self, path: &str) -> Self {
        self.exclude.push(ExcludeEntry::Path(path.to_string()));
        self
    }

    /// Exclude every path matching a regular expression.
    pub fn exclude_pattern(mut self, pattern: &str) -> Self {
        self.exclude.push(ExcludeEntry::Pattern {
            pattern: pattern.to_string(),
        });
        self
    }

    pub fn with_scalar_version(mut self, version: &str) -> Self {
        self.scalar_version = version.to_string();
        self
    }

    pub fn with_scalar_config(mut self, config: Map<String, Value>) -> Self {
        self.scalar_config = config;
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn with_theme(mut self, theme: &str) -> Self {
        self.theme = Some(theme.to_string());
        self
    }

    pub fn with_swagger_options(mut self, options: Map<String, Value>) -> Self {
        self.swagger_options = options;
        self
    }

    pub fn with_auto_dark_mode(mut self, enabled: bool) -> Self {
        self.auto_dark_mode = enabled;
        self
    }

    /// Mount path with a leading `/` and no trailing `/`.
    pub fn docs_path(&self) -> String {
        let trimmed = self.path.trim_matches('/');
        format!("/{trimmed}")
    }

    /// Path of the JSON document endpoint.
    pub fn json_path(&self) -> String {
        format!("{}/json", self.docs_path())
    }

    /// Stylesheet URL handed to swagger-ui.
    pub fn theme_url(&self) -> String {
        self.theme.clone().unwrap_or_else(|| {
            format!("https://unpkg.com/swagger-ui-dist@{}/swagger-ui.css", self.version)
        })
    }
}
