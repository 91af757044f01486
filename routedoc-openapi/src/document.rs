//! OpenAPI 3.0 document types and the static documentation fragment.
//!
//! Precedence rules between computed values and hand-written overrides are
//! implemented as explicit per-field merges so each rule is visible here.

use routedoc_core::OperationDetail;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const OPENAPI_VERSION: &str = "3.0.3";

pub const DEFAULT_TITLE: &str = "Elysia Documentation";
pub const DEFAULT_DESCRIPTION: &str = "Development documentation";
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Top-level keys owned by the assembler; they are never copied from the
/// static fragment's free-form fields.
const RESERVED_KEYS: &[&str] = &["openapi", "info", "paths", "components"];

// ── Static documentation fragment ───────────────────────────────────────────

/// Hand-written OpenAPI fragment merged into every assembled document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Documentation {
    #[serde(default)]
    pub info: InfoOverrides,
    #[serde(default)]
    pub components: ComponentsFragment,
    /// Any other top-level field (`servers`, `tags`, `externalDocs`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Documentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.info.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.info.description = Some(description.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.info.version = Some(version.into());
        self
    }

    /// Declare a component schema. Declared schemas win over derived ones.
    pub fn schema(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.components.schemas.insert(name.into(), schema);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentsFragment {
    #[serde(default)]
    pub schemas: BTreeMap<String, Value>,
    /// `securitySchemes`, `parameters`, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Assembled document ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub version: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Info {
    /// Defaults overridden field by field by the static fragment.
    pub fn merged(overrides: &InfoOverrides) -> Self {
        Self {
            title: overrides
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: overrides
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            version: overrides
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            extra: overrides.extra.clone(),
        }
    }
}

impl Default for Info {
    fn default() -> Self {
        Self::merged(&InfoOverrides::default())
    }
}

/// An OpenAPI Operation Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Operation {
    /// Overlay hand-written fields. A field set in `detail` replaces the
    /// computed one; fields `detail` leaves unset are kept.
    pub fn apply_detail(&mut self, detail: &OperationDetail) {
        if let Some(operation_id) = &detail.operation_id {
            self.operation_id = Some(operation_id.clone());
        }
        if let Some(summary) = &detail.summary {
            self.summary = Some(summary.clone());
        }
        if let Some(description) = &detail.description {
            self.description = Some(description.clone());
        }
        if let Some(tags) = &detail.tags {
            self.tags = Some(tags.clone());
        }
        if let Some(deprecated) = detail.deprecated {
            self.deprecated = Some(deprecated);
        }
        if let Some(parameters) = &detail.parameters {
            self.parameters = Some(parameters.clone());
        }
        if let Some(request_body) = &detail.request_body {
            self.request_body = Some(request_body.clone());
        }
        if let Some(responses) = &detail.responses {
            self.responses = Some(responses.clone());
        }
        if let Some(security) = &detail.security {
            self.security = Some(security.clone());
        }
        for (key, value) in &detail.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Lowercase method name to operation.
pub type PathItem = BTreeMap<String, Operation>;

/// Path template to path item.
pub type PathsObject = BTreeMap<String, PathItem>;

/// Component schemas keyed by name.
pub type SchemaMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Components {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub schemas: Arc<SchemaMap>,
}

/// An assembled OpenAPI 3.0.3 document.
///
/// `paths` and `components.schemas` are shared with the assembler's cache,
/// so cloning a document is cheap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub openapi: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub info: Info,
    pub paths: Arc<PathsObject>,
    pub components: Components,
}

impl Document {
    /// Combine cached `paths`/`schemas` with the static fragment.
    pub fn new(documentation: &Documentation, paths: Arc<PathsObject>, schemas: Arc<SchemaMap>) -> Self {
        let extra = documentation
            .extra
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let components_extra = documentation
            .components
            .extra
            .iter()
            .filter(|(key, _)| key.as_str() != "schemas")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            openapi: OPENAPI_VERSION.to_string(),
            extra,
            info: Info::merged(&documentation.info),
            paths,
            components: Components {
                extra: components_extra,
                schemas,
            },
        }
    }

    /// Convenience accessor: the operation for `path` and lowercase `method`.
    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.get(method))
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
