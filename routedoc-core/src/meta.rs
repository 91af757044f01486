use crate::schema::SchemaNode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ── Methods ─────────────────────────────────────────────────────────────────

/// HTTP method a route is registered under. `All` matches every verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
    All,
}

impl RouteMethod {
    /// Concrete verbs an OpenAPI path item can describe.
    pub const STANDARD: [RouteMethod; 8] = [
        RouteMethod::Get,
        RouteMethod::Put,
        RouteMethod::Post,
        RouteMethod::Delete,
        RouteMethod::Options,
        RouteMethod::Head,
        RouteMethod::Patch,
        RouteMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Put => "PUT",
            RouteMethod::Post => "POST",
            RouteMethod::Delete => "DELETE",
            RouteMethod::Options => "OPTIONS",
            RouteMethod::Head => "HEAD",
            RouteMethod::Patch => "PATCH",
            RouteMethod::Trace => "TRACE",
            RouteMethod::All => "ALL",
        }
    }

    /// Lowercase key used in an OpenAPI path item (`"get"`, `"post"`, ...).
    pub fn as_key(&self) -> &'static str {
        match self {
            RouteMethod::Get => "get",
            RouteMethod::Put => "put",
            RouteMethod::Post => "post",
            RouteMethod::Delete => "delete",
            RouteMethod::Options => "options",
            RouteMethod::Head => "head",
            RouteMethod::Patch => "patch",
            RouteMethod::Trace => "trace",
            RouteMethod::All => "all",
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, RouteMethod::All)
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown HTTP method: {}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for RouteMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(RouteMethod::Get),
            "PUT" => Ok(RouteMethod::Put),
            "POST" => Ok(RouteMethod::Post),
            "DELETE" => Ok(RouteMethod::Delete),
            "OPTIONS" => Ok(RouteMethod::Options),
            "HEAD" => Ok(RouteMethod::Head),
            "PATCH" => Ok(RouteMethod::Patch),
            "TRACE" => Ok(RouteMethod::Trace),
            "ALL" => Ok(RouteMethod::All),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

// ── Content types ───────────────────────────────────────────────────────────

pub const APPLICATION_JSON: &str = "application/json";

/// Content type(s) a route accepts and produces.
///
/// Shorthands are expanded on construction: `json`, `text`, `formdata`,
/// `urlencoded` and `arrayBuffer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypes(Vec<String>);

impl ContentTypes {
    pub fn single(content_type: &str) -> Self {
        Self(vec![expand_shorthand(content_type)])
    }

    pub fn many<I, S>(content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            content_types
                .into_iter()
                .map(|ct| expand_shorthand(ct.as_ref()))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self(vec![APPLICATION_JSON.to_string()])
    }
}

impl From<&str> for ContentTypes {
    fn from(value: &str) -> Self {
        Self::single(value)
    }
}

fn expand_shorthand(content_type: &str) -> String {
    match content_type {
        "json" => APPLICATION_JSON,
        "text" => "text/plain",
        "formdata" => "multipart/form-data",
        "urlencoded" => "application/x-www-form-urlencoded",
        "arrayBuffer" => "application/octet-stream",
        other => other,
    }
    .to_string()
}

// ── Hooks ───────────────────────────────────────────────────────────────────

/// Response schema(s) of a route.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseSchema {
    /// A single schema, documented as the `200` response.
    Single(SchemaNode),
    /// Schemas keyed by status code (`"200"`, `"404"`, `"default"`, ...).
    ByStatus(BTreeMap<String, SchemaNode>),
}

/// Hand-written OpenAPI operation fields supplied by the route owner.
///
/// Fields set here win over anything computed from the route's schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<Value>>,
    /// Any other Operation Object field (`externalDocs`, `x-*`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OperationDetail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = Some(true);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Validation schemas and documentation overrides attached to a route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationHooks {
    pub params: Option<SchemaNode>,
    pub query: Option<SchemaNode>,
    pub headers: Option<SchemaNode>,
    pub body: Option<SchemaNode>,
    pub response: Option<ResponseSchema>,
    pub content_type: Option<ContentTypes>,
    pub detail: Option<OperationDetail>,
    /// Hidden routes never appear in the generated document.
    pub hide: bool,
}

impl ValidationHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, schema: SchemaNode) -> Self {
        self.params = Some(schema);
        self
    }

    pub fn query(mut self, schema: SchemaNode) -> Self {
        self.query = Some(schema);
        self
    }

    pub fn headers(mut self, schema: SchemaNode) -> Self {
        self.headers = Some(schema);
        self
    }

    pub fn body(mut self, schema: SchemaNode) -> Self {
        self.body = Some(schema);
        self
    }

    /// Set a single response schema (documented under status `200`).
    pub fn response(mut self, schema: SchemaNode) -> Self {
        self.response = Some(ResponseSchema::Single(schema));
        self
    }

    /// Add a response schema for a specific status code.
    ///
    /// A previously set single response is kept as the `200` entry.
    pub fn response_status(mut self, status: impl ToString, schema: SchemaNode) -> Self {
        let mut by_status = match self.response.take() {
            Some(ResponseSchema::ByStatus(map)) => map,
            Some(ResponseSchema::Single(single)) => BTreeMap::from([("200".to_string(), single)]),
            None => BTreeMap::new(),
        };
        by_status.insert(status.to_string(), schema);
        self.response = Some(ResponseSchema::ByStatus(by_status));
        self
    }

    pub fn content_type(mut self, content_type: impl Into<ContentTypes>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn detail(mut self, detail: OperationDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }
}

// ── Routes ──────────────────────────────────────────────────────────────────

/// One registered (method, path) handler and its validation metadata.
///
/// Paths use the `{param}` template syntax shared by axum and OpenAPI.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub method: RouteMethod,
    pub path: String,
    pub hooks: ValidationHooks,
}

impl Route {
    pub fn new(method: RouteMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            hooks: ValidationHooks::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::Delete, path)
    }

    pub fn all(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::All, path)
    }

    pub fn hooks(mut self, hooks: ValidationHooks) -> Self {
        self.hooks = hooks;
        self
    }
}
