//! Translate one route's validation hooks into an OpenAPI operation.

use crate::components::{schema_ref, ComponentPool};
use crate::document::{Operation, SchemaMap};
use routedoc_core::{Applicator, ContentTypes, ResponseSchema, Route, SchemaKind, SchemaNode};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Where a flattened parameter lives in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
        }
    }
}

/// Output of [`Normalizer::normalize`]: the operation plus the named schemas
/// lifted out of the route's hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRoute {
    pub operation: Operation,
    pub schemas: ComponentPool,
}

/// Converts routes into operations, lifting named sub-schemas into a
/// component pool fragment.
///
/// Normalization is best effort: a hook section that cannot be translated is
/// left out of the operation and a warning is logged.
pub struct Normalizer<'a> {
    definitions: &'a BTreeMap<String, SchemaNode>,
    declared: &'a SchemaMap,
}

impl<'a> Normalizer<'a> {
    /// `definitions` is the host's named model pool; `declared` are the
    /// component schemas written by hand in the static documentation.
    pub fn new(definitions: &'a BTreeMap<String, SchemaNode>, declared: &'a SchemaMap) -> Self {
        Self {
            definitions,
            declared,
        }
    }

    /// Render every host definition into `pool`.
    ///
    /// Definitions replace any same-named schema already lifted from inside
    /// another definition.
    pub fn register_definitions(&self, pool: &mut ComponentPool) {
        let mut renderer = Renderer::new(pool);
        let bodies: Vec<(&String, Value)> = self
            .definitions
            .iter()
            .map(|(name, node)| (name, renderer.model_body(node)))
            .collect();
        let mut fragment = renderer.fragment;
        for (name, body) in bodies {
            fragment.insert(name, body);
        }
        pool.absorb(fragment);
    }

    pub fn normalize(&self, route: &Route, existing: &ComponentPool) -> NormalizedRoute {
        let hooks = &route.hooks;
        let mut renderer = Renderer::new(existing);
        let mut operation = Operation::default();
        let content_types = match &hooks.content_type {
            Some(types) if !types.is_empty() => types.clone(),
            _ => ContentTypes::default(),
        };

        let mut parameters = Vec::new();
        let sections = [
            (ParamLocation::Path, &hooks.params),
            (ParamLocation::Query, &hooks.query),
            (ParamLocation::Header, &hooks.headers),
        ];
        for (location, section) in sections {
            if let Some(container) = section {
                parameters.extend(self.parameters(route, location, container, &mut renderer));
            }
        }
        let implicit: Vec<Value> = template_params(&route.path)
            .filter(|name| !declares_path_param(&parameters, name))
            .map(|name| {
                json!({
                    "schema": { "type": "string" },
                    "in": "path",
                    "name": name,
                    "required": true,
                })
            })
            .collect();
        parameters.splice(0..0, implicit);
        if !parameters.is_empty() {
            operation.parameters = Some(parameters);
        }

        if let Some(body) = &hooks.body {
            if self.is_unknown_ref(body, &renderer) {
                warn!(
                    method = %route.method,
                    path = %route.path,
                    "request body references an unknown model, omitting requestBody"
                );
            } else {
                let schema = renderer.render(body);
                operation.request_body = Some(json!({
                    "content": content(&content_types, &schema),
                }));
            }
        }

        if let Some(response) = &hooks.response {
            let responses = self.responses(route, response, &content_types, &mut renderer);
            if !responses.is_empty() {
                operation.responses = Some(responses);
            }
        }

        if let Some(detail) = &hooks.detail {
            operation.apply_detail(detail);
        }

        NormalizedRoute {
            operation,
            schemas: renderer.fragment,
        }
    }

    fn is_known(&self, name: &str, renderer: &Renderer<'_>) -> bool {
        self.definitions.contains_key(name)
            || self.declared.contains_key(name)
            || renderer.existing.contains(name)
            || renderer.fragment.contains(name)
    }

    /// Whether `node` is a bare reference to a model nobody defines.
    fn is_unknown_ref(&self, node: &SchemaNode, renderer: &Renderer<'_>) -> bool {
        matches!(&node.kind, SchemaKind::Reference(name) if !self.is_known(name, renderer))
    }

    fn parameters(
        &self,
        route: &Route,
        location: ParamLocation,
        container: &SchemaNode,
        renderer: &mut Renderer<'_>,
    ) -> Vec<Value> {
        let resolved = match &container.kind {
            SchemaKind::Reference(name) => match self.definitions.get(name) {
                Some(node) => node,
                None => {
                    warn!(
                        method = %route.method,
                        path = %route.path,
                        location = location.as_str(),
                        model = %name,
                        "parameter schema references an unknown model, omitting"
                    );
                    return Vec::new();
                }
            },
            _ => container,
        };

        let Some(properties) = resolved.properties() else {
            warn!(
                method = %route.method,
                path = %route.path,
                location = location.as_str(),
                "parameter schema is not an object and cannot be flattened, omitting"
            );
            return Vec::new();
        };

        properties
            .iter()
            .map(|property| {
                let mut field = property.schema.clone();
                let description = match &field.name {
                    None => field.description.take(),
                    Some(_) => {
                        let description = field
                            .site
                            .get("description")
                            .and_then(Value::as_str)
                            .map(str::to_string);
                        if description.is_some() {
                            field.site.remove("description");
                        }
                        description
                    }
                };
                let mut param = Map::new();
                param.insert("name".into(), json!(property.name));
                param.insert("in".into(), json!(location.as_str()));
                param.insert(
                    "required".into(),
                    json!(location == ParamLocation::Path || property.required),
                );
                if let Some(description) = description {
                    param.insert("description".into(), json!(description));
                }
                param.insert("schema".into(), renderer.render(&field));
                Value::Object(param)
            })
            .collect()
    }

    fn responses(
        &self,
        route: &Route,
        response: &ResponseSchema,
        content_types: &ContentTypes,
        renderer: &mut Renderer<'_>,
    ) -> Map<String, Value> {
        let entries: Vec<(&str, &SchemaNode)> = match response {
            ResponseSchema::Single(node) => vec![("200", node)],
            ResponseSchema::ByStatus(by_status) => by_status
                .iter()
                .map(|(status, node)| (status.as_str(), node))
                .collect(),
        };

        let mut responses = Map::new();
        for (status, node) in entries {
            if self.is_unknown_ref(node, renderer) {
                warn!(
                    method = %route.method,
                    path = %route.path,
                    status,
                    "response references an unknown model, omitting"
                );
                continue;
            }
            let description = node
                .site
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| node.description.clone())
                .or_else(|| match &node.kind {
                    SchemaKind::Reference(name) => self
                        .definitions
                        .get(name)
                        .and_then(|model| model.description.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            let schema = renderer.render(node);
            responses.insert(
                status.to_string(),
                json!({
                    "description": description,
                    "content": content(content_types, &schema),
                }),
            );
        }
        responses
    }
}

/// Renders schema trees to JSON, lifting named nodes into `fragment`.
struct Renderer<'p> {
    existing: &'p ComponentPool,
    fragment: ComponentPool,
}

impl<'p> Renderer<'p> {
    fn new(existing: &'p ComponentPool) -> Self {
        Self {
            existing,
            fragment: ComponentPool::new(),
        }
    }

    /// Render `node`; a named node becomes a `$ref` to its component.
    fn render(&mut self, node: &SchemaNode) -> Value {
        match &node.name {
            Some(name) => {
                if !self.existing.contains(name) && !self.fragment.contains(name) {
                    let body = self.model_body(node);
                    self.fragment.register(name, body);
                }
                at_use_site(schema_ref(name), node.nullable, node.site.clone())
            }
            None => self.render_body(node),
        }
    }

    /// Component body of a named model, without the modifiers of the place
    /// it was found at.
    fn model_body(&mut self, node: &SchemaNode) -> Value {
        let mut model = node.clone();
        model.nullable = false;
        model.site.clear();
        self.render_body(&model)
    }

    /// Render `node` inline, ignoring its own name.
    fn render_body(&mut self, node: &SchemaNode) -> Value {
        let mut out = Map::new();
        match &node.kind {
            SchemaKind::Primitive(primitive) => {
                if primitive.as_str() == "null" {
                    out.insert("nullable".into(), json!(true));
                } else {
                    out.insert("type".into(), json!(primitive.as_str()));
                }
            }
            SchemaKind::Object(properties) => {
                out.insert("type".into(), json!("object"));
                let mut rendered = Map::new();
                let mut required = Vec::new();
                for property in properties {
                    rendered.insert(property.name.clone(), self.render(&property.schema));
                    if property.required {
                        required.push(json!(property.name));
                    }
                }
                if !rendered.is_empty() {
                    out.insert("properties".into(), Value::Object(rendered));
                }
                if !required.is_empty() {
                    out.insert("required".into(), Value::Array(required));
                }
            }
            SchemaKind::Array(items) => {
                out.insert("type".into(), json!("array"));
                out.insert("items".into(), self.render(items));
            }
            SchemaKind::Reference(name) => {
                let mut annotations = node.keywords.clone();
                if let Some(description) = &node.description {
                    annotations.insert("description".into(), json!(description));
                }
                annotations.extend(node.site.clone());
                return at_use_site(schema_ref(name), node.nullable, annotations);
            }
            SchemaKind::Union(variants) => {
                let rendered: Vec<Value> = variants.iter().map(|v| self.render(v)).collect();
                out.insert("anyOf".into(), Value::Array(rendered));
            }
            SchemaKind::Any => {}
        }
        for (key, applicator) in &node.applicators {
            let rendered = match applicator {
                Applicator::One(inner) => self.render(inner),
                Applicator::Many(items) => {
                    Value::Array(items.iter().map(|item| self.render(item)).collect())
                }
                Applicator::Map(entries) => Value::Object(
                    entries
                        .iter()
                        .map(|(key, schema)| (key.clone(), self.render(schema)))
                        .collect(),
                ),
            };
            out.insert(key.clone(), rendered);
        }
        if let Some(description) = &node.description {
            out.insert("description".into(), json!(description));
        }
        if node.nullable {
            out.insert("nullable".into(), json!(true));
        }
        for (key, value) in node.keywords.iter().chain(&node.site) {
            out.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(out)
    }
}

/// A `$ref` as written at one place of use. OpenAPI 3.0 ignores siblings of
/// `$ref`, so modifiers wrap the reference in a single-entry `allOf`.
fn at_use_site(reference: Value, nullable: bool, annotations: Map<String, Value>) -> Value {
    if !nullable && annotations.is_empty() {
        return reference;
    }
    let mut out = Map::new();
    out.insert("allOf".into(), json!([reference]));
    if nullable {
        out.insert("nullable".into(), json!(true));
    }
    for (key, value) in annotations {
        out.entry(key).or_insert(value);
    }
    Value::Object(out)
}

fn content(content_types: &ContentTypes, schema: &Value) -> Value {
    let mut media = Map::new();
    for content_type in content_types.iter() {
        media.insert(content_type.to_string(), json!({ "schema": schema }));
    }
    Value::Object(media)
}

/// Names of `{param}` segments in a path template. Wildcards are skipped.
fn template_params(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter_map(|segment| {
        segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .filter(|name| !name.is_empty() && !name.starts_with('*'))
    })
}

fn declares_path_param(parameters: &[Value], name: &str) -> bool {
    parameters
        .iter()
        .any(|p| p["in"] == "path" && p["name"] == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_params_skips_wildcards() {
        let names: Vec<&str> = template_params("/files/{id}/raw/{*rest}").collect();
        assert_eq!(names, vec!["id"]);
    }

    #[test]
    fn template_params_of_static_path_is_empty() {
        assert_eq!(template_params("/health").count(), 0);
    }
}
