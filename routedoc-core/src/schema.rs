//! Structured schema trees attached to routes.
//!
//! Validation libraries describe request and response shapes in many ways.
//! Everything that reaches the documentation engine is first converted into a
//! [`SchemaNode`], a tagged tree that the normalizer can pattern-match over
//! instead of poking at loosely-typed JSON.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keywords consumed while parsing a JSON Schema. Everything else is carried
/// over verbatim in [`SchemaNode::keywords`].
const CONSUMED_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "$defs",
    "definitions",
    "$ref",
    "title",
    "description",
    "type",
    "properties",
    "required",
    "items",
    "anyOf",
    "oneOf",
];

/// Keywords whose value is a single subschema.
const SCHEMA_KEYWORDS: &[&str] = &["additionalProperties", "not", "contains", "propertyNames"];
/// Keywords whose value is a list of subschemas.
const SCHEMA_LIST_KEYWORDS: &[&str] = &["allOf", "prefixItems"];
/// Keywords whose value maps names to subschemas.
const SCHEMA_MAP_KEYWORDS: &[&str] = &["patternProperties"];

/// JSON primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "string" => Some(PrimitiveType::String),
            "integer" => Some(PrimitiveType::Integer),
            "number" => Some(PrimitiveType::Number),
            "boolean" => Some(PrimitiveType::Boolean),
            "null" => Some(PrimitiveType::Null),
            _ => None,
        }
    }
}

/// The shape of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Primitive(PrimitiveType),
    Object(Vec<Property>),
    Array(Box<SchemaNode>),
    /// Reference to a named model living in the component pool.
    Reference(String),
    Union(Vec<SchemaNode>),
    /// Shape could not be recognised; only `keywords` survive.
    Any,
}

/// A single field of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub schema: SchemaNode,
    pub required: bool,
}

impl Property {
    pub fn required(name: impl Into<String>, schema: SchemaNode) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, schema: SchemaNode) -> Self {
        Self {
            name: name.into(),
            schema,
            required: false,
        }
    }
}

/// Subschemas held by keywords other than `properties`, `items` and `anyOf`.
#[derive(Debug, Clone, PartialEq)]
pub enum Applicator {
    /// `additionalProperties`, `not`, ...
    One(Box<SchemaNode>),
    /// `allOf`, `prefixItems`
    Many(Vec<SchemaNode>),
    /// `patternProperties`
    Map(BTreeMap<String, SchemaNode>),
}

/// A schema tree produced by the validation layer.
///
/// A node carrying a `name` is a named model: the documentation engine lifts
/// it into `components.schemas` and replaces it with a `$ref`. For a named
/// node, `nullable` and `site` describe the place the model is used and are
/// never part of the model itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub name: Option<String>,
    pub description: Option<String>,
    pub nullable: bool,
    /// Extra JSON Schema keywords (`format`, `enum`, `minimum`, ...).
    pub keywords: Map<String, Value>,
    /// Schema-valued keywords, keyed by keyword.
    pub applicators: BTreeMap<String, Applicator>,
    /// Annotations written next to a reference to a named model
    /// (`description`, `default`, ...).
    pub site: Map<String, Value>,
}

impl SchemaNode {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            name: None,
            description: None,
            nullable: false,
            keywords: Map::new(),
            applicators: BTreeMap::new(),
            site: Map::new(),
        }
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::Primitive(PrimitiveType::String))
    }

    pub fn integer() -> Self {
        Self::new(SchemaKind::Primitive(PrimitiveType::Integer))
    }

    pub fn number() -> Self {
        Self::new(SchemaKind::Primitive(PrimitiveType::Number))
    }

    pub fn boolean() -> Self {
        Self::new(SchemaKind::Primitive(PrimitiveType::Boolean))
    }

    pub fn object(properties: Vec<Property>) -> Self {
        Self::new(SchemaKind::Object(properties))
    }

    pub fn array(items: SchemaNode) -> Self {
        Self::new(SchemaKind::Array(Box::new(items)))
    }

    /// Reference a model registered in the host's definitions by name.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Reference(name.into()))
    }

    pub fn union(variants: Vec<SchemaNode>) -> Self {
        Self::new(SchemaKind::Union(variants))
    }

    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    /// String-keyed map whose values follow `values` (`HashMap<String, T>`).
    pub fn map(values: SchemaNode) -> Self {
        Self::object(Vec::new()).applicator("additionalProperties", Applicator::One(Box::new(values)))
    }

    /// Mark this node as a named model.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn keyword(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(key.into(), value.into());
        self
    }

    pub fn applicator(mut self, key: impl Into<String>, applicator: Applicator) -> Self {
        self.applicators.insert(key.into(), applicator);
        self
    }

    /// Attach an annotation to this use of a named model.
    pub fn at_site(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.site.insert(key.into(), value.into());
        self
    }

    /// Object properties, if this node is an object.
    pub fn properties(&self) -> Option<&[Property]> {
        match &self.kind {
            SchemaKind::Object(props) => Some(props),
            _ => None,
        }
    }

    /// Build a node from a type's `schemars` JSON Schema.
    pub fn of<T: schemars::JsonSchema>() -> Self {
        let schema = schemars::schema_for!(T);
        match serde_json::to_value(&schema) {
            Ok(value) => Self::from_json_schema(&value),
            Err(err) => {
                tracing::warn!(
                    type_name = std::any::type_name::<T>(),
                    error = %err,
                    "could not serialize JSON schema"
                );
                Self::any()
            }
        }
    }

    /// Parse a JSON Schema document into a tree.
    ///
    /// Local references (`#/$defs/X`, `#/definitions/X`) are inlined as nodes
    /// named `X`, so the tree is self-contained. A reference that would
    /// recurse into a definition already being expanded stays a
    /// [`SchemaKind::Reference`]. References that cannot be resolved locally
    /// (e.g. `#/components/schemas/X`) also stay references.
    pub fn from_json_schema(value: &Value) -> Self {
        let mut defs = Map::new();
        if let Some(obj) = value.as_object() {
            for key in ["definitions", "$defs"] {
                if let Some(Value::Object(map)) = obj.get(key) {
                    defs.extend(map.clone());
                }
            }
        }
        let mut stack = Vec::new();
        parse_node(value, &defs, &mut stack)
    }
}

fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

fn parse_node(value: &Value, defs: &Map<String, Value>, stack: &mut Vec<String>) -> SchemaNode {
    let Some(obj) = value.as_object() else {
        return SchemaNode::any();
    };

    let mut node = parse_kind(obj, defs, stack);
    // A model resolved through `$ref`: whatever this object adds belongs to
    // the place it is used.
    let use_site = node.name.is_some() && !obj.contains_key("title");

    if let Some(Value::String(title)) = obj.get("title") {
        node.name = Some(title.clone());
    }
    if let Some(Value::String(description)) = obj.get("description") {
        if use_site {
            node.site.insert("description".into(), Value::String(description.clone()));
        } else {
            node.description = Some(description.clone());
        }
    }
    for (key, keyword) in obj {
        if CONSUMED_KEYWORDS.contains(&key.as_str()) {
            continue;
        }
        if use_site {
            node.site.insert(key.clone(), keyword.clone());
        } else if let Some(applicator) = parse_applicator(key, keyword, defs, stack) {
            node.applicators.insert(key.clone(), applicator);
        } else {
            node.keywords.insert(key.clone(), keyword.clone());
        }
    }
    node
}

fn parse_applicator(
    key: &str,
    value: &Value,
    defs: &Map<String, Value>,
    stack: &mut Vec<String>,
) -> Option<Applicator> {
    match value {
        Value::Object(_) if SCHEMA_KEYWORDS.contains(&key) => {
            Some(Applicator::One(Box::new(parse_node(value, defs, stack))))
        }
        Value::Array(items) if SCHEMA_LIST_KEYWORDS.contains(&key) => Some(Applicator::Many(
            items.iter().map(|item| parse_node(item, defs, stack)).collect(),
        )),
        Value::Object(entries) if SCHEMA_MAP_KEYWORDS.contains(&key) => Some(Applicator::Map(
            entries
                .iter()
                .map(|(pattern, schema)| (pattern.clone(), parse_node(schema, defs, stack)))
                .collect(),
        )),
        _ => None,
    }
}

fn parse_kind(obj: &Map<String, Value>, defs: &Map<String, Value>, stack: &mut Vec<String>) -> SchemaNode {
    if let Some(Value::String(reference)) = obj.get("$ref") {
        let name = ref_name(reference).to_string();
        let local = reference.starts_with("#/$defs/") || reference.starts_with("#/definitions/");
        return match defs.get(&name) {
            Some(def) if local && !stack.contains(&name) => {
                stack.push(name.clone());
                let mut node = parse_node(def, defs, stack);
                stack.pop();
                if node.name.is_none() {
                    node.name = Some(name);
                }
                node
            }
            _ => SchemaNode::reference(name),
        };
    }

    for key in ["anyOf", "oneOf"] {
        if let Some(Value::Array(variants)) = obj.get(key) {
            let (nulls, rest): (Vec<&Value>, Vec<&Value>) = variants
                .iter()
                .partition(|v| v.get("type").and_then(Value::as_str) == Some("null"));
            if !nulls.is_empty() && rest.len() == 1 {
                let mut inner = parse_node(rest[0], defs, stack);
                inner.nullable = true;
                return inner;
            }
            return SchemaNode::union(variants.iter().map(|v| parse_node(v, defs, stack)).collect());
        }
    }

    match obj.get("type") {
        Some(Value::String(ty)) => parse_typed(ty, obj, defs, stack),
        Some(Value::Array(types)) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            let non_null: Vec<&str> = names.iter().copied().filter(|t| *t != "null").collect();
            let nullable = non_null.len() != names.len();
            let mut node = match non_null.as_slice() {
                [single] => parse_typed(single, obj, defs, stack),
                [] => SchemaNode::new(SchemaKind::Primitive(PrimitiveType::Null)),
                many => SchemaNode::union(many.iter().map(|t| parse_typed(t, obj, defs, stack)).collect()),
            };
            node.nullable = nullable;
            node
        }
        _ if obj.contains_key("properties") => parse_typed("object", obj, defs, stack),
        _ => SchemaNode::any(),
    }
}

fn parse_typed(ty: &str, obj: &Map<String, Value>, defs: &Map<String, Value>, stack: &mut Vec<String>) -> SchemaNode {
    match ty {
        "object" => {
            let required: Vec<&str> = obj
                .get("required")
                .and_then(Value::as_array)
                .map(|r| r.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            let properties = obj
                .get("properties")
                .and_then(Value::as_object)
                .map(|props| {
                    props
                        .iter()
                        .map(|(name, schema)| Property {
                            name: name.clone(),
                            schema: parse_node(schema, defs, stack),
                            required: required.contains(&name.as_str()),
                        })
                        .collect()
                })
                .unwrap_or_default();
            SchemaNode::object(properties)
        }
        "array" => {
            let items = obj
                .get("items")
                .map(|items| parse_node(items, defs, stack))
                .unwrap_or_else(SchemaNode::any);
            SchemaNode::array(items)
        }
        other => match PrimitiveType::parse(other) {
            Some(primitive) => SchemaNode::new(SchemaKind::Primitive(primitive)),
            None => SchemaNode::any(),
        },
    }
}
