use schemars::JsonSchema;
use routedoc_core::{Applicator, PrimitiveType, SchemaKind, SchemaNode};
use std::collections::HashMap;
use serde_json::json;

// ── Builders ────────────────────────────────────────────────────────────────

#[test]
fn named_node_keeps_name_and_description() {
    let node = SchemaNode::string().named("Email").describe("An email address");
    assert_eq!(node.name.as_deref(), Some("Email"));
    assert_eq!(node.description.as_deref(), Some("An email address"));
    assert_eq!(node.kind, SchemaKind::Primitive(PrimitiveType::String));
}

#[test]
fn properties_only_for_objects() {
    assert!(SchemaNode::string().properties().is_none());
    let obj = SchemaNode::object(vec![]);
    assert_eq!(obj.properties().map(<[_]>::len), Some(0));
}

// ── JSON Schema parsing ─────────────────────────────────────────────────────

#[test]
fn parses_object_with_required_fields() {
    let node = SchemaNode::from_json_schema(&json!({
        "title": "User",
        "type": "object",
        "properties": {
            "id": { "type": "integer", "format": "int64" },
            "nickname": { "type": "string" }
        },
        "required": ["id"]
    }));

    assert_eq!(node.name.as_deref(), Some("User"));
    let props = node.properties().unwrap();
    let id = props.iter().find(|p| p.name == "id").unwrap();
    let nickname = props.iter().find(|p| p.name == "nickname").unwrap();
    assert!(id.required);
    assert!(!nickname.required);
    assert_eq!(id.schema.keywords["format"], "int64");
}

#[test]
fn nullable_type_array() {
    let node = SchemaNode::from_json_schema(&json!({ "type": ["string", "null"] }));
    assert_eq!(node.kind, SchemaKind::Primitive(PrimitiveType::String));
    assert!(node.nullable);
}

#[test]
fn nullable_any_of() {
    let node = SchemaNode::from_json_schema(&json!({
        "anyOf": [{ "type": "integer" }, { "type": "null" }]
    }));
    assert_eq!(node.kind, SchemaKind::Primitive(PrimitiveType::Integer));
    assert!(node.nullable);
}

#[test]
fn one_of_becomes_union() {
    let node = SchemaNode::from_json_schema(&json!({
        "oneOf": [{ "type": "integer" }, { "type": "string" }]
    }));
    match node.kind {
        SchemaKind::Union(variants) => assert_eq!(variants.len(), 2),
        other => panic!("expected union, got {other:?}"),
    }
}

#[test]
fn local_refs_are_inlined_as_named_nodes() {
    let node = SchemaNode::from_json_schema(&json!({
        "type": "object",
        "properties": { "address": { "$ref": "#/$defs/Address" } },
        "$defs": {
            "Address": {
                "type": "object",
                "properties": { "city": { "type": "string" } }
            }
        }
    }));

    let address = &node.properties().unwrap()[0].schema;
    assert_eq!(address.name.as_deref(), Some("Address"));
    assert!(address.properties().is_some());
}

#[test]
fn recursive_ref_stays_a_reference() {
    let node = SchemaNode::from_json_schema(&json!({
        "$ref": "#/$defs/Tree",
        "$defs": {
            "Tree": {
                "type": "object",
                "properties": {
                    "children": { "type": "array", "items": { "$ref": "#/$defs/Tree" } }
                }
            }
        }
    }));

    assert_eq!(node.name.as_deref(), Some("Tree"));
    let children = &node.properties().unwrap()[0].schema;
    match &children.kind {
        SchemaKind::Array(items) => assert_eq!(items.kind, SchemaKind::Reference("Tree".into())),
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn components_ref_stays_a_reference() {
    let node = SchemaNode::from_json_schema(&json!({ "$ref": "#/components/schemas/Pet" }));
    assert_eq!(node.kind, SchemaKind::Reference("Pet".into()));
}

#[test]
fn unknown_shape_keeps_keywords_only() {
    let node = SchemaNode::from_json_schema(&json!({ "enum": ["a", "b"] }));
    assert_eq!(node.kind, SchemaKind::Any);
    assert_eq!(node.keywords["enum"], json!(["a", "b"]));
}

#[test]
fn non_object_schema_is_any() {
    assert_eq!(SchemaNode::from_json_schema(&json!(true)).kind, SchemaKind::Any);
}

#[test]
fn nullable_reference_keeps_model_clean() {
    let node = SchemaNode::from_json_schema(&json!({
        "type": "object",
        "properties": {
            "shipping": {
                "anyOf": [{ "$ref": "#/$defs/Address" }, { "type": "null" }],
                "description": "Where to ship"
            }
        },
        "$defs": {
            "Address": {
                "type": "object",
                "description": "A postal address",
                "properties": { "city": { "type": "string" } }
            }
        }
    }));

    let shipping = &node.properties().unwrap()[0].schema;
    assert_eq!(shipping.name.as_deref(), Some("Address"));
    assert!(shipping.nullable);
    assert_eq!(shipping.description.as_deref(), Some("A postal address"));
    assert_eq!(shipping.site["description"], "Where to ship");
}

#[test]
fn schema_valued_keywords_are_parsed() {
    let node = SchemaNode::from_json_schema(&json!({
        "type": "object",
        "additionalProperties": { "$ref": "#/$defs/Address" },
        "allOf": [{ "type": "object" }],
        "$defs": { "Address": { "type": "object" } }
    }));

    assert!(node.keywords.is_empty());
    match &node.applicators["additionalProperties"] {
        Applicator::One(values) => assert_eq!(values.name.as_deref(), Some("Address")),
        other => panic!("expected a single subschema, got {other:?}"),
    }
    assert!(matches!(&node.applicators["allOf"], Applicator::Many(items) if items.len() == 1));
}

#[test]
fn boolean_additional_properties_stays_a_keyword() {
    let node = SchemaNode::from_json_schema(&json!({
        "type": "object",
        "additionalProperties": false
    }));
    assert_eq!(node.keywords["additionalProperties"], false);
    assert!(node.applicators.is_empty());
}

// ── schemars ────────────────────────────────────────────────────────────────

#[allow(dead_code)]
#[derive(JsonSchema)]
struct Address {
    city: String,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct Customer {
    name: String,
    age: Option<u32>,
    address: Address,
}

#[test]
fn schema_of_derived_type() {
    let node = SchemaNode::of::<Customer>();
    assert_eq!(node.name.as_deref(), Some("Customer"));

    let props = node.properties().unwrap();
    let name = props.iter().find(|p| p.name == "name").unwrap();
    let age = props.iter().find(|p| p.name == "age").unwrap();
    let address = props.iter().find(|p| p.name == "address").unwrap();

    assert!(name.required);
    assert!(!age.required);
    assert!(age.schema.nullable);
    assert_eq!(address.schema.name.as_deref(), Some("Address"));
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct Directory {
    by_city: HashMap<String, Address>,
    primary: Option<Address>,
}

#[test]
fn schema_of_derived_map_and_option() {
    let node = SchemaNode::of::<Directory>();
    let props = node.properties().unwrap();

    let by_city = &props.iter().find(|p| p.name == "by_city").unwrap().schema;
    match &by_city.applicators["additionalProperties"] {
        Applicator::One(values) => assert_eq!(values.name.as_deref(), Some("Address")),
        other => panic!("expected a single subschema, got {other:?}"),
    }

    let primary = &props.iter().find(|p| p.name == "primary").unwrap().schema;
    assert_eq!(primary.name.as_deref(), Some("Address"));
    assert!(primary.nullable);
}
