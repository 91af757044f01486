use routedoc_core::{
    ContentTypes, OperationDetail, Property, Route, SchemaNode, ValidationHooks,
};
use routedoc_openapi::components::ComponentPool;
use routedoc_openapi::document::SchemaMap;
use routedoc_openapi::{NormalizedRoute, Normalizer};
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn normalize(route: &Route) -> NormalizedRoute {
    normalize_with(route, &BTreeMap::new())
}

fn normalize_with(route: &Route, definitions: &BTreeMap<String, SchemaNode>) -> NormalizedRoute {
    let declared = SchemaMap::new();
    let normalizer = Normalizer::new(definitions, &declared);
    normalizer.normalize(route, &ComponentPool::new())
}

fn to_json(normalized: &NormalizedRoute) -> Value {
    serde_json::to_value(&normalized.operation).unwrap()
}

// ── Parameters ──────────────────────────────────────────────────────────────

#[test]
fn path_params_are_flattened_and_required() {
    let route = Route::get("/users/{id}").hooks(
        ValidationHooks::new().params(SchemaNode::object(vec![Property::optional(
            "id",
            SchemaNode::integer(),
        )])),
    );

    let op = to_json(&normalize(&route));
    assert_eq!(
        op["parameters"],
        json!([{ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }])
    );
}

#[test]
fn undeclared_template_param_is_implicit_string() {
    let route = Route::get("/users/{id}");

    let op = to_json(&normalize(&route));
    assert_eq!(
        op["parameters"],
        json!([{ "schema": { "type": "string" }, "in": "path", "name": "id", "required": true }])
    );
}

#[test]
fn query_and_header_keep_optionality() {
    let route = Route::get("/search").hooks(
        ValidationHooks::new()
            .query(SchemaNode::object(vec![
                Property::required("q", SchemaNode::string()),
                Property::optional("page", SchemaNode::integer().describe("Page number")),
            ]))
            .headers(SchemaNode::object(vec![Property::optional(
                "x-trace",
                SchemaNode::string(),
            )])),
    );

    let op = to_json(&normalize(&route));
    let params = op["parameters"].as_array().unwrap();
    assert_eq!(params.len(), 3);
    assert_eq!(params[0]["name"], "q");
    assert_eq!(params[0]["required"], true);
    assert_eq!(params[1]["required"], false);
    assert_eq!(params[1]["description"], "Page number");
    assert_eq!(params[2]["in"], "header");
}

#[test]
fn referenced_param_container_is_resolved() {
    let mut definitions = BTreeMap::new();
    definitions.insert(
        "Paging".to_string(),
        SchemaNode::object(vec![Property::optional("limit", SchemaNode::integer())]),
    );
    let route =
        Route::get("/items").hooks(ValidationHooks::new().query(SchemaNode::reference("Paging")));

    let op = to_json(&normalize_with(&route, &definitions));
    assert_eq!(op["parameters"][0]["name"], "limit");
    assert_eq!(op["parameters"][0]["in"], "query");
}

#[test]
fn non_object_params_are_omitted() {
    let route = Route::get("/items").hooks(ValidationHooks::new().query(SchemaNode::string()));
    let op = to_json(&normalize(&route));
    assert!(op.get("parameters").is_none());
}

// ── Request body ────────────────────────────────────────────────────────────

#[test]
fn named_body_is_lifted_into_components() {
    let body = SchemaNode::object(vec![Property::required("name", SchemaNode::string())])
        .named("CreateUser");
    let route = Route::post("/users").hooks(ValidationHooks::new().body(body));

    let normalized = normalize(&route);
    let op = to_json(&normalized);
    assert_eq!(
        op["requestBody"],
        json!({
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/CreateUser" } }
            }
        })
    );
    assert_eq!(
        normalized.schemas.get("CreateUser"),
        Some(&json!({
            "type": "object",
            "properties": { "name": { "type": "string" } },
            "required": ["name"]
        }))
    );
}

#[test]
fn body_is_listed_under_every_content_type() {
    let route = Route::post("/upload").hooks(
        ValidationHooks::new()
            .body(SchemaNode::object(vec![]))
            .content_type(ContentTypes::many(["json", "multipart/form-data"])),
    );

    let op = to_json(&normalize(&route));
    let content = op["requestBody"]["content"].as_object().unwrap();
    assert_eq!(content.len(), 2);
    assert!(content.contains_key("application/json"));
    assert!(content.contains_key("multipart/form-data"));
}

#[test]
fn unknown_body_reference_is_omitted() {
    let route = Route::post("/users").hooks(ValidationHooks::new().body(SchemaNode::reference("Ghost")));
    let op = to_json(&normalize(&route));
    assert!(op.get("requestBody").is_none());
}

#[test]
fn known_body_reference_points_at_definition() {
    let mut definitions = BTreeMap::new();
    definitions.insert("User".to_string(), SchemaNode::object(vec![]));
    let route = Route::post("/users").hooks(ValidationHooks::new().body(SchemaNode::reference("User")));

    let op = to_json(&normalize_with(&route, &definitions));
    assert_eq!(
        op["requestBody"]["content"]["application/json"]["schema"],
        json!({ "$ref": "#/components/schemas/User" })
    );
}

// ── Responses ───────────────────────────────────────────────────────────────

#[test]
fn single_response_is_200_with_empty_description() {
    let route = Route::get("/ping").hooks(ValidationHooks::new().response(SchemaNode::string()));

    let op = to_json(&normalize(&route));
    assert_eq!(
        op["responses"],
        json!({
            "200": {
                "description": "",
                "content": { "application/json": { "schema": { "type": "string" } } }
            }
        })
    );
}

#[test]
fn responses_by_status() {
    let route = Route::get("/users/{id}").hooks(
        ValidationHooks::new()
            .response_status(200, SchemaNode::object(vec![]).named("User"))
            .response_status(404, SchemaNode::string().describe("Not found")),
    );

    let normalized = normalize(&route);
    let op = to_json(&normalized);
    assert_eq!(
        op["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/User"
    );
    assert_eq!(op["responses"]["404"]["description"], "Not found");
    assert!(normalized.schemas.contains("User"));
}

// ── Detail ──────────────────────────────────────────────────────────────────

#[test]
fn detail_overrides_only_the_fields_it_sets() {
    let route = Route::get("/ping").hooks(
        ValidationHooks::new()
            .response(SchemaNode::string())
            .detail(
                OperationDetail::new()
                    .summary("Ping")
                    .tag("health")
                    .deprecated()
                    .extra("x-internal", true),
            ),
    );

    let op = to_json(&normalize(&route));
    assert_eq!(op["summary"], "Ping");
    assert_eq!(op["tags"], json!(["health"]));
    assert_eq!(op["deprecated"], true);
    assert_eq!(op["x-internal"], true);
    assert!(op["responses"]["200"].is_object());
}

#[test]
fn route_without_hooks_is_empty_operation() {
    assert_eq!(to_json(&normalize(&Route::get("/health"))), json!({}));
}

// ── Nested schemas ──────────────────────────────────────────────────────────

#[test]
fn nested_named_schemas_are_lifted_once() {
    let address = SchemaNode::object(vec![Property::required("city", SchemaNode::string())])
        .named("Address");
    let user = SchemaNode::object(vec![
        Property::required("home", address.clone()),
        Property::optional("work", address),
        Property::optional("tags", SchemaNode::array(SchemaNode::string()).nullable()),
    ])
    .named("User");
    let route = Route::post("/users").hooks(ValidationHooks::new().body(user));

    let normalized = normalize(&route);
    assert_eq!(normalized.schemas.len(), 2);

    let user = normalized.schemas.get("User").unwrap();
    assert_eq!(user["properties"]["home"], json!({ "$ref": "#/components/schemas/Address" }));
    assert_eq!(user["properties"]["work"], json!({ "$ref": "#/components/schemas/Address" }));
    assert_eq!(
        user["properties"]["tags"],
        json!({ "type": "array", "items": { "type": "string" }, "nullable": true })
    );
    assert_eq!(user["required"], json!(["home"]));
}

// ── Use-site modifiers ──────────────────────────────────────────────────────

fn address() -> SchemaNode {
    SchemaNode::object(vec![Property::required("city", SchemaNode::string())])
        .named("Address")
        .describe("A postal address")
}

#[test]
fn nullable_reference_wraps_the_ref_and_leaves_the_model_alone() {
    let order = SchemaNode::object(vec![
        Property::optional(
            "shipping",
            address().nullable().at_site("description", "Where to ship"),
        ),
        Property::required("billing", address()),
    ])
    .named("Order");
    let route = Route::post("/orders").hooks(ValidationHooks::new().body(order));

    let normalized = normalize(&route);
    let order = normalized.schemas.get("Order").unwrap();
    assert_eq!(
        order["properties"]["shipping"],
        json!({
            "allOf": [{ "$ref": "#/components/schemas/Address" }],
            "nullable": true,
            "description": "Where to ship"
        })
    );
    assert_eq!(
        order["properties"]["billing"],
        json!({ "$ref": "#/components/schemas/Address" })
    );
    assert_eq!(
        normalized.schemas.get("Address"),
        Some(&json!({
            "type": "object",
            "description": "A postal address",
            "properties": { "city": { "type": "string" } },
            "required": ["city"]
        }))
    );
}

#[test]
fn nullable_definition_reference_is_wrapped() {
    let mut definitions = BTreeMap::new();
    definitions.insert("User".to_string(), SchemaNode::object(vec![]));
    let route = Route::post("/users").hooks(
        ValidationHooks::new().body(SchemaNode::reference("User").nullable()),
    );

    let op = to_json(&normalize_with(&route, &definitions));
    assert_eq!(
        op["requestBody"]["content"]["application/json"]["schema"],
        json!({ "allOf": [{ "$ref": "#/components/schemas/User" }], "nullable": true })
    );
}

#[test]
fn named_path_param_takes_its_site_description() {
    let id = SchemaNode::string().named("UserId").at_site("description", "User identifier");
    let route = Route::get("/users/{id}").hooks(
        ValidationHooks::new().params(SchemaNode::object(vec![Property::required("id", id)])),
    );

    let normalized = normalize(&route);
    let op = to_json(&normalized);
    assert_eq!(op["parameters"][0]["description"], "User identifier");
    assert_eq!(op["parameters"][0]["schema"], json!({ "$ref": "#/components/schemas/UserId" }));
    assert_eq!(normalized.schemas.get("UserId"), Some(&json!({ "type": "string" })));
}

// ── Maps ────────────────────────────────────────────────────────────────────

#[test]
fn map_values_are_lifted_and_no_empty_properties() {
    let book = SchemaNode::object(vec![Property::required("by_name", SchemaNode::map(address()))])
        .named("Book");
    let route = Route::post("/books").hooks(ValidationHooks::new().body(book));

    let normalized = normalize(&route);
    let book = normalized.schemas.get("Book").unwrap();
    assert_eq!(
        book["properties"]["by_name"],
        json!({
            "type": "object",
            "additionalProperties": { "$ref": "#/components/schemas/Address" }
        })
    );
    assert!(normalized.schemas.contains("Address"));
}

#[test]
fn empty_object_has_no_properties_key() {
    let route = Route::post("/ping").hooks(ValidationHooks::new().body(SchemaNode::object(vec![])));
    let op = to_json(&normalize(&route));
    assert_eq!(
        op["requestBody"]["content"]["application/json"]["schema"],
        json!({ "type": "object" })
    );
}
