use crate::document::SchemaMap;
use serde_json::{json, Value};

/// Path prefix of every `$ref` into the component pool.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// `{ "$ref": "#/components/schemas/<name>" }`
pub fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("{SCHEMA_REF_PREFIX}{name}") })
}

/// Pool of named schemas that ends up in `components.schemas`.
///
/// Derived schemas are registered with [`register`](Self::register): the
/// first registration of a name wins and later ones are ignored, since the
/// validation layer produces stable names for stable shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentPool {
    schemas: SchemaMap,
}

impl ComponentPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema unless the name is already taken.
    ///
    /// Returns `true` if the schema was inserted.
    pub fn register(&mut self, name: &str, schema: Value) -> bool {
        if self.schemas.contains_key(name) {
            return false;
        }
        self.schemas.insert(name.to_string(), schema);
        true
    }

    /// Insert a schema, replacing any existing one with the same name.
    pub fn insert(&mut self, name: &str, schema: Value) {
        self.schemas.insert(name.to_string(), schema);
    }

    /// Merge another pool in, keeping existing entries on conflicts.
    pub fn absorb(&mut self, other: ComponentPool) {
        for (name, schema) in other.schemas {
            self.schemas.entry(name).or_insert(schema);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn into_schemas(self) -> SchemaMap {
        self.schemas
    }
}
