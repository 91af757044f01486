use crate::meta::Route;
use crate::schema::SchemaNode;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct TableInner {
    routes: Vec<Route>,
    definitions: BTreeMap<String, SchemaNode>,
}

/// Shared, append-only table of registered routes.
///
/// Cloning yields another handle to the same table, so a plugin can hold one
/// while the application keeps registering routes.
#[derive(Clone, Default)]
pub struct RouteTable {
    inner: Arc<RwLock<TableInner>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, TableInner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, TableInner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a route.
    pub fn push(&self, route: Route) {
        self.write().routes.push(route);
    }

    /// Register a named model in the global definitions pool.
    pub fn define(&self, name: impl Into<String>, schema: SchemaNode) {
        self.write().definitions.insert(name.into(), schema);
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.read().routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().routes.is_empty()
    }

    /// Copy the current routes and definitions out of the table.
    pub fn snapshot(&self) -> RouteSnapshot {
        let inner = self.read();
        RouteSnapshot {
            routes: inner.routes.clone(),
            definitions: inner.definitions.clone(),
        }
    }
}

/// Point-in-time copy of a [`RouteTable`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSnapshot {
    pub routes: Vec<Route>,
    pub definitions: BTreeMap<String, SchemaNode>,
}

impl RouteSnapshot {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            definitions: BTreeMap::new(),
        }
    }

    pub fn with_definition(mut self, name: impl Into<String>, schema: SchemaNode) -> Self {
        self.definitions.insert(name.into(), schema);
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
