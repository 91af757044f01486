use crate::components::ComponentPool;
use crate::config::SwaggerConfig;
use crate::document::{Document, Documentation, PathsObject, SchemaMap};
use crate::error::SwaggerError;
use crate::filter::PathFilter;
use crate::normalize::Normalizer;
use crate::registry::PathRegistry;
use routedoc_core::{RouteSnapshot, RouteTable};
use std::sync::Arc;
use tracing::debug;

/// Build a document from a route snapshot in one pass, without caching.
pub fn build_document(
    documentation: &Documentation,
    filter: &PathFilter,
    snapshot: &RouteSnapshot,
) -> Document {
    let (paths, schemas) = build_parts(documentation, filter, snapshot);
    Document::new(documentation, Arc::new(paths), Arc::new(schemas))
}

fn build_parts(
    documentation: &Documentation,
    filter: &PathFilter,
    snapshot: &RouteSnapshot,
) -> (PathsObject, SchemaMap) {
    let declared = &documentation.components.schemas;
    let normalizer = Normalizer::new(&snapshot.definitions, declared);

    let mut pool = ComponentPool::new();
    normalizer.register_definitions(&mut pool);

    let mut registry = PathRegistry::new();
    let mut skipped = 0usize;
    for route in &snapshot.routes {
        if !filter.includes_route(route) {
            skipped += 1;
            continue;
        }
        let normalized = normalizer.normalize(route, &pool);
        pool.absorb(normalized.schemas);
        registry.register(&route.path, route.method, normalized.operation);
    }
    debug!(
        routes = snapshot.len(),
        skipped,
        paths = registry.len(),
        "built OpenAPI paths"
    );

    let mut schemas = pool.into_schemas();
    for (name, schema) in declared {
        schemas.insert(name.clone(), schema.clone());
    }
    (registry.into_paths(), schemas)
}

struct Cached {
    route_count: usize,
    paths: Arc<PathsObject>,
    schemas: Arc<SchemaMap>,
}

/// Owns the documentation cache.
///
/// The fingerprint is the number of routes: when a request sees the same
/// count as the previous build, the cached `paths` and `components.schemas`
/// are returned as-is. Route tables only grow, so a changed table has a
/// changed count. A schema edited in place without adding a route is not
/// detected; call [`invalidate`](Self::invalidate) after such a change.
pub struct DocumentAssembler {
    documentation: Documentation,
    filter: PathFilter,
    cached: Option<Cached>,
}

impl DocumentAssembler {
    pub fn new(documentation: Documentation, filter: PathFilter) -> Self {
        Self {
            documentation,
            filter,
            cached: None,
        }
    }

    pub fn from_config(config: &SwaggerConfig) -> Result<Self, SwaggerError> {
        Ok(Self::new(
            config.documentation.clone(),
            PathFilter::from_config(config)?,
        ))
    }

    /// Whether a table with `route_count` routes would be served from cache.
    pub fn is_fresh(&self, route_count: usize) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|cached| cached.route_count == route_count)
    }

    /// Drop the cache so the next call rebuilds.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn assemble(&mut self, snapshot: &RouteSnapshot) -> Document {
        if !self.is_fresh(snapshot.len()) {
            self.rebuild(snapshot);
        } else {
            debug!(routes = snapshot.len(), "serving cached OpenAPI document");
        }
        self.current()
    }

    /// Like [`assemble`](Self::assemble), but only copies the table when the
    /// cache is stale.
    pub fn assemble_from(&mut self, table: &RouteTable) -> Document {
        if self.is_fresh(table.len()) {
            debug!(routes = table.len(), "serving cached OpenAPI document");
        } else {
            self.rebuild(&table.snapshot());
        }
        self.current()
    }

    fn rebuild(&mut self, snapshot: &RouteSnapshot) {
        let (paths, schemas) = build_parts(&self.documentation, &self.filter, snapshot);
        self.cached = Some(Cached {
            route_count: snapshot.len(),
            paths: Arc::new(paths),
            schemas: Arc::new(schemas),
        });
    }

    fn current(&self) -> Document {
        let (paths, schemas) = match &self.cached {
            Some(cached) => (cached.paths.clone(), cached.schemas.clone()),
            None => Default::default(),
        };
        Document::new(&self.documentation, paths, schemas)
    }
}
