use crate::http::{any, on, Handler, MethodFilter, MethodRouter, Router};
use crate::meta::{Route, RouteMethod};
use crate::plugin::Plugin;
use crate::schema::SchemaNode;
use crate::table::RouteTable;
use tracing::debug;

/// Builds an axum [`Router`] while recording every documented route into a
/// shared [`RouteTable`].
///
/// ```ignore
/// let app = AppBuilder::new()
///     .route(Route::get("/users/{id}").hooks(hooks), get_user)
///     .with(SwaggerPlugin::new(SwaggerConfig::default())?)
///     .build();
/// ```
pub struct AppBuilder<T = ()> {
    router: Router<T>,
    table: RouteTable,
}

impl<T: Clone + Send + Sync + 'static> AppBuilder<T> {
    pub fn new() -> Self {
        Self::with_table(RouteTable::new())
    }

    /// Start from an existing table, e.g. one shared with another builder.
    pub fn with_table(table: RouteTable) -> Self {
        Self {
            router: Router::new(),
            table,
        }
    }

    /// Mount `handler` under the route's method and path and record the route.
    ///
    /// `RouteMethod::All` mounts the handler for every method. axum rejects
    /// overlapping method handlers on one path, so an `All` route cannot share
    /// its path with explicit verbs here.
    pub fn route<H, X>(mut self, route: Route, handler: H) -> Self
    where
        H: Handler<X, T>,
        X: 'static,
    {
        let method_router: MethodRouter<T> = match method_filter(route.method) {
            Some(filter) => on(filter, handler),
            None => any(handler),
        };
        debug!(method = %route.method, path = %route.path, "registering route");
        self.router = self.router.route(&route.path, method_router);
        self.table.push(route);
        self
    }

    /// Register a named model in the definitions pool.
    pub fn define(self, name: impl Into<String>, schema: SchemaNode) -> Self {
        self.table.define(name, schema);
        self
    }

    /// Merge routes that are served but not recorded in the route table.
    pub fn register_routes(mut self, router: Router<T>) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// Install a plugin.
    pub fn with<P: Plugin>(self, plugin: P) -> Self {
        debug!(plugin = P::name(), "installing plugin");
        plugin.install(self)
    }

    /// Handle to the shared route table.
    pub fn route_table(&self) -> RouteTable {
        self.table.clone()
    }

    /// Finish building, providing the router state.
    pub fn build_with_state(self, state: T) -> Router {
        self.router.with_state(state)
    }

    /// Finish building without providing state.
    pub fn into_router(self) -> Router<T> {
        self.router
    }
}

impl AppBuilder<()> {
    pub fn build(self) -> Router {
        self.router
    }
}

impl<T: Clone + Send + Sync + 'static> Default for AppBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn method_filter(method: RouteMethod) -> Option<MethodFilter> {
    match method {
        RouteMethod::Get => Some(MethodFilter::GET),
        RouteMethod::Put => Some(MethodFilter::PUT),
        RouteMethod::Post => Some(MethodFilter::POST),
        RouteMethod::Delete => Some(MethodFilter::DELETE),
        RouteMethod::Options => Some(MethodFilter::OPTIONS),
        RouteMethod::Head => Some(MethodFilter::HEAD),
        RouteMethod::Patch => Some(MethodFilter::PATCH),
        RouteMethod::Trace => Some(MethodFilter::TRACE),
        RouteMethod::All => None,
    }
}
