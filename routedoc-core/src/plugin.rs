//! Plugin system.
//!
//! Plugins are composable units of functionality installed into an
//! [`AppBuilder`] with the `.with(plugin)` method.

use crate::builder::AppBuilder;

/// A composable unit of functionality that can be installed into an [`AppBuilder`].
///
/// Plugins can:
/// - Register routes that are not themselves documented
/// - Read the shared [`RouteTable`](crate::RouteTable), including routes
///   registered after the plugin was installed
///
/// # Example
///
/// ```ignore
/// use routedoc_core::{AppBuilder, Plugin};
/// use routedoc_core::http::{get, Router};
///
/// pub struct Health;
///
/// impl Plugin for Health {
///     fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
///         app.register_routes(Router::new().route("/health", get(|| async { "OK" })))
///     }
/// }
/// ```
pub trait Plugin: Send + 'static {
    /// Install this plugin into the given `AppBuilder`, returning the modified builder.
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T>;

    /// The name of this plugin (for diagnostics).
    fn name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}
