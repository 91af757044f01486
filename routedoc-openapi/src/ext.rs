use crate::config::SwaggerConfig;
use crate::error::SwaggerError;
use crate::handlers::DocsEndpoints;
use routedoc_core::{AppBuilder, AppConfig, Plugin};
use tracing::info;

/// Plugin that serves the generated OpenAPI document and an interactive viewer.
///
/// # Example
///
/// ```ignore
/// use routedoc_openapi::{SwaggerConfig, SwaggerPlugin};
///
/// AppBuilder::new()
///     .route(Route::get("/users"), list_users)
///     .with(SwaggerPlugin::new(SwaggerConfig::default())?)
///     .build()
/// ```
pub struct SwaggerPlugin {
    endpoints: DocsEndpoints,
}

impl SwaggerPlugin {
    /// Validate the configuration and prepare the endpoints.
    ///
    /// Fails on an invalid `exclude` pattern or an unrenderable viewer page.
    pub fn new(config: SwaggerConfig) -> Result<Self, SwaggerError> {
        Ok(Self {
            endpoints: DocsEndpoints::prepare(&config)?,
        })
    }

    /// Build the plugin from the `swagger` section of the application config.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SwaggerError> {
        Self::new(SwaggerConfig::from_app_config(config)?)
    }
}

impl Plugin for SwaggerPlugin {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        info!(
            viewer = self.endpoints.docs_path(),
            document = self.endpoints.json_path(),
            "serving API documentation"
        );
        let table = app.route_table();
        app.register_routes(self.endpoints.into_router(table))
    }
}
