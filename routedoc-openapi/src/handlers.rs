use crate::builder::DocumentAssembler;
use crate::config::SwaggerConfig;
use crate::error::SwaggerError;
use crate::viewer::render_viewer;
use routedoc_core::http::header::TEXT_HTML_UTF8;
use routedoc_core::http::{get, IntoResponse, Json, Router, CONTENT_TYPE};
use routedoc_core::RouteTable;
use std::sync::{Arc, Mutex};

struct SwaggerState {
    table: RouteTable,
    assembler: Mutex<DocumentAssembler>,
}

/// Everything the two documentation endpoints need, prepared up front so
/// configuration errors surface at setup rather than on the first request.
pub struct DocsEndpoints {
    docs_path: String,
    json_path: String,
    page: String,
    assembler: DocumentAssembler,
}

impl DocsEndpoints {
    pub fn prepare(config: &SwaggerConfig) -> Result<Self, SwaggerError> {
        Ok(Self {
            docs_path: config.docs_path(),
            json_path: config.json_path(),
            page: render_viewer(config)?,
            assembler: DocumentAssembler::from_config(config)?,
        })
    }

    pub fn docs_path(&self) -> &str {
        &self.docs_path
    }

    pub fn json_path(&self) -> &str {
        &self.json_path
    }

    /// Router serving the viewer at `{path}` and the document at `{path}/json`.
    pub fn into_router<T: Clone + Send + Sync + 'static>(self, table: RouteTable) -> Router<T> {
        let page: Arc<str> = Arc::from(self.page);
        let state = Arc::new(SwaggerState {
            table,
            assembler: Mutex::new(self.assembler),
        });

        Router::<T>::new()
            .route(
                &self.docs_path,
                get(move || {
                    let page = page.clone();
                    async move { ([(CONTENT_TYPE, TEXT_HTML_UTF8)], page.to_string()).into_response() }
                }),
            )
            .route(
                &self.json_path,
                get(move || {
                    let state = state.clone();
                    async move {
                        let document = {
                            let mut assembler = state
                                .assembler
                                .lock()
                                .unwrap_or_else(|poisoned| poisoned.into_inner());
                            assembler.assemble_from(&state.table)
                        };
                        Json(document).into_response()
                    }
                }),
            )
    }
}

/// Build an `axum::Router` serving the documentation of `table`.
///
/// The returned router can be merged into the application router; routes
/// added to `table` later are picked up on the next document request.
pub fn swagger_routes<T: Clone + Send + Sync + 'static>(
    config: &SwaggerConfig,
    table: RouteTable,
) -> Result<Router<T>, SwaggerError> {
    Ok(DocsEndpoints::prepare(config)?.into_router(table))
}
