//! Configuration handed to the interactive viewers, and the pages that host them.

use crate::config::{Provider, SwaggerConfig};
use crate::document::Info;
use crate::error::SwaggerError;
use askama::Template;
use serde_json::{json, Map, Value};

/// Document URL relative to the viewer page (`swagger/json` for `/swagger`).
pub fn document_url(config: &SwaggerConfig) -> String {
    let relative = config.docs_path().trim_start_matches('/').to_string();
    format!("{relative}/json")
}

/// Configuration object for the Scalar renderer.
///
/// The default `spec.url` points at the document; keys from
/// `scalar_config` replace the defaults.
pub fn scalar_configuration(config: &SwaggerConfig) -> Map<String, Value> {
    let mut configuration = Map::new();
    configuration.insert("spec".into(), json!({ "url": document_url(config) }));
    for (key, value) in &config.scalar_config {
        configuration.insert(key.clone(), value.clone());
    }
    configuration
}

/// Options object passed to `SwaggerUIBundle`.
///
/// Defaults to the document URL mounted on `#swagger-ui`; keys from
/// `swagger_options` replace the defaults.
pub fn swagger_ui_options(config: &SwaggerConfig) -> Map<String, Value> {
    let mut options = Map::new();
    options.insert("url".into(), json!(document_url(config)));
    options.insert("dom_id".into(), json!("#swagger-ui"));
    for (key, value) in &config.swagger_options {
        options.insert(key.clone(), value.clone());
    }
    options
}

#[derive(Template)]
#[template(path = "swagger_ui.html")]
struct SwaggerUiPage<'a> {
    title: &'a str,
    description: &'a str,
    version: &'a str,
    theme: &'a str,
    options_json: &'a str,
    auto_dark_mode: bool,
}

#[derive(Template)]
#[template(path = "scalar.html")]
struct ScalarPage<'a> {
    title: &'a str,
    version: &'a str,
    spec_url: &'a str,
    configuration_json: &'a str,
}

/// JSON that can be embedded in an inline `<script>`.
fn script_safe_json(value: &Map<String, Value>) -> String {
    Value::Object(value.clone()).to_string().replace("</", "<\\/")
}

/// Render the viewer page for the configured provider.
pub fn render_viewer(config: &SwaggerConfig) -> Result<String, SwaggerError> {
    let info = Info::merged(&config.documentation.info);
    let page = match config.provider {
        Provider::SwaggerUi => {
            let options = script_safe_json(&swagger_ui_options(config));
            let theme = config.theme_url();
            SwaggerUiPage {
                title: &info.title,
                description: &info.description,
                version: &config.version,
                theme: &theme,
                options_json: &options,
                auto_dark_mode: config.auto_dark_mode,
            }
            .render()?
        }
        Provider::Scalar => {
            let configuration = scalar_configuration(config);
            let spec_url = configuration
                .get("spec")
                .and_then(|spec| spec.get("url"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| document_url(config));
            let configuration = Value::Object(configuration).to_string();
            ScalarPage {
                title: &info.title,
                version: &config.scalar_version,
                spec_url: &spec_url,
                configuration_json: &configuration,
            }
            .render()?
        }
    };
    Ok(page)
}
