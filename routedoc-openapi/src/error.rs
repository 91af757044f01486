use routedoc_core::ConfigError;

/// Errors raised while setting up the documentation endpoints.
#[derive(Debug)]
pub enum SwaggerError {
    /// An `exclude` entry is not a valid regular expression.
    InvalidExcludePattern {
        pattern: String,
        source: regex::Error,
    },
    /// The `swagger` configuration section could not be read.
    Config(ConfigError),
    /// The viewer page could not be rendered.
    Render(askama::Error),
}

impl std::fmt::Display for SwaggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwaggerError::InvalidExcludePattern { pattern, source } => {
                write!(f, "Invalid exclude pattern '{pattern}': {source}")
            }
            SwaggerError::Config(err) => write!(f, "Swagger configuration error: {err}"),
            SwaggerError::Render(err) => write!(f, "Viewer render error: {err}"),
        }
    }
}

impl std::error::Error for SwaggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SwaggerError::InvalidExcludePattern { source, .. } => Some(source),
            SwaggerError::Config(err) => Some(err),
            SwaggerError::Render(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SwaggerError {
    fn from(err: ConfigError) -> Self {
        SwaggerError::Config(err)
    }
}

impl From<askama::Error> for SwaggerError {
    fn from(err: askama::Error) -> Self {
        SwaggerError::Render(err)
    }
}
