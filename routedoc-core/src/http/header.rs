pub use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
pub use http::{Method, StatusCode};

/// Content type sent with the interactive viewer page.
pub const TEXT_HTML_UTF8: &str = "text/html; charset=utf8";
