//! HTTP types re-exported from axum so plugins don't need a direct dependency.

pub mod header;

pub use axum::body::Body;
pub use axum::handler::Handler;
pub use axum::response::{Html, IntoResponse, Response};
pub use axum::routing::{self, any, get, on, MethodFilter, MethodRouter};
pub use axum::{serve, Extension, Json, Router};
pub use self::header::{HeaderMap, HeaderValue, StatusCode, CONTENT_TYPE};
