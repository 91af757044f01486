pub mod builder;
pub mod config;
pub mod error;
pub mod http;
pub mod layers;
pub mod meta;
pub mod plugin;
pub mod schema;
pub mod table;

pub use builder::AppBuilder;
pub use config::{AppConfig, ConfigError};
pub use error::HttpError;
pub use layers::{default_trace, init_tracing};
pub use meta::{
    ContentTypes, OperationDetail, ResponseSchema, Route, RouteMethod, UnknownMethod,
    ValidationHooks,
};
pub use plugin::Plugin;
pub use schema::{Applicator, PrimitiveType, Property, SchemaKind, SchemaNode};
pub use table::{RouteSnapshot, RouteTable};

pub use schemars;
