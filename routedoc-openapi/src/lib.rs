mod builder;
pub mod components;
mod config;
pub mod document;
mod error;
pub mod filter;
mod ext;
mod handlers;
pub mod normalize;
pub mod registry;
pub mod viewer;

pub use builder::{build_document, DocumentAssembler};
pub use components::ComponentPool;
pub use config::{ExcludeEntry, Provider, SwaggerConfig};
pub use document::{Document, Documentation, Info, Operation, PathsObject};
pub use error::SwaggerError;
pub use ext::SwaggerPlugin;
pub use filter::PathFilter;
pub use handlers::{swagger_routes, DocsEndpoints};
pub use normalize::{NormalizedRoute, Normalizer};
pub use registry::PathRegistry;
