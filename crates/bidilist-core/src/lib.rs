pub mod config;
pub mod error;
pub mod geometry;
pub mod pagination;
pub mod source;

pub use config::{AppConfig, ListConfig, SourceKind};
pub use error::{Error, Result};
pub use geometry::ScrollGeometry;
pub use pagination::{Edge, LoadOutcome, PageInfo, PageLoader, Paginator};
