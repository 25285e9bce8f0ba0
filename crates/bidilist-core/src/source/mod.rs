//! Paged data sources and the demo loader built on them

mod http;
mod loader;
mod synthetic;

pub use http::HttpPageSource;
pub use loader::{DirectionalLoader, PageLoaded, PageWindow};
pub use synthetic::SyntheticPageSource;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{SourceConfig, SourceKind};
use crate::Result;

/// One row of the demo list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tagline: String,
}

/// Anything that can serve numbered pages of items. Pages start at 1.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page. An empty page means there is nothing in that direction.
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<Item>>;

    /// Short label for status output
    fn describe(&self) -> String;
}

/// Build the page source selected in the configuration
pub fn source_from_config(config: &SourceConfig) -> Result<Arc<dyn PageSource>> {
    let source: Arc<dyn PageSource> = match config.kind {
        SourceKind::Http => Arc::new(HttpPageSource::new(config)?),
        SourceKind::Synthetic => Arc::new(SyntheticPageSource::new(config)),
    };
    Ok(source)
}
