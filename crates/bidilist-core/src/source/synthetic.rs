use std::time::Duration;

use super::{Item, PageSource};
use crate::config::SourceConfig;
use crate::Result;

/// Deterministic local pages, useful offline and in tests
pub struct SyntheticPageSource {
    total_pages: u32,
    latency: Duration,
}

impl SyntheticPageSource {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            total_pages: config.total_pages,
            latency: Duration::from_millis(config.latency_ms),
        }
    }

    pub fn with_pages(total_pages: u32, latency: Duration) -> Self {
        Self {
            total_pages,
            latency,
        }
    }

    fn page(&self, page: u32, per_page: u32) -> Vec<Item> {
        if page == 0 || page > self.total_pages {
            return Vec::new();
        }

        let first_id = u64::from(page - 1) * u64::from(per_page) + 1;
        (0..per_page)
            .map(|row| {
                let id = first_id + u64::from(row);
                Item {
                    id,
                    name: format!("Item {}", id),
                    tagline: format!("Page {}, row {}", page, row + 1),
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl PageSource for SyntheticPageSource {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<Item>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.page(page, per_page))
    }

    fn describe(&self) -> String {
        format!("synthetic ({} pages)", self.total_pages)
    }
}
