use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use url::Url;

use super::{Item, PageSource};
use crate::config::SourceConfig;
use crate::{Error, Result};

const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// Pages served by a JSON endpoint as `?page=N&per_page=M`, one array per page
pub struct HttpPageSource {
    client: Client,
    endpoint: Url,
}

impl HttpPageSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(Self::build_headers())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, endpoint })
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("bidilist/", env!("CARGO_PKG_VERSION"))),
        );
        headers
    }

    /// URL for one page, keeping any query the endpoint already has
    pub fn page_url(&self, page: u32, per_page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        url
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<Item>> {
        let url = self.page_url(page, per_page);
        tracing::debug!(url = %url, "Fetching page");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Source(format!("{} returned HTTP {}", url, status)));
        }

        let body = response.bytes().await?;
        if body.len() > MAX_PAGE_BYTES {
            return Err(Error::Source(format!(
                "Page {} is too large ({} bytes)",
                page,
                body.len()
            )));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}
