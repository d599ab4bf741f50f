//! HTTP page fetcher built on reqwest.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::debug;

use super::ResourceFetcher;

/// Operation name used for page fetches.
pub const PAGE_OPERATION: &str = "get_page";

// == HTTP Fetcher ==
/// Fetches a URL with a GET request and returns the body text.
///
/// Connection errors, timeouts and non-2xx statuses are all failures.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    fn name(&self) -> &str {
        PAGE_OPERATION
    }

    async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}
