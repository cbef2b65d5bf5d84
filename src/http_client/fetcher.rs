//! HTTP access for the scraper.
//!
//! Everything that touches the network goes through the [`Fetcher`] trait so the
//! pipeline can be driven by a mock in tests and by [`HttpFetcher`] in a real run.

use crate::http_client::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Issues GET requests and hands back the response body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a page and returns its body decoded as text.
    async fn get_text(&self, url: &Url) -> Result<String>;

    /// Fetches a resource and returns its raw bytes.
    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
///
/// Non-success HTTP statuses are reported as [`ScrapeError::Fetch`], the same way
/// transport failures are.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher. With `timeout` set to `None` requests wait as long as the
    /// origin takes to answer.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ScrapeError::fetch("<client>", e))?;

        Ok(Self { client })
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response> {
        debug!(%url, "GET");
        self.client
            .get(url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_text(&self, url: &Url) -> Result<String> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?;
        debug!(%url, len = bytes.len(), "received body");
        Ok(bytes.to_vec())
    }
}
