//! HTTP feed loader.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{parse_feed, FeedError, FeedLoader};
use crate::reports::RawRecord;

const USER_AGENT: &str = concat!("sitefeed/", env!("CARGO_PKG_VERSION"));

/// Resolve user agent from config value.
/// - None => default sitefeed user agent
/// - other => custom user agent string
pub fn resolve_user_agent(config: Option<&str>) -> String {
    match config {
        None => USER_AGENT.to_string(),
        Some(custom) => custom.to_string(),
    }
}

/// Fetches the feed from a fixed endpoint.
#[derive(Clone)]
pub struct HttpFeedLoader {
    client: Client,
    endpoint: Url,
}

impl HttpFeedLoader {
    /// Create a loader with no request deadline.
    pub fn new(endpoint: &str) -> Result<Self, FeedError> {
        Self::with_options(endpoint, None, None)
    }

    /// Create a loader with a custom user agent and optional timeout.
    pub fn with_options(
        endpoint: &str,
        user_agent_config: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self, FeedError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| FeedError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(FeedError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }

        let mut builder = Client::builder()
            .user_agent(resolve_user_agent(user_agent_config))
            .gzip(true)
            .brotli(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FeedError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl FeedLoader for HttpFeedLoader {
    async fn load_feed(&self) -> Result<Vec<RawRecord>, FeedError> {
        debug!("Fetching feed from {}", self.endpoint);

        // Always hit the origin; the feed must reflect the latest state
        let resp = self
            .client
            .get(self.endpoint.clone())
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| FeedError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FeedError::Unavailable(format!("HTTP {}", resp.status())));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FeedError::Unavailable(e.to_string()))?;

        let rows = parse_feed(&body)?;
        debug!("Feed returned {} rows", rows.len());
        Ok(rows)
    }
}
