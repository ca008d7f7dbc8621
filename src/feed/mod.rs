//! Remote report feed.
//!
//! The feed is a single JSON array fetched with caching disabled. Any
//! transport problem or non-success status is [`FeedError::Unavailable`];
//! anything that is not a top-level array is [`FeedError::Malformed`].
//! There are no retries.

mod http_client;

pub use http_client::{resolve_user_agent, HttpFeedLoader};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::reports::RawRecord;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed unavailable: {0}")]
    Unavailable(String),

    #[error("Feed malformed: {0}")]
    Malformed(String),

    #[error("Invalid feed endpoint: {0}")]
    InvalidEndpoint(String),
}

#[async_trait]
pub trait FeedLoader: Send + Sync {
    /// Fetch the current feed contents.
    async fn load_feed(&self) -> Result<Vec<RawRecord>, FeedError>;
}

/// Validate a feed body and split it into records.
pub fn parse_feed(body: &str) -> Result<Vec<RawRecord>, FeedError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FeedError::Malformed(e.to_string()))?;

    match value {
        Value::Array(rows) => Ok(rows.into_iter().map(RawRecord::from).collect()),
        other => Err(FeedError::Malformed(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fixed in-memory feed, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    body: String,
}

impl StaticFeed {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait]
impl FeedLoader for StaticFeed {
    async fn load_feed(&self) -> Result<Vec<RawRecord>, FeedError> {
        parse_feed(&self.body)
    }
}
