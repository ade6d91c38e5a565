// src/ingest/types.rs
use std::collections::HashMap;

/// One externally configured feed endpoint. Identity is the name; the set of
/// sources is immutable for the duration of a run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub url: String,
}

/// A normalized feed item. Two items are the same iff their `url` strings are
/// byte-equal; titles play no part in identity.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub url: String,
}

/// Per-invocation fetch outcome, consumed by the filter stage and discarded.
#[derive(Debug, Default)]
pub struct RunResult {
    pub per_source: HashMap<String, Vec<FeedItem>>,
    pub success_count: usize,
    pub fail_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Retry budget spent; carries the attempt count and the last cause.
    #[error("all {attempts} attempts failed: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },

    /// Transport succeeded but neither feed dialect yielded items.
    /// Deterministic on the same bytes, so never retried.
    #[error("no items parsed")]
    NoItems,
}
