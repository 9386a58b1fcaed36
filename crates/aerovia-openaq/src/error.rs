//! Error types for the OpenAQ API client.

use thiserror::Error;

/// Errors that can occur when using the OpenAQ API.
#[derive(Debug, Error)]
pub enum OpenAqError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("OpenAQ API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded; back off before retrying")]
    RateLimitExceeded,

    /// No measurements came back for the query.
    #[error("No measurements available for location {0}")]
    NoData(String),

    /// Measurements came back but do not cover the requested window.
    #[error("Incomplete window: expected {expected} daily records, assembled {received}")]
    IncompleteWindow {
        /// Number of days requested.
        expected: usize,
        /// Number of complete daily records assembled.
        received: usize,
    },
}
