//! Error types for the Freshdesk client.

use thiserror::Error;

/// Errors that can occur when talking to the Freshdesk API.
#[derive(Debug, Error)]
pub enum HelpdeskError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Freshdesk returned {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// The response body is not the JSON we expected.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body decoded but its content cannot be used.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// A URL could not be built from the configured root.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl HelpdeskError {
    /// Whether this error came from the network or HTTP layer rather than
    /// from the body contents.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}
