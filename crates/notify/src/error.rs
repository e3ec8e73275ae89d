//! Error types for the notification channels.

use thiserror::Error;

/// Errors that can occur when publishing a message.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook answered with a non-success status
    #[error("Webhook returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Writing to the console failed
    #[error("Console write failed: {0}")]
    Io(#[from] std::io::Error),
}
