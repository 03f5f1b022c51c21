//! Error types for the notification system.

use thiserror::Error;

/// Errors raised while building a notifier.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No webhook URL was supplied
    #[error("webhook URL is empty")]
    EmptyUrl,

    /// The webhook URL could not be parsed
    #[error("invalid webhook URL: {source}")]
    InvalidUrl {
        #[source]
        source: url::ParseError,
    },

    /// The webhook URL is not an HTTP(S) endpoint
    #[error("unsupported webhook URL scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),

    /// A chunk limit of zero characters
    #[error("chunk limit must be at least one character")]
    InvalidChunkLimit,

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors raised while posting a message to a webhook.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request never produced a response (connect failure, timeout, ...)
    #[error("{channel} webhook request failed: {source}")]
    Transport {
        channel: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The webhook answered with a non-success status
    #[error("{channel} returned {status}: {body}")]
    Status {
        channel: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeliveryError {
    /// Whether the request was abandoned because the timeout elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_timeout(),
            Self::Status { .. } | Self::Serialization(_) => false,
        }
    }

    /// HTTP status returned by the webhook, if any.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Transport { source, .. } => source.status(),
            Self::Status { status, .. } => Some(*status),
            Self::Serialization(_) => None,
        }
    }
}
