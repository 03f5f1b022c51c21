//! Notifier configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::ConfigurationError;

/// Logical name used when none is given.
pub const DEFAULT_NAME: &str = env!("CARGO_PKG_NAME");

/// Immutable settings owned by one notifier.
#[derive(Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    webhook_url: Url,
    name: String,
    username: Option<String>,
    timeout: Option<Duration>,
    chunk_limit: Option<usize>,
}

impl NotifierConfig {
    /// Create a configuration for the given incoming-webhook URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the URL is empty, cannot be parsed,
    /// or is not an `http`/`https` URL.
    pub fn new(webhook_url: &str) -> Result<Self, ConfigurationError> {
        let trimmed = webhook_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::EmptyUrl);
        }

        let webhook_url =
            Url::parse(trimmed).map_err(|source| ConfigurationError::InvalidUrl { source })?;

        match webhook_url.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigurationError::UnsupportedScheme(other.to_string())),
        }

        Ok(Self {
            webhook_url,
            name: DEFAULT_NAME.to_string(),
            username: None,
            timeout: None,
            chunk_limit: None,
        })
    }

    /// Set the logical name printed as `[name]` in each message.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the display name shown as the message sender.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Abort requests that take longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Split bodies longer than `max_chars` characters into several posts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidChunkLimit`] for a limit of zero.
    pub fn with_chunk_limit(mut self, max_chars: usize) -> Result<Self, ConfigurationError> {
        if max_chars == 0 {
            return Err(ConfigurationError::InvalidChunkLimit);
        }
        self.chunk_limit = Some(max_chars);
        Ok(self)
    }

    #[must_use]
    pub const fn webhook_url(&self) -> &Url {
        &self.webhook_url
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured sender name, if one was set.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub const fn chunk_limit(&self) -> Option<usize> {
        self.chunk_limit
    }

    /// Webhook URL with the secret-bearing path and query removed.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        match self.webhook_url.host_str() {
            Some(host) => format!("{}://{host}/***", self.webhook_url.scheme()),
            None => format!("{}://***", self.webhook_url.scheme()),
        }
    }
}

impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("webhook_url", &self.redacted_url())
            .field("name", &self.name)
            .field("username", &self.username)
            .field("timeout", &self.timeout)
            .field("chunk_limit", &self.chunk_limit)
            .finish()
    }
}
