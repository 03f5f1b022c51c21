//! Severity-tagged notifications for chat incoming webhooks.
//!
//! This crate posts logger-style messages (`INFO`, `WARNING`, `ERROR`) to a
//! Slack or Microsoft Teams incoming webhook. Each call formats one payload
//! for the target platform and performs one HTTP POST; failures are returned
//! to the caller and never retried.
//!
//! # Usage
//!
//! ```no_run
//! use notify::{Echo, Notifier, NotifierConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NotifierConfig::new("https://hooks.slack.com/services/T000/B000/XXXX")?
//!     .with_name("nightly-backup")
//!     .with_username("backup-bot");
//!
//! let notifier = Notifier::slack(config)?;
//!
//! notifier.info("backup started", Echo::None).await?;
//! notifier.error("disk full", "jane.doe@example.com").await?;
//! notifier.warning("retention exceeded", vec!["ops", "channel"]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! With the `blocking` feature (enabled by default), [`blocking::Notifier`]
//! offers the same operations on the calling thread.
//!
//! # Architecture
//!
//! - [`NotifyChannel`] decides the payload shape for one platform
//! - [`SlackChannel`] builds Block Kit payloads
//! - [`TeamsChannel`] builds Adaptive Card payloads
//! - [`Notifier`] owns the config and HTTP client and posts the payloads

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod channels;
pub mod config;
pub mod echo;
pub mod error;
pub mod message;

pub use channels::slack::SlackChannel;
pub use channels::teams::TeamsChannel;
pub use channels::NotifyChannel;
pub use config::NotifierConfig;
pub use echo::{Echo, Mention};
pub use error::{ConfigurationError, DeliveryError};
pub use message::{Chunk, Message, Severity};

use std::sync::Arc;
use tracing::{debug, error, warn};

/// Async webhook notifier.
///
/// Holds only immutable state, so a single notifier can be shared between
/// tasks; every call is an independent request.
#[derive(Clone)]
pub struct Notifier {
    channel: Arc<dyn NotifyChannel>,
    config: NotifierConfig,
    client: reqwest::Client,
}

impl Notifier {
    /// Create a notifier posting through the given channel.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Client`] if the HTTP client cannot be built.
    pub fn new(
        channel: Arc<dyn NotifyChannel>,
        config: NotifierConfig,
    ) -> Result<Self, ConfigurationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ConfigurationError::Client)?;

        debug!(
            channel = channel.name(),
            webhook = %config.redacted_url(),
            "Notifier initialized"
        );

        Ok(Self {
            channel,
            config,
            client,
        })
    }

    /// Create a notifier for a Slack incoming webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Client`] if the HTTP client cannot be built.
    pub fn slack(config: NotifierConfig) -> Result<Self, ConfigurationError> {
        Self::new(Arc::new(SlackChannel), config)
    }

    /// Create a notifier for a Microsoft Teams incoming webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Client`] if the HTTP client cannot be built.
    pub fn teams(config: NotifierConfig) -> Result<Self, ConfigurationError> {
        Self::new(Arc::new(TeamsChannel), config)
    }

    /// Get the name of the channel this notifier posts to.
    #[must_use]
    pub fn channel_name(&self) -> &'static str {
        self.channel.name()
    }

    #[must_use]
    pub const fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Build the payloads a message would be posted as, without sending.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Serialization`] if a payload cannot be encoded.
    pub fn payload_for(
        &self,
        message: &Message,
    ) -> Result<Vec<serde_json::Value>, DeliveryError> {
        build_payloads(self.channel.as_ref(), &self.config, message)
    }

    /// Send an info level message.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the webhook cannot be reached or rejects the message.
    pub async fn info(
        &self,
        text: impl Into<String>,
        echo: impl Into<Echo>,
    ) -> Result<(), DeliveryError> {
        self.notify(&Message::new(Severity::Info, text).with_echo(echo))
            .await
    }

    /// Send a warning level message.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the webhook cannot be reached or rejects the message.
    pub async fn warning(
        &self,
        text: impl Into<String>,
        echo: impl Into<Echo>,
    ) -> Result<(), DeliveryError> {
        self.notify(&Message::new(Severity::Warning, text).with_echo(echo))
            .await
    }

    /// Send an error level message.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the webhook cannot be reached or rejects the message.
    pub async fn error(
        &self,
        text: impl Into<String>,
        echo: impl Into<Echo>,
    ) -> Result<(), DeliveryError> {
        self.notify(&Message::new(Severity::Error, text).with_echo(echo))
            .await
    }

    /// Post a message and wait for the webhook to answer.
    ///
    /// A message with an empty body is skipped. When a chunk limit is set,
    /// the pieces are posted in order and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the webhook cannot be reached or rejects the message.
    pub async fn notify(&self, message: &Message) -> Result<(), DeliveryError> {
        let channel = self.channel.name();

        for payload in self.payload_for(message)? {
            debug!(channel, severity = %message.severity, "Sending notification");

            let response = self
                .client
                .post(self.config.webhook_url().clone())
                .json(&payload)
                .send()
                .await
                .map_err(|source| transport_error(channel, source))?;

            let status = response.status();
            if status.is_success() {
                debug!(channel, "Notification sent successfully");
            } else {
                let body = response.text().await.unwrap_or_default();
                return Err(status_error(channel, status, body));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("channel", &self.channel.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Format every payload for a message, or none for an empty body.
pub(crate) fn build_payloads(
    channel: &dyn NotifyChannel,
    config: &NotifierConfig,
    message: &Message,
) -> Result<Vec<serde_json::Value>, DeliveryError> {
    if message.text.is_empty() {
        warn!(channel = channel.name(), "No text provided, skipping notification");
        return Ok(vec![]);
    }

    message
        .chunks(config.chunk_limit())
        .into_iter()
        .map(|chunk| {
            channel
                .format_payload(config, message, chunk)
                .map_err(DeliveryError::from)
        })
        .collect()
}

pub(crate) fn transport_error(channel: &'static str, source: reqwest::Error) -> DeliveryError {
    // reqwest errors embed the request URL, which carries the webhook secret
    let source = source.without_url();
    error!(
        channel,
        timeout = source.is_timeout(),
        error = %source,
        "Failed to send notification"
    );
    DeliveryError::Transport { channel, source }
}

pub(crate) fn status_error(
    channel: &'static str,
    status: reqwest::StatusCode,
    body: String,
) -> DeliveryError {
    warn!(
        channel,
        status = %status,
        body = %body,
        "Webhook request failed"
    );
    DeliveryError::Status {
        channel,
        status,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> Notifier {
        let config = NotifierConfig::new("https://hooks.example/abc")
            .unwrap()
            .with_name("disk-monitor");
        Notifier::slack(config).unwrap()
    }

    #[test]
    fn test_channel_names() {
        let config = NotifierConfig::new("https://hooks.example/abc").unwrap();
        assert_eq!(Notifier::slack(config.clone()).unwrap().channel_name(), "slack");
        assert_eq!(Notifier::teams(config).unwrap().channel_name(), "teams");
    }

    #[test]
    fn test_error_payload_contains_body_and_mention() {
        let message = Message::new(Severity::Error, "disk full").with_echo("jane.doe");
        let payloads = notifier().payload_for(&message).unwrap();

        assert_eq!(payloads.len(), 1);
        let rendered = payloads[0].to_string();
        assert!(rendered.contains("disk full"));
        assert!(rendered.contains("@jane.doe"));
        assert!(rendered.contains("ERROR"));
    }

    #[test]
    fn test_empty_body_builds_nothing() {
        let message = Message::new(Severity::Info, "");
        assert!(notifier().payload_for(&message).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_limit_builds_one_payload_per_piece() {
        let config = NotifierConfig::new("https://hooks.example/abc")
            .unwrap()
            .with_chunk_limit(10)
            .unwrap();
        let notifier = Notifier::teams(config).unwrap();
        let message = Message::new(Severity::Warning, "x".repeat(25));
        assert_eq!(notifier.payload_for(&message).unwrap().len(), 3);
    }

    #[test]
    fn test_debug_hides_webhook_secret() {
        let config = NotifierConfig::new("https://hooks.slack.com/services/T0/B0/SECRET").unwrap();
        let debug = format!("{:?}", Notifier::slack(config).unwrap());
        assert!(debug.contains("slack"));
        assert!(!debug.contains("SECRET"));
    }
}
