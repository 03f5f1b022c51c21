//! Blocking notifier for callers without an async runtime.
//!
//! Payloads are identical to the async [`crate::Notifier`]; only the HTTP
//! client differs. Do not call these methods from inside an async context,
//! use `spawn_blocking` there.

use std::sync::Arc;

use tracing::debug;

use crate::{
    build_payloads, status_error, transport_error, ConfigurationError, DeliveryError, Echo,
    Message, NotifierConfig, NotifyChannel, Severity, SlackChannel, TeamsChannel,
};

/// Blocking webhook notifier.
#[derive(Clone)]
pub struct Notifier {
    channel: Arc<dyn NotifyChannel>,
    config: NotifierConfig,
    client: reqwest::blocking::Client,
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
        // The blocking client defaults to a 30s timeout; `None` turns it off
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ConfigurationError::Client)?;

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

    #[must_use]
    pub fn channel_name(&self) -> &'static str {
        self.channel.name()
    }

    #[must_use]
    pub const fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Send an info level message.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the webhook cannot be reached or rejects the message.
    pub fn info(
        &self,
        text: impl Into<String>,
        echo: impl Into<Echo>,
    ) -> Result<(), DeliveryError> {
        self.notify(&Message::new(Severity::Info, text).with_echo(echo))
    }

    /// Send a warning level message.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the webhook cannot be reached or rejects the message.
    pub fn warning(
        &self,
        text: impl Into<String>,
        echo: impl Into<Echo>,
    ) -> Result<(), DeliveryError> {
        self.notify(&Message::new(Severity::Warning, text).with_echo(echo))
    }

    /// Send an error level message.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the webhook cannot be reached or rejects the message.
    pub fn error(
        &self,
        text: impl Into<String>,
        echo: impl Into<Echo>,
    ) -> Result<(), DeliveryError> {
        self.notify(&Message::new(Severity::Error, text).with_echo(echo))
    }

    /// Post a message, blocking until the webhook answers.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the webhook cannot be reached or rejects the message.
    pub fn notify(&self, message: &Message) -> Result<(), DeliveryError> {
        let channel = self.channel.name();

        for payload in build_payloads(self.channel.as_ref(), &self.config, message)? {
            debug!(channel, severity = %message.severity, "Sending notification");

            let response = self
                .client
                .post(self.config.webhook_url().clone())
                .json(&payload)
                .send()
                .map_err(|source| transport_error(channel, source))?;

            let status = response.status();
            if status.is_success() {
                debug!(channel, "Notification sent successfully");
            } else {
                let body = response.text().unwrap_or_default();
                return Err(status_error(channel, status, body));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::Notifier")
            .field("channel", &self.channel.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
