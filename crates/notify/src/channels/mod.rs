//! Notification channel implementations.

pub mod slack;
pub mod teams;

use crate::config::NotifierConfig;
use crate::echo::Mention;
use crate::message::{Chunk, Message};

/// Trait for notification channels (Slack, Teams).
///
/// Channels only decide what a webhook payload looks like; posting it is
/// shared by the notifiers.
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Sender name used when the config does not set one.
    fn default_username(&self) -> &'static str;

    /// Render one mention in the platform's syntax.
    fn render_mention(&self, mention: Mention<'_>) -> String;

    /// Build the JSON body for one chunk of a message.
    fn format_payload(
        &self,
        config: &NotifierConfig,
        message: &Message,
        chunk: Chunk<'_>,
    ) -> Result<serde_json::Value, serde_json::Error>;

    /// Render every mention of a message, space separated, in input order.
    fn render_mentions(&self, message: &Message) -> String {
        message
            .echo
            .mentions()
            .into_iter()
            .map(|mention| self.render_mention(mention))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Sender name for this channel.
    fn username<'a>(&self, config: &'a NotifierConfig) -> &'a str {
        config.username().unwrap_or_else(|| self.default_username())
    }
}
