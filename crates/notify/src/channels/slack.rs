//! Slack incoming-webhook channel.

use serde::Serialize;

use super::NotifyChannel;
use crate::config::NotifierConfig;
use crate::echo::Mention;
use crate::message::{Chunk, Message, Severity};

/// Slack's reserved mention that notifies every channel member.
pub const SLACK_BROADCAST: &str = "<!channel>";

/// Slack webhook notification channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlackChannel;

impl SlackChannel {
    /// Icon prefixed to the header line.
    const fn text_icon(severity: Severity) -> &'static str {
        match severity {
            Severity::Info => ":large_blue_circle:",
            Severity::Warning => ":large_yellow_circle:",
            Severity::Error => ":red_circle:",
        }
    }

    /// Avatar emoji shown next to the sender name.
    const fn icon_emoji(severity: Severity) -> &'static str {
        match severity {
            Severity::Info => ":information_source:",
            Severity::Warning => ":warning:",
            Severity::Error => ":red_circle:",
        }
    }

    fn build(
        config: &NotifierConfig,
        username: &str,
        mentions: &str,
        message: &Message,
        chunk: Chunk<'_>,
    ) -> SlackPayload {
        let severity = message.severity;

        // Continuation pieces carry only their text
        let block_text = if chunk.is_first() {
            format!(
                "{} {}\n{}",
                Self::text_icon(severity),
                message.header(config.name(), mentions),
                chunk.text
            )
        } else {
            chunk.text.to_string()
        };

        let first_line = chunk.text.lines().next().unwrap_or_default();

        SlackPayload {
            username: username.to_string(),
            icon_emoji: Self::icon_emoji(severity),
            text: format!("{} [{}]: {first_line}", severity.as_str(), config.name()),
            blocks: vec![SlackBlock::Section {
                text: SlackText::mrkdwn(block_text),
            }],
            attachments: vec![SlackAttachment {
                color: format!("#{:06x}", severity.color()),
            }],
        }
    }
}

impl NotifyChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn default_username(&self) -> &'static str {
        "slack-notifier"
    }

    fn render_mention(&self, mention: Mention<'_>) -> String {
        match mention {
            Mention::User(id) => format!("@{id}"),
            Mention::Broadcast => SLACK_BROADCAST.to_string(),
        }
    }

    fn format_payload(
        &self,
        config: &NotifierConfig,
        message: &Message,
        chunk: Chunk<'_>,
    ) -> Result<serde_json::Value, serde_json::Error> {
        let mentions = self.render_mentions(message);
        let payload = Self::build(config, self.username(config), &mentions, message, chunk);
        serde_json::to_value(payload)
    }
}

// =============================================================================
// Slack API types (Block Kit)
// =============================================================================

#[derive(Debug, Serialize)]
struct SlackPayload {
    /// Sender name override
    username: String,
    /// Sender avatar override
    icon_emoji: &'static str,
    /// Fallback text for notifications
    text: String,
    /// Block Kit blocks
    blocks: Vec<SlackBlock>,
    /// Attachments (for color strip)
    attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SlackBlock {
    /// Section block with text
    Section { text: SlackText },
}

#[derive(Debug, Serialize)]
struct SlackText {
    #[serde(rename = "type")]
    text_type: &'static str,
    text: String,
}

impl SlackText {
    fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            text_type: "mrkdwn",
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SlackAttachment {
    /// Hex color for the attachment strip
    color: String,
}
