//! Microsoft Teams incoming-webhook channel.
//!
//! Messages are posted as Adaptive Cards. User mentions are rendered as
//! `<at>id</at>` tags backed by `msteams.entities`; Teams resolves them only
//! when the identifier matches a real account.

use serde::Serialize;

use super::NotifyChannel;
use crate::config::NotifierConfig;
use crate::echo::Mention;
use crate::message::{Chunk, Message, Severity};

/// Mention rendered for a channel-wide notification.
pub const TEAMS_BROADCAST: &str = "<at>channel</at>";

const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
const ADAPTIVE_CARD_VERSION: &str = "1.4";

/// Microsoft Teams webhook notification channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamsChannel;

impl TeamsChannel {
    /// Icon prefixed to the header line.
    const fn icon(severity: Severity) -> &'static str {
        match severity {
            Severity::Info => "\u{2139}\u{fe0f}",
            Severity::Warning => "\u{1f536}",
            Severity::Error => "\u{1f534}",
        }
    }

    /// Adaptive Card named color for the header.
    const fn card_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Info => "Accent",
            Severity::Warning => "Warning",
            Severity::Error => "Attention",
        }
    }

    fn entities(&self, message: &Message) -> Vec<TeamsEntity> {
        message
            .echo
            .mentions()
            .into_iter()
            .filter_map(|mention| match mention {
                Mention::User(id) => Some(TeamsEntity {
                    entity_type: "mention",
                    text: self.render_mention(mention),
                    mentioned: TeamsMentioned {
                        id: id.to_string(),
                        name: id.to_string(),
                    },
                }),
                Mention::Broadcast => None,
            })
            .collect()
    }

    fn build(
        &self,
        config: &NotifierConfig,
        message: &Message,
        chunk: Chunk<'_>,
    ) -> TeamsPayload {
        let severity = message.severity;

        // Continuation pieces carry only their text
        let (body, entities) = if chunk.is_first() {
            let mentions = self.render_mentions(message);
            let header = format!(
                "{} {}",
                Self::icon(severity),
                message.header(config.name(), &mentions)
            );
            let body = vec![
                TextBlock::new(header)
                    .weight("Bolder")
                    .color(Self::card_color(severity)),
                TextBlock::new(self.username(config))
                    .subtle()
                    .spacing("None"),
                TextBlock::new(chunk.text),
            ];
            (body, self.entities(message))
        } else {
            (vec![TextBlock::new(chunk.text)], vec![])
        };

        TeamsPayload {
            message_type: "message",
            attachments: vec![TeamsAttachment {
                content_type: ADAPTIVE_CARD_CONTENT_TYPE,
                content_url: None,
                content: AdaptiveCard {
                    schema: ADAPTIVE_CARD_SCHEMA,
                    card_type: "AdaptiveCard",
                    version: ADAPTIVE_CARD_VERSION,
                    body,
                    msteams: TeamsCardProperties {
                        width: "Full",
                        entities,
                    },
                },
            }],
        }
    }
}

impl NotifyChannel for TeamsChannel {
    fn name(&self) -> &'static str {
        "teams"
    }

    fn default_username(&self) -> &'static str {
        "teams-notifier"
    }

    fn render_mention(&self, mention: Mention<'_>) -> String {
        match mention {
            Mention::User(id) => format!("<at>{id}</at>"),
            Mention::Broadcast => TEAMS_BROADCAST.to_string(),
        }
    }

    fn format_payload(
        &self,
        config: &NotifierConfig,
        message: &Message,
        chunk: Chunk<'_>,
    ) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self.build(config, message, chunk))
    }
}

// =============================================================================
// Teams API types (Adaptive Cards)
// =============================================================================

#[derive(Debug, Serialize)]
struct TeamsPayload {
    #[serde(rename = "type")]
    message_type: &'static str,
    attachments: Vec<TeamsAttachment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamsAttachment {
    content_type: &'static str,
    /// Always null for inline cards, but required by the webhook
    content_url: Option<String>,
    content: AdaptiveCard,
}

#[derive(Debug, Serialize)]
struct AdaptiveCard {
    #[serde(rename = "$schema")]
    schema: &'static str,
    #[serde(rename = "type")]
    card_type: &'static str,
    version: &'static str,
    body: Vec<TextBlock>,
    msteams: TeamsCardProperties,
}

#[derive(Debug, Serialize)]
struct TeamsCardProperties {
    width: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entities: Vec<TeamsEntity>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextBlock {
    #[serde(rename = "type")]
    block_type: &'static str,
    text: String,
    wrap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spacing: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_subtle: bool,
}

impl TextBlock {
    fn new(text: impl Into<String>) -> Self {
        Self {
            block_type: "TextBlock",
            text: text.into(),
            wrap: true,
            weight: None,
            color: None,
            spacing: None,
            is_subtle: false,
        }
    }

    fn weight(mut self, weight: &'static str) -> Self {
        self.weight = Some(weight);
        self
    }

    fn color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }

    fn spacing(mut self, spacing: &'static str) -> Self {
        self.spacing = Some(spacing);
        self
    }

    fn subtle(mut self) -> Self {
        self.is_subtle = true;
        self
    }
}

#[derive(Debug, Serialize)]
struct TeamsEntity {
    #[serde(rename = "type")]
    entity_type: &'static str,
    text: String,
    mentioned: TeamsMentioned,
}

#[derive(Debug, Serialize)]
struct TeamsMentioned {
    id: String,
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::echo::Echo;
    use chrono::{TimeZone, Utc};

    fn config() -> NotifierConfig {
        NotifierConfig::new("https://example.webhook.office.com/webhookb2/abc")
            .unwrap()
            .with_name("disk-monitor")
    }

    fn message(severity: Severity, text: &str, echo: impl Into<Echo>) -> Message {
        Message::new(severity, text)
            .with_echo(echo)
            .with_timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap())
    }

    fn payload(message: &Message) -> serde_json::Value {
        let chunk = message.chunks(None)[0];
        TeamsChannel.format_payload(&config(), message, chunk).unwrap()
    }

    fn card(payload: &serde_json::Value) -> &serde_json::Value {
        &payload["attachments"][0]["content"]
    }

    #[test]
    fn test_teams_payload_format() {
        let message = message(Severity::Error, "disk full", "jane.doe@corp.io");
        let payload = payload(&message);

        assert_eq!(payload["type"], "message");
        assert_eq!(
            payload["attachments"][0]["contentType"],
            ADAPTIVE_CARD_CONTENT_TYPE
        );
        assert!(payload["attachments"][0]["contentUrl"].is_null());

        let card = card(&payload);
        assert_eq!(card["type"], "AdaptiveCard");
        assert_eq!(card["version"], "1.4");
        assert_eq!(card["$schema"], ADAPTIVE_CARD_SCHEMA);
        assert_eq!(
            card["body"][0]["text"],
            "\u{1f534} <at>jane.doe</at> 2024-03-01 12:30:05 UTC [disk-monitor] ERROR:"
        );
        assert_eq!(card["body"][0]["color"], "Attention");
        assert_eq!(card["body"][1]["text"], "teams-notifier");
        assert_eq!(card["body"][1]["isSubtle"], true);
        assert_eq!(card["body"][2]["text"], "disk full");

        let entity = &card["msteams"]["entities"][0];
        assert_eq!(entity["type"], "mention");
        assert_eq!(entity["text"], "<at>jane.doe</at>");
        assert_eq!(entity["mentioned"]["id"], "jane.doe");
    }

    #[test]
    fn test_severity_colors() {
        for (severity, color) in [
            (Severity::Info, "Accent"),
            (Severity::Warning, "Warning"),
            (Severity::Error, "Attention"),
        ] {
            let payload = payload(&message(severity, "text", Echo::None));
            let header = card(&payload)["body"][0].clone();
            assert_eq!(header["color"], color);
            assert!(header["text"]
                .as_str()
                .unwrap()
                .ends_with(&format!("{}:", severity.as_str())));
        }
    }

    #[test]
    fn test_no_echo_has_no_mention() {
        let payload = payload(&message(Severity::Info, "hello", Echo::None));
        assert!(!payload.to_string().contains("<at>"));
        assert!(card(&payload)["msteams"].get("entities").is_none());
    }

    #[test]
    fn test_broadcast_appears_once() {
        let payload = payload(&message(Severity::Warning, "hello", "channel"));
        assert_eq!(payload.to_string().matches(TEAMS_BROADCAST).count(), 1);
    }

    #[test]
    fn test_many_mentions_in_order() {
        let payload = payload(&message(Severity::Info, "hello", vec!["zoe", "adam"]));
        let card = card(&payload);
        let header = card["body"][0]["text"].as_str().unwrap();
        assert!(header.contains("<at>zoe</at> <at>adam</at>"));

        let entities = card["msteams"]["entities"].as_array().unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0]["mentioned"]["name"], "zoe");
        assert_eq!(entities[1]["mentioned"]["name"], "adam");
    }

    #[test]
    fn test_continuation_chunk_is_plain_text() {
        let message = message(Severity::Error, "abcdef", "jane");
        let chunks = message.chunks(Some(4));
        let payload = TeamsChannel
            .format_payload(&config(), &message, chunks[1])
            .unwrap();
        let body = card(&payload)["body"].as_array().unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["text"], "ef");
        assert!(!payload.to_string().contains("<at>"));
    }
}
