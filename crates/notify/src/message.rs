//! Message and severity types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::echo::Echo;

/// Severity levels for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational - normal operations
    Info,
    /// Warning - something needs attention
    Warning,
    /// Error - something failed
    Error,
}

impl Severity {
    /// Get the accent color for this severity.
    #[must_use]
    pub const fn color(&self) -> u32 {
        match self {
            Self::Info => 0x0034_98db,    // Blue
            Self::Warning => 0x00f3_9c12, // Amber
            Self::Error => 0x00e7_4c3c,   // Red
        }
    }

    /// Get the label printed in message headers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single notification, built per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Severity controlling the cosmetic formatting
    pub severity: Severity,
    /// Free-text body, sent verbatim
    pub text: String,
    /// Mentions to append to the header
    pub echo: Echo,
    /// Timestamp printed in the header
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time and no mentions.
    #[must_use]
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            echo: Echo::None,
            timestamp: Utc::now(),
        }
    }

    /// Set the mentions for this message.
    #[must_use]
    pub fn with_echo(mut self, echo: impl Into<Echo>) -> Self {
        self.echo = echo.into();
        self
    }

    /// Override the header timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Header line shared by every platform, without the leading icon.
    #[must_use]
    pub fn header(&self, name: &str, mentions: &str) -> String {
        let timestamp = self.timestamp.format("%Y-%m-%d %H:%M:%S UTC");
        let level = self.severity.as_str();
        if mentions.is_empty() {
            format!("{timestamp} [{name}] {level}:")
        } else {
            format!("{mentions} {timestamp} [{name}] {level}:")
        }
    }

    /// Split the body into the pieces that will be posted.
    ///
    /// With no limit the whole body is a single chunk.
    pub(crate) fn chunks(&self, limit: Option<usize>) -> Vec<Chunk<'_>> {
        let pieces = match limit {
            Some(max_chars) => split_into_chunks(&self.text, max_chars),
            None => vec![self.text.as_str()],
        };
        let total = pieces.len();

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk { index, total, text })
            .collect()
    }
}

/// One piece of a (possibly split) message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Zero-based position of this piece
    pub index: usize,
    /// Number of pieces the body was split into
    pub total: usize,
    /// Text of this piece
    pub text: &'a str,
}

impl Chunk<'_> {
    /// Only the first piece carries the header, icon and mentions.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.index == 0
    }
}

/// Split text into pieces of at most `max_chars` characters.
fn split_into_chunks(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = vec![];
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap()
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::Info.as_str(), "INFO");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Error.as_str(), "ERROR");
        assert_eq!(Severity::Error.color(), 0x00e7_4c3c);
    }

    #[test]
    fn test_severity_deserializes_lowercase() {
        let severity: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(severity, Severity::Warning);
    }

    #[test]
    fn test_header_without_mentions() {
        let message = Message::new(Severity::Info, "hello").with_timestamp(fixed_time());
        assert_eq!(
            message.header("backup", ""),
            "2024-03-01 12:30:05 UTC [backup] INFO:"
        );
    }

    #[test]
    fn test_header_with_mentions() {
        let message = Message::new(Severity::Error, "hello").with_timestamp(fixed_time());
        assert_eq!(
            message.header("backup", "@jane.doe"),
            "@jane.doe 2024-03-01 12:30:05 UTC [backup] ERROR:"
        );
    }

    #[test]
    fn test_no_limit_is_single_chunk() {
        let message = Message::new(Severity::Info, "a".repeat(5000));
        let chunks = message.chunks(None);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_first());
        assert_eq!(chunks[0].text.len(), 5000);
    }

    #[test]
    fn test_split_respects_limit() {
        let message = Message::new(Severity::Info, "abcdefg");
        let chunks = message.chunks(Some(3));
        let texts: Vec<&str> = chunks.iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["abc", "def", "g"]);
        assert!(chunks.iter().all(|c| c.total == 3));
        assert!(!chunks[1].is_first());
    }

    #[test]
    fn test_split_on_char_boundaries() {
        assert_eq!(split_into_chunks("ééé", 2), vec!["éé", "é"]);
        assert_eq!(split_into_chunks("🔴🔴", 1), vec!["🔴", "🔴"]);
    }

    #[test]
    fn test_split_exact_multiple() {
        assert_eq!(split_into_chunks("abcd", 2), vec!["ab", "cd"]);
        assert!(split_into_chunks("", 2).is_empty());
    }
}
