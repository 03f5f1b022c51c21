//! Mention directives ("echo") attached to a message.
//!
//! Identifiers are best-effort: no user lookup is performed. An email address
//! is reduced to its local-part, a leading `@` is dropped, and identifiers that
//! end up empty are ignored.

/// Identifier that notifies everyone in the channel.
pub const BROADCAST_TOKEN: &str = "channel";

/// Who to mention when posting a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Echo {
    /// No mentions
    #[default]
    None,
    /// A single user identifier
    Single(String),
    /// Several user identifiers, rendered in order
    Many(Vec<String>),
    /// Notify everyone in the channel
    Broadcast,
}

/// A normalised mention, ready to be rendered by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mention<'a> {
    /// Mention one user by identifier
    User(&'a str),
    /// Notify everyone in the channel
    Broadcast,
}

impl Echo {
    /// Check whether this echo renders no mention at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mentions().is_empty()
    }

    /// Normalised mentions in input order.
    #[must_use]
    pub fn mentions(&self) -> Vec<Mention<'_>> {
        match self {
            Self::None => vec![],
            Self::Single(id) => normalize(id).into_iter().collect(),
            Self::Many(ids) => ids.iter().filter_map(|id| normalize(id)).collect(),
            Self::Broadcast => vec![Mention::Broadcast],
        }
    }
}

fn normalize(raw: &str) -> Option<Mention<'_>> {
    let id = raw.trim();
    let id = id.strip_prefix('@').unwrap_or(id);
    let id = id.split_once('@').map_or(id, |(local, _domain)| local).trim();

    if id.is_empty() {
        None
    } else if id.eq_ignore_ascii_case(BROADCAST_TOKEN) {
        Some(Mention::Broadcast)
    } else {
        Some(Mention::User(id))
    }
}

impl From<&str> for Echo {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::None
        } else if trimmed.eq_ignore_ascii_case(BROADCAST_TOKEN) {
            Self::Broadcast
        } else {
            Self::Single(trimmed.to_string())
        }
    }
}

impl From<String> for Echo {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&String> for Echo {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Vec<String>> for Echo {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

impl From<Vec<&str>> for Echo {
    fn from(value: Vec<&str>) -> Self {
        Self::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Echo {
    fn from(value: &[&str]) -> Self {
        Self::Many(value.iter().map(|id| (*id).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Echo {
    fn from(value: [&str; N]) -> Self {
        Self::Many(value.iter().map(|id| (*id).to_string()).collect())
    }
}

impl<T: Into<Echo>> From<Option<T>> for Echo {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_no_mentions() {
        assert!(Echo::None.is_empty());
        assert!(Echo::from(None::<&str>).is_empty());
    }

    #[test]
    fn test_empty_string_is_noop() {
        assert_eq!(Echo::from(""), Echo::None);
        assert_eq!(Echo::from("   "), Echo::None);
        assert!(Echo::Single(String::new()).is_empty());
    }

    #[test]
    fn test_channel_token_is_broadcast() {
        assert_eq!(Echo::from("channel"), Echo::Broadcast);
        assert_eq!(Echo::Broadcast.mentions(), vec![Mention::Broadcast]);
    }

    #[test]
    fn test_email_reduced_to_local_part() {
        let echo = Echo::from("jane.doe@example.com");
        assert_eq!(echo.mentions(), vec![Mention::User("jane.doe")]);

        let echo = Echo::from("@john");
        assert_eq!(echo.mentions(), vec![Mention::User("john")]);
    }

    #[test]
    fn test_many_keeps_order_and_skips_blanks() {
        let echo = Echo::from(vec!["zoe", "", "adam@corp.io", "channel"]);
        assert_eq!(
            echo.mentions(),
            vec![
                Mention::User("zoe"),
                Mention::User("adam"),
                Mention::Broadcast
            ]
        );
    }

    #[test]
    fn test_array_and_option_conversions() {
        assert_eq!(
            Echo::from(["a", "b"]),
            Echo::Many(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            Echo::from(Some("jane")),
            Echo::Single("jane".to_string())
        );
    }
}
