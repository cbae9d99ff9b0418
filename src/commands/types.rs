//! Command types and reply structures.

use std::fmt;

use url::Url;

/// Available bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotCommand {
    /// Greet the user and offer the registration web app.
    Start,
}

impl BotCommand {
    /// Parses a command from a message text.
    ///
    /// Accepts `/start`, `/start@<bot_username>` and `/start <payload>`
    /// (the deep-link payload is ignored). A command addressed to another
    /// bot via `@name` is not ours and yields `None`.
    #[must_use]
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let text = text.trim();
        let after_slash = text.strip_prefix('/')?;

        let head = after_slash
            .split_once(char::is_whitespace)
            .map_or(after_slash, |(head, _payload)| head);

        let (cmd, mention) = match head.split_once('@') {
            Some((cmd, mention)) => (cmd, Some(mention)),
            None => (head, None),
        };

        if let (Some(mention), Some(ours)) = (mention, bot_username)
            && !mention.eq_ignore_ascii_case(ours)
        {
            return None;
        }

        match cmd.to_lowercase().as_str() {
            "start" => Some(Self::Start),
            _ => None,
        }
    }

    /// Returns the command name as typed after the slash.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
        }
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

/// An inbound chat message, as far as command handling cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Chat the message came from; replies go back here.
    pub chat_id: i64,

    /// Sender display name (may be empty).
    pub sender_name: String,

    /// Raw message text.
    pub text: String,
}

impl IncomingMessage {
    /// Creates a new incoming message.
    #[must_use]
    pub fn new(chat_id: i64, sender_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            sender_name: sender_name.into(),
            text: text.into(),
        }
    }
}

/// A button that opens a web app inside the Telegram client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlinkButton {
    pub label: String,
    pub url: Url,
}

/// A reply ready to be handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingReply {
    /// Message body.
    pub text: String,

    /// The single attached button.
    pub button: OutlinkButton,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start() {
        assert_eq!(BotCommand::parse("/start", None), Some(BotCommand::Start));
    }

    #[test]
    fn test_parse_start_with_payload() {
        assert_eq!(
            BotCommand::parse("/start ref_42", None),
            Some(BotCommand::Start)
        );
    }

    #[test]
    fn test_parse_start_addressed_to_us() {
        assert_eq!(
            BotCommand::parse("/start@RegBot", Some("regbot")),
            Some(BotCommand::Start)
        );
    }

    #[test]
    fn test_parse_start_addressed_to_other_bot() {
        assert_eq!(BotCommand::parse("/start@OtherBot", Some("RegBot")), None);
    }

    #[test]
    fn test_parse_mention_without_known_username() {
        assert_eq!(
            BotCommand::parse("/start@RegBot", None),
            Some(BotCommand::Start)
        );
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(BotCommand::parse("/START", None), Some(BotCommand::Start));
    }

    #[test]
    fn test_parse_with_extra_whitespace() {
        assert_eq!(BotCommand::parse("  /start  ", None), Some(BotCommand::Start));
    }

    #[test]
    fn test_parse_non_commands() {
        assert_eq!(BotCommand::parse("start", None), None);
        assert_eq!(BotCommand::parse("hello /start", None), None);
        assert_eq!(BotCommand::parse("/help", None), None);
        assert_eq!(BotCommand::parse("/starts", None), None);
        assert_eq!(BotCommand::parse("/", None), None);
        assert_eq!(BotCommand::parse("", None), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(BotCommand::Start.to_string(), "/start");
    }
}
