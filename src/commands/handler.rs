//! Command dispatcher implementation.

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use super::types::{BotCommand, IncomingMessage, OutgoingReply, OutlinkButton};
use crate::config::MessageTemplates;

/// Outbound side of the transport: delivers a reply to a chat.
#[async_trait]
pub trait ReplySender: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends `reply` to `chat_id`.
    async fn send_reply(&self, chat_id: i64, reply: &OutgoingReply) -> Result<(), Self::Error>;
}

/// Turns inbound messages into replies.
///
/// Holds only read-only configuration, so one instance can serve every
/// update concurrently.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    /// Web app opened by the registration button.
    webapp_url: Url,

    /// Reply wording.
    templates: MessageTemplates,

    /// Our own username, used to ignore commands meant for other bots.
    bot_username: Option<String>,
}

impl CommandDispatcher {
    /// Creates a new command dispatcher.
    #[must_use]
    pub fn new(webapp_url: Url, templates: MessageTemplates) -> Self {
        Self {
            webapp_url,
            templates,
            bot_username: None,
        }
    }

    /// Sets the bot username used to filter `/cmd@name` mentions.
    #[must_use]
    pub fn with_bot_username(mut self, username: Option<String>) -> Self {
        self.bot_username = username;
        self
    }

    /// Builds the reply for a message, if it carries a known command.
    ///
    /// Returns `None` for plain text and unknown commands.
    #[must_use]
    pub fn dispatch(&self, message: &IncomingMessage) -> Option<OutgoingReply> {
        let command = BotCommand::parse(&message.text, self.bot_username.as_deref())?;

        debug!("Dispatching {} for chat {}", command, message.chat_id);
        let reply = match command {
            BotCommand::Start => self.start_reply(message),
        };

        Some(reply)
    }

    /// Dispatches a message and sends the reply, if any, through `sender`.
    ///
    /// Returns whether a reply was sent. Send failures are returned as-is.
    pub async fn handle<S>(&self, sender: &S, message: &IncomingMessage) -> Result<bool, S::Error>
    where
        S: ReplySender + ?Sized,
    {
        let Some(reply) = self.dispatch(message) else {
            return Ok(false);
        };

        sender.send_reply(message.chat_id, &reply).await?;
        info!("Sent registration button to chat {}", message.chat_id);

        Ok(true)
    }

    fn start_reply(&self, message: &IncomingMessage) -> OutgoingReply {
        OutgoingReply {
            text: self.templates.render_greeting(&message.sender_name),
            button: OutlinkButton {
                label: self.templates.button_label.clone(),
                url: self.webapp_url.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    const WEBAPP: &str = "https://example.org/registration.html";

    #[derive(Debug, thiserror::Error)]
    #[error("chat unreachable")]
    struct Unreachable;

    /// Fake transport that records every reply.
    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(i64, OutgoingReply)>>,
        fail: bool,
    }

    impl RecordingSender {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn sent(&self) -> Vec<(i64, OutgoingReply)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReplySender for RecordingSender {
        type Error = Unreachable;

        async fn send_reply(&self, chat_id: i64, reply: &OutgoingReply) -> Result<(), Unreachable> {
            self.sent.lock().unwrap().push((chat_id, reply.clone()));
            if self.fail { Err(Unreachable) } else { Ok(()) }
        }
    }

    fn dispatcher() -> CommandDispatcher {
        CommandDispatcher::new(Url::parse(WEBAPP).unwrap(), MessageTemplates::default())
    }

    #[test]
    fn test_start_reply_for_named_sender() {
        let reply = dispatcher()
            .dispatch(&IncomingMessage::new(1, "Ana", "/start"))
            .unwrap();

        assert!(reply.text.contains("Ana"));
        assert_eq!(reply.button.label, "Complete registration");
        assert_eq!(reply.button.url.as_str(), WEBAPP);
    }

    #[test]
    fn test_start_reply_for_anonymous_sender() {
        let reply = dispatcher()
            .dispatch(&IncomingMessage::new(1, "", "/start"))
            .unwrap();

        assert!(!reply.text.is_empty());
        assert!(reply.text.contains("there"));
        assert!(!reply.text.contains("{name}"));
        assert_eq!(reply.button.url.as_str(), WEBAPP);
    }

    #[test]
    fn test_no_reply_for_other_messages() {
        let dispatcher = dispatcher().with_bot_username(Some("RegBot".to_owned()));
        for text in ["/help", "hello", "", "/start@SomeoneElse"] {
            assert!(
                dispatcher.dispatch(&IncomingMessage::new(1, "Ana", text)).is_none(),
                "{text:?} should not be answered"
            );
        }
    }

    #[test]
    fn test_repeated_start_gives_identical_replies() {
        let dispatcher = dispatcher();
        let message = IncomingMessage::new(7, "Ana", "/start");

        let first = dispatcher.dispatch(&message);
        let second = dispatcher.dispatch(&message);

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_templates() {
        let templates = MessageTemplates {
            greeting: "Привет, {name}! 👋".to_owned(),
            fallback_name: "друг".to_owned(),
            button_label: "📝 Пройти регистрацию".to_owned(),
        };
        let dispatcher = CommandDispatcher::new(Url::parse(WEBAPP).unwrap(), templates);

        let reply = dispatcher
            .dispatch(&IncomingMessage::new(1, "Юсуф", "/start"))
            .unwrap();
        assert_eq!(reply.text, "Привет, Юсуф! 👋");
        assert_eq!(reply.button.label, "📝 Пройти регистрацию");
    }

    #[tokio::test]
    async fn test_handle_sends_one_reply_to_origin_chat() {
        let sender = RecordingSender::default();
        let sent = dispatcher()
            .handle(&sender, &IncomingMessage::new(42, "Ana", "/start"))
            .await
            .unwrap();

        assert!(sent);
        let replies = sender.sent();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].0, 42);
        assert!(replies[0].1.text.contains("Ana"));
    }

    #[tokio::test]
    async fn test_handle_ignores_non_commands() {
        let sender = RecordingSender::default();
        let sent = dispatcher()
            .handle(&sender, &IncomingMessage::new(42, "Ana", "just chatting"))
            .await
            .unwrap();

        assert!(!sent);
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_handle_surfaces_send_failure_without_retry() {
        let sender = RecordingSender::failing();
        let result = dispatcher()
            .handle(&sender, &IncomingMessage::new(42, "Ana", "/start"))
            .await;

        assert!(matches!(result, Err(Unreachable)));
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_twice_sends_two_replies() {
        let sender = RecordingSender::default();
        let dispatcher = dispatcher();
        let message = IncomingMessage::new(42, "Ana", "/start");

        dispatcher.handle(&sender, &message).await.unwrap();
        dispatcher.handle(&sender, &message).await.unwrap();

        let replies = sender.sent();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0], replies[1]);
    }
}
