//! Long-polling update loop.
//!
//! Each message update is converted to an [`IncomingMessage`] and handed to
//! the [`CommandDispatcher`]. Errors from the send are logged by the
//! dispatcher's error handler and the loop moves on to the next update.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tracing::{info, trace};

use super::{TelegramBot, TelegramError};
use crate::commands::{CommandDispatcher, IncomingMessage};

/// Runs the polling loop until Ctrl+C.
pub async fn run(bot: Arc<TelegramBot>, commands: Arc<CommandDispatcher>, drop_pending_updates: bool) {
    let handler = Update::filter_message().endpoint(handle_message);

    let mut polling = Polling::builder(bot.inner().clone());
    if drop_pending_updates {
        info!("Dropping updates received while offline");
        polling = polling.drop_pending_updates();
    }
    let listener = polling.build();

    let mut dispatcher = Dispatcher::builder(bot.inner().clone(), handler)
        .dependencies(dptree::deps![Arc::clone(&bot), commands])
        .default_handler(|update| async move {
            trace!("Ignoring update {:?}", update.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Failed to handle message",
        ))
        .enable_ctrlc_handler()
        .build();

    info!("Polling for updates...");
    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;
    info!("Polling stopped");
}

async fn handle_message(
    msg: Message,
    bot: Arc<TelegramBot>,
    commands: Arc<CommandDispatcher>,
) -> Result<(), TelegramError> {
    let Some(incoming) = incoming_from(&msg) else {
        return Ok(());
    };

    commands.handle(bot.as_ref(), &incoming).await?;
    Ok(())
}

/// Extracts the parts of a message the dispatcher needs.
///
/// Returns `None` for messages without text (stickers, photos, ...).
fn incoming_from(msg: &Message) -> Option<IncomingMessage> {
    let text = msg.text()?;
    let sender_name = msg
        .from
        .as_ref()
        .map(|user| user.first_name.clone())
        .unwrap_or_default();

    Some(IncomingMessage::new(msg.chat.id.0, sender_name, text))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message(value: serde_json::Value) -> Message {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_incoming_from_text_message() {
        let msg = message(json!({
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": { "id": 42, "type": "private", "first_name": "Ana" },
            "from": { "id": 42, "is_bot": false, "first_name": "Ana" },
            "text": "/start"
        }));

        let incoming = incoming_from(&msg).unwrap();
        assert_eq!(incoming, IncomingMessage::new(42, "Ana", "/start"));
    }

    #[test]
    fn test_incoming_from_message_without_sender() {
        let msg = message(json!({
            "message_id": 2,
            "date": 1_700_000_000,
            "chat": { "id": -1_001_234_567_890_i64, "type": "channel", "title": "News" },
            "text": "/start"
        }));

        let incoming = incoming_from(&msg).unwrap();
        assert_eq!(incoming.chat_id, -1_001_234_567_890);
        assert!(incoming.sender_name.is_empty());
    }

    #[test]
    fn test_incoming_from_ignores_non_text() {
        let msg = message(json!({
            "message_id": 3,
            "date": 1_700_000_000,
            "chat": { "id": 42, "type": "private", "first_name": "Ana" },
            "from": { "id": 42, "is_bot": false, "first_name": "Ana" },
            "location": { "latitude": 42.87, "longitude": 74.59 }
        }));

        assert!(incoming_from(&msg).is_none());
    }

    #[test]
    fn test_anonymous_sender_gets_fallback_greeting() {
        let msg = message(json!({
            "message_id": 4,
            "date": 1_700_000_000,
            "chat": { "id": -100_500, "type": "channel", "title": "News" },
            "text": "/start"
        }));
        let commands = CommandDispatcher::new(
            url::Url::parse("https://example.org/registration.html").unwrap(),
            crate::config::MessageTemplates::default(),
        );

        let reply = commands.dispatch(&incoming_from(&msg).unwrap()).unwrap();
        assert!(reply.text.contains("there"));
    }
}
