//! Telegram Bot API client wrapper.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, WebAppInfo};
use teloxide::{ApiError, RequestError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::commands::{OutgoingReply, ReplySender};
use crate::config::TelegramConfig;

/// Errors that can occur during Telegram operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Bot token was rejected by Telegram")]
    Unauthorized,

    #[error("Message could not be delivered: {0}")]
    Delivery(String),

    #[error("Rate limited, retry after {0} seconds")]
    RetryAfter(u32),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),
}

impl From<RequestError> for TelegramError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Api(ApiError::InvalidToken) => Self::Unauthorized,
            RequestError::Api(
                api @ (ApiError::BotBlocked
                | ApiError::BotKicked
                | ApiError::ChatNotFound
                | ApiError::UserDeactivated),
            ) => Self::Delivery(api.to_string()),
            RequestError::RetryAfter(secs) => Self::RetryAfter(secs.seconds()),
            RequestError::Network(e) => Self::Network(e.to_string()),
            other => Self::Api(other.to_string()),
        }
    }
}

/// High-level Telegram client wrapper.
#[derive(Clone)]
pub struct TelegramBot {
    /// The underlying teloxide client.
    bot: Bot,

    /// Bot username as reported by `getMe`.
    username: Option<String>,
}

impl TelegramBot {
    /// Connects to Telegram and verifies the token with `getMe`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or Telegram is unreachable.
    pub async fn connect(config: &TelegramConfig) -> Result<Self, TelegramError> {
        info!("Connecting to Telegram as {}...", config.masked_token());

        let mut bot = Bot::new(&config.bot_token);
        if let Some(api_url) = &config.api_url {
            debug!("Using custom Bot API server: {}", api_url);
            bot = bot.set_api_url(api_url.clone());
        }

        let me = bot.get_me().await.map_err(|e| {
            let err = TelegramError::from(e);
            warn!("getMe failed: {}", err);
            err
        })?;

        let username = me.user.username.clone();
        info!(
            "Connected to Telegram as @{}",
            username.as_deref().unwrap_or("<unknown>")
        );

        Ok(Self { bot, username })
    }

    /// Returns the bot username, if Telegram reported one.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Gets the underlying teloxide client.
    #[must_use]
    pub fn inner(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl ReplySender for TelegramBot {
    type Error = TelegramError;

    async fn send_reply(&self, chat_id: i64, reply: &OutgoingReply) -> Result<(), TelegramError> {
        debug!(
            "Sending reply to chat {}: \"{}\"",
            chat_id,
            truncate_for_log(&reply.text, 40)
        );

        self.bot
            .send_message(ChatId(chat_id), reply.text.clone())
            .reply_markup(keyboard(reply))
            .await?;

        Ok(())
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Builds the one-button inline keyboard for a reply.
fn keyboard(reply: &OutgoingReply) -> InlineKeyboardMarkup {
    let button = InlineKeyboardButton::web_app(
        reply.button.label.clone(),
        WebAppInfo {
            url: reply.button.url.clone(),
        },
    );
    InlineKeyboardMarkup::new(vec![vec![button]])
}

/// Truncates a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}
