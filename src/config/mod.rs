//! Configuration module for the registration bot.
//!
//! Handles loading and validation of the bot credentials, the web app
//! target, and the reply wording.

mod messages;
mod settings;

pub use messages::{MessageTemplates, ValidationError};
pub use settings::{BotSettings, ConfigError, TelegramConfig};

/// Placeholder replaced with the sender's display name in the greeting.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Maximum length of a Telegram text message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Longest name substituted into the greeting, in characters.
///
/// Telegram caps first names at this length; the fallback name obeys it too.
pub const MAX_NAME_LENGTH: usize = 64;

/// Longest button label accepted by the bot, in characters.
pub const MAX_BUTTON_LABEL_LENGTH: usize = 64;
