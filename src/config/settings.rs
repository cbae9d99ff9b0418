//! Application settings and Telegram configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// Telegram Bot API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by `@BotFather`.
    pub bot_token: String,

    /// Web app opened by the registration button.
    pub webapp_url: Url,

    /// Custom Bot API server, if not using the public one.
    #[serde(default)]
    pub api_url: Option<Url>,
}

impl TelegramConfig {
    /// Creates a new Telegram configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or the web app URL is malformed.
    pub fn new(bot_token: String, webapp_url: &str) -> Result<Self, ConfigError> {
        validate_token(&bot_token)?;
        let webapp_url = parse_webapp_url(webapp_url)?;

        Ok(Self {
            bot_token,
            webapp_url,
            api_url: None,
        })
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `BOT_TOKEN` and `WEBAPP_URL` to be set. `TELEGRAM_API_URL`
    /// is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from any key/value source.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing or a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup("BOT_TOKEN").ok_or(ConfigError::MissingEnvVar("BOT_TOKEN"))?;
        let webapp_url = lookup("WEBAPP_URL").ok_or(ConfigError::MissingEnvVar("WEBAPP_URL"))?;

        let mut config = Self::new(bot_token.trim().to_owned(), webapp_url.trim())?;

        if let Some(raw) = lookup("TELEGRAM_API_URL") {
            let api_url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
                var: "TELEGRAM_API_URL",
                reason: e.to_string(),
            })?;
            config.api_url = Some(api_url);
        }

        Ok(config)
    }

    /// Returns the token with its secret half hidden, safe for logs.
    #[must_use]
    pub fn masked_token(&self) -> String {
        mask_token(&self.bot_token)
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.masked_token())
            .field("webapp_url", &self.webapp_url.as_str())
            .field("api_url", &self.api_url.as_ref().map(Url::as_str))
            .finish()
    }
}

/// Bot-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Path to the reply templates JSON file. Built-in wording when absent.
    #[serde(default)]
    pub messages_path: Option<PathBuf>,

    /// Skip updates that queued up while the bot was offline.
    #[serde(default = "default_drop_pending_updates")]
    pub drop_pending_updates: bool,
}

fn default_drop_pending_updates() -> bool {
    true
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            messages_path: None,
            drop_pending_updates: default_drop_pending_updates(),
        }
    }
}

impl BotSettings {
    /// Creates bot settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates bot settings from any key/value source, with defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            messages_path: lookup("MESSAGES_PATH").map(PathBuf::from),
            drop_pending_updates: lookup("DROP_PENDING_UPDATES")
                .and_then(|s| parse_flag(&s))
                .unwrap_or_else(default_drop_pending_updates),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid bot token format (expected <bot_id>:<secret>)")]
    InvalidToken,

    #[error("Invalid URL in {var}: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("Web app URL must use https, got '{0}'")]
    InsecureWebAppUrl(String),
}

fn validate_token(token: &str) -> Result<(), ConfigError> {
    let Some((id, secret)) = token.split_once(':') else {
        return Err(ConfigError::InvalidToken);
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) || secret.is_empty() {
        return Err(ConfigError::InvalidToken);
    }

    Ok(())
}

fn parse_webapp_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        var: "WEBAPP_URL",
        reason: e.to_string(),
    })?;

    if url.scheme() != "https" {
        return Err(ConfigError::InsecureWebAppUrl(raw.to_owned()));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidUrl {
            var: "WEBAPP_URL",
            reason: "missing host".to_owned(),
        });
    }

    Ok(url)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Masks a bot token for logging (keeps the bot id).
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, _)) => format!("{id}:***"),
        None => "***".to_owned(),
    }
}
