//! Telegram client wrapper module.
//!
//! Wraps the Bot API client, maps its errors, and drives the polling loop.

mod client;
mod runner;

pub use client::{TelegramBot, TelegramError};
pub use runner::run;
