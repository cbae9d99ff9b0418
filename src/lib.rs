//! Registration Bot Library
//!
//! A Telegram bot that greets users on `/start` and offers a button
//! opening the registration web app.
//!
//! This crate provides the core functionality for:
//! - Loading and validating the bot configuration and reply wording
//! - Turning `/start` messages into replies
//! - Sending replies and polling for updates via the Bot API

pub mod commands;
pub mod config;
pub mod telegram;
