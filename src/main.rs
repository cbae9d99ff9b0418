//! Registration Bot - Main Entry Point
//!
//! A Telegram bot that answers `/start` with a button opening the
//! registration web app.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use registration_bot::commands::CommandDispatcher;
use registration_bot::config::{BotSettings, MessageTemplates, TelegramConfig};
use registration_bot::telegram::{self, TelegramBot};

/// Telegram bot that sends a registration web app button on /start.
#[derive(Parser, Debug)]
#[command(name = "registration_bot")]
#[command(about = "Answer /start with a button that opens the registration web app")]
#[command(version)]
struct Args {
    /// Path to the reply templates JSON file (built-in wording if omitted).
    #[arg(short, long)]
    messages: Option<PathBuf>,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Generate an example templates file and exit.
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Handle example config generation
    if args.generate_config {
        return generate_example_config();
    }

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Load configurations
    let tg_config = TelegramConfig::from_env()
        .context("Failed to load Telegram configuration from environment")?;

    let bot_settings = BotSettings::from_env_with_defaults();

    let templates = match args.messages.or(bot_settings.messages_path) {
        Some(path) => MessageTemplates::load_from_file(&path)
            .with_context(|| format!("Failed to load reply templates from {}", path.display()))?,
        None => MessageTemplates::default(),
    };

    templates
        .validate()
        .context("Reply templates validation failed")?;

    info!("Web app URL: {}", tg_config.webapp_url);

    // Connect to Telegram
    let bot = TelegramBot::connect(&tg_config)
        .await
        .context("Failed to connect to Telegram")?;

    // Build the command dispatcher once the username is known
    let commands = CommandDispatcher::new(tg_config.webapp_url.clone(), templates)
        .with_bot_username(bot.username().map(str::to_owned));

    info!("Bot is running. Use Ctrl+C to stop.");
    telegram::run(
        Arc::new(bot),
        Arc::new(commands),
        bot_settings.drop_pending_updates,
    )
    .await;

    info!("Shutting down...");
    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Generates an example templates file.
fn generate_example_config() -> Result<()> {
    let example = MessageTemplates::example();
    example.save_to_file("messages.example.json")?;

    println!("✓ Example templates written to: messages.example.json");
    println!("\nTo use this bot:");
    println!("1. Copy messages.example.json to messages.json and adjust the wording");
    println!("2. Create a .env file with BOT_TOKEN and WEBAPP_URL");
    println!("3. Run: registration_bot --messages messages.json");

    Ok(())
}
