//! Standalone validator for reply template files.
//!
//! Checks a templates JSON file and prints the `/start` reply it would
//! produce.

use std::process::ExitCode;

use clap::Parser;
use url::Url;

use registration_bot::commands::{CommandDispatcher, IncomingMessage};
use registration_bot::config::{MAX_BUTTON_LABEL_LENGTH, MAX_MESSAGE_LENGTH, MessageTemplates};

/// Reply templates validator.
#[derive(Parser, Debug)]
#[command(name = "validate_messages")]
#[command(about = "Validates reply template files for the registration bot")]
#[command(version)]
struct Args {
    /// Path to the JSON templates file to validate.
    #[arg(short, long, default_value = "messages.json")]
    file: String,

    /// Generate an example templates file at the specified path.
    #[arg(long)]
    generate_example: Option<String>,

    /// Sender name used for the preview.
    #[arg(long, default_value = "Ana")]
    preview_name: String,

    /// Web app URL used for the preview.
    #[arg(long, default_value = "https://example.org/registration.html")]
    webapp_url: Url,

    /// Also preview the reply for a sender without a name.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(output_path) = &args.generate_example {
        return generate_example(output_path);
    }

    validate_templates(&args)
}

fn generate_example(output_path: &str) -> ExitCode {
    match MessageTemplates::example().save_to_file(output_path) {
        Ok(()) => {
            println!("✓ Example templates written to: {output_path}");
            println!("\nUse {{name}} in the greeting where the sender's first name should go.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Failed to write example file: {e}");
            ExitCode::FAILURE
        }
    }
}

fn validate_templates(args: &Args) -> ExitCode {
    println!("Validating: {}\n", args.file);

    let templates = match MessageTemplates::load_from_file(&args.file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("✗ Failed to load templates: {e}");
            return ExitCode::FAILURE;
        }
    };

    let errors = templates.validate_all();
    if !errors.is_empty() {
        for e in &errors {
            println!("  ✗ Error: {e}");
        }
        println!("\n✗ Validation failed: {} error(s)", errors.len());
        return ExitCode::FAILURE;
    }

    println!("✓ Templates are valid!");
    println!("\nLimits:");
    println!("  Message text: {MAX_MESSAGE_LENGTH} chars");
    println!("  Button label: {MAX_BUTTON_LABEL_LENGTH} chars");

    let dispatcher = CommandDispatcher::new(args.webapp_url.clone(), templates);
    print_preview(&dispatcher, &args.preview_name);
    if args.verbose {
        print_preview(&dispatcher, "");
    }

    ExitCode::SUCCESS
}

fn print_preview(dispatcher: &CommandDispatcher, name: &str) {
    let Some(reply) = dispatcher.dispatch(&IncomingMessage::new(0, name, "/start")) else {
        return;
    };

    println!("\nPreview for sender \"{name}\":");
    println!("  {}", reply.text);
    println!("  [{}] -> {}", reply.button.label, reply.button.url);
}
