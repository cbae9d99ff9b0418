//! Reply wording and its validation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{MAX_BUTTON_LABEL_LENGTH, MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH, NAME_PLACEHOLDER};

/// Errors that can occur during template validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Template field '{field}' is empty")]
    Empty { field: &'static str },

    #[error("Greeting does not contain the {{name}} placeholder")]
    MissingPlaceholder,

    #[error("Template field '{field}' exceeds maximum length: {length} > {max_length}")]
    TooLong {
        field: &'static str,
        length: usize,
        max_length: usize,
    },

    #[error("Failed to read templates file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse templates file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Wording used to build the `/start` reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageTemplates {
    /// Greeting body; `{name}` is replaced with the sender's display name.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Name used when the sender has no usable display name.
    #[serde(default = "default_fallback_name")]
    pub fallback_name: String,

    /// Label of the web app button.
    #[serde(default = "default_button_label")]
    pub button_label: String,
}

fn default_greeting() -> String {
    "Hi, {name}! Tap the button below to complete registration:".to_owned()
}

fn default_fallback_name() -> String {
    "there".to_owned()
}

fn default_button_label() -> String {
    "Complete registration".to_owned()
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            fallback_name: default_fallback_name(),
            button_label: default_button_label(),
        }
    }
}

impl MessageTemplates {
    /// Loads templates from a JSON file. Missing fields take the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path)?;
        let templates: Self = serde_json::from_str(&content)?;
        Ok(templates)
    }

    /// Saves templates to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the templates.
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_all().into_iter().next().map_or(Ok(()), Err)
    }

    /// Returns every validation problem, in field order.
    #[must_use]
    pub fn validate_all(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("greeting", &self.greeting),
            ("fallback_name", &self.fallback_name),
            ("button_label", &self.button_label),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::Empty { field });
            }
        }

        if !self.greeting.contains(NAME_PLACEHOLDER) {
            errors.push(ValidationError::MissingPlaceholder);
        }

        let fallback_len = self.fallback_name.chars().count();
        if fallback_len > MAX_NAME_LENGTH {
            errors.push(ValidationError::TooLong {
                field: "fallback_name",
                length: fallback_len,
                max_length: MAX_NAME_LENGTH,
            });
        }

        let name_len = fallback_len.max(MAX_NAME_LENGTH);
        let worst_case = self.greeting.chars().count() + name_len * self.placeholder_count();
        if worst_case > MAX_MESSAGE_LENGTH {
            errors.push(ValidationError::TooLong {
                field: "greeting",
                length: worst_case,
                max_length: MAX_MESSAGE_LENGTH,
            });
        }

        let label_len = self.button_label.chars().count();
        if label_len > MAX_BUTTON_LABEL_LENGTH {
            errors.push(ValidationError::TooLong {
                field: "button_label",
                length: label_len,
                max_length: MAX_BUTTON_LABEL_LENGTH,
            });
        }

        errors
    }

    /// Renders the greeting for a sender.
    ///
    /// Blank names fall back to `fallback_name`.
    #[must_use]
    pub fn render_greeting(&self, name: &str) -> String {
        let name = name.trim();
        let name = if name.is_empty() {
            self.fallback_name.as_str()
        } else {
            name
        };
        self.greeting.replace(NAME_PLACEHOLDER, name)
    }

    /// Creates an example templates file for users to reference.
    #[must_use]
    pub fn example() -> Self {
        Self::default()
    }

    fn placeholder_count(&self) -> usize {
        self.greeting.matches(NAME_PLACEHOLDER).count()
    }
}
