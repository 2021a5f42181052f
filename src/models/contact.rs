use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_MESSAGE_LENGTH: usize = 500;
const MIN_NAME_LENGTH: usize = 2;
const MIN_MESSAGE_LENGTH: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Message => "message",
        })
    }
}

/// Per-field messages for a contact form that failed validation.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("contact form has {} invalid field(s)", .errors.len())]
pub struct ContactErrors {
    pub errors: BTreeMap<ContactField, String>,
}

impl ContactErrors {
    pub fn get(&self, field: ContactField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Applies an edit to one field. Input longer than the field allows is
    /// refused and leaves the form untouched.
    pub fn accept_input(&mut self, field: ContactField, value: &str) -> bool {
        let count = value.chars().count();
        match field {
            ContactField::Name if count > MAX_NAME_LENGTH => false,
            ContactField::Message if count > MAX_MESSAGE_LENGTH => false,
            ContactField::Name => {
                self.name = value.to_string();
                true
            }
            ContactField::Email => {
                self.email = value.to_string();
                true
            }
            ContactField::Message => {
                self.message = value.to_string();
                true
            }
        }
    }

    pub fn validate(&self) -> Result<(), ContactErrors> {
        let mut errors = BTreeMap::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(ContactField::Name, "Name is required".to_string());
        } else if name.chars().count() < MIN_NAME_LENGTH {
            errors.insert(
                ContactField::Name,
                format!("Name must be at least {MIN_NAME_LENGTH} characters"),
            );
        }

        if self.email.trim().is_empty() {
            errors.insert(ContactField::Email, "Email is required".to_string());
        } else if !is_valid_email(&self.email) {
            errors.insert(
                ContactField::Email,
                "Please enter a valid email address".to_string(),
            );
        }

        let message = self.message.trim();
        if message.is_empty() {
            errors.insert(ContactField::Message, "Message is required".to_string());
        } else if message.chars().count() < MIN_MESSAGE_LENGTH {
            errors.insert(
                ContactField::Message,
                format!("Message must be at least {MIN_MESSAGE_LENGTH} characters"),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ContactErrors { errors })
        }
    }

    pub fn into_message(self, to_name: &str, to_email: &str) -> OutboundMessage {
        OutboundMessage {
            from_name: self.name.trim().to_string(),
            from_email: self.email.trim().to_string(),
            to_name: to_name.to_string(),
            to_email: to_email.to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// `local@domain.tld`: no whitespace, and exactly one `@` followed by a
/// domain holding a dot with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// Message handed to the outbound transport.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from_name: String,
    pub from_email: String,
    pub to_name: String,
    pub to_email: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(form("Jo", "jo@example.com", "Let's build something").validate().is_ok());
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let errors = form(" J ", "not-an-email", "short").validate().unwrap_err();
        assert_eq!(errors.errors.len(), 3);
        assert_eq!(
            errors.get(ContactField::Name),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(
            errors.get(ContactField::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            errors.get(ContactField::Message),
            Some("Message must be at least 10 characters")
        );
    }

    #[test]
    fn blank_fields_are_required() {
        let errors = form("", "  ", "").validate().unwrap_err();
        assert_eq!(errors.get(ContactField::Name), Some("Name is required"));
        assert_eq!(errors.get(ContactField::Email), Some("Email is required"));
        assert_eq!(errors.get(ContactField::Message), Some("Message is required"));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@b@c.de"));
        assert!(is_valid_email("a@b.c."));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("a@b\tc.de"));
    }

    #[test]
    fn over_long_input_is_refused() {
        let mut contact = ContactForm::default();
        assert!(contact.accept_input(ContactField::Name, &"x".repeat(MAX_NAME_LENGTH)));
        assert!(!contact.accept_input(ContactField::Name, &"x".repeat(MAX_NAME_LENGTH + 1)));
        assert_eq!(contact.name.len(), MAX_NAME_LENGTH);
        assert!(!contact.accept_input(ContactField::Message, &"y".repeat(MAX_MESSAGE_LENGTH + 1)));
        assert!(contact.message.is_empty());
    }

    #[test]
    fn message_carries_trimmed_sender_fields() {
        let message = form(" Jo ", " jo@example.com ", " Hello there, friend ")
            .into_message("Owner", "owner@example.com");
        assert_eq!(message.from_name, "Jo");
        assert_eq!(message.from_email, "jo@example.com");
        assert_eq!(message.message, "Hello there, friend");
        assert_eq!(message.to_email, "owner@example.com");
    }
}
