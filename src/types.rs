use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ContactError, Result};

/// Longest message body accepted from the form, in characters.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// A raw contact-form submission as posted by a visitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl ContactSubmission {
    /// Trim every field and check that the submission is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingField`] for the first blank field (in
    /// form order), or [`ContactError::InvalidField`] when the email has no
    /// `local@domain` shape or the message exceeds [`MAX_MESSAGE_CHARS`].
    pub fn validate(self) -> Result<Self> {
        let submission = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            message: self.message.trim().to_string(),
        };

        for (field, value) in [
            ("name", &submission.name),
            ("email", &submission.email),
            ("phone", &submission.phone),
            ("message", &submission.message),
        ] {
            if value.is_empty() {
                return Err(ContactError::MissingField(field.to_string()));
            }
        }

        match submission.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => {
                return Err(ContactError::InvalidField {
                    field: "email".to_string(),
                    reason: "expected an address like name@example.com".to_string(),
                })
            }
        }

        if submission.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ContactError::InvalidField {
                field: "message".to_string(),
                reason: format!("longer than {} characters", MAX_MESSAGE_CHARS),
            });
        }

        Ok(submission)
    }
}

/// A validated submission as persisted and relayed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

impl ContactRecord {
    /// Stamp a validated submission with a fresh id and the current time.
    pub fn new(submission: ContactSubmission) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: submission.name,
            email: submission.email,
            phone: submission.phone,
            message: submission.message,
            submitted_at: Utc::now(),
        }
    }
}
