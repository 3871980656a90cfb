//! Guestbook messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Error;
use super::approval::impl_approvable;
use super::validation::{ensure_valid, optional_text, trimmed};

/// A guestbook message. Hidden from the public site until approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub wedding_id: Uuid,
    pub sender_name: String,
    pub sender_email: Option<String>,
    pub message_content: String,
    pub is_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_approvable!(Message);

/// A message as submitted by a guest.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct MessageSubmission {
    pub wedding_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub sender_name: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub sender_email: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "must be between 1 and 1000 characters"))]
    pub message_content: String,
}

impl MessageSubmission {
    /// Normalise whitespace and validate every field.
    ///
    /// # Errors
    /// Returns a `BAD_REQUEST` error listing each offending field.
    pub fn validated(self) -> Result<Self, Error> {
        let submission = Self {
            wedding_id: self.wedding_id,
            sender_name: trimmed(&self.sender_name),
            sender_email: optional_text(self.sender_email),
            message_content: trimmed(&self.message_content),
        };
        ensure_valid(&submission, Vec::new())?;
        Ok(submission)
    }

    /// Materialise an unapproved message.
    #[must_use]
    pub fn into_message(self, id: Uuid, at: DateTime<Utc>) -> Message {
        Message {
            id,
            wedding_id: self.wedding_id,
            sender_name: self.sender_name,
            sender_email: self.sender_email,
            message_content: self.message_content,
            is_approved: false,
            approved_at: None,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }
}
