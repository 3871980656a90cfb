//! Guest RSVPs.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validation::{ensure_valid, optional_text, trimmed};
use super::{Error, FieldViolation};

/// Whether the guest will attend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Attending,
    NotAttending,
    #[default]
    Maybe,
}

impl AttendanceStatus {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attending => "attending",
            Self::NotAttending => "not_attending",
            Self::Maybe => "maybe",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "attending" => Ok(Self::Attending),
            "not_attending" => Ok(Self::NotAttending),
            "maybe" => Ok(Self::Maybe),
            other => Err(format!("unknown attendance status: {other}")),
        }
    }
}

/// A stored RSVP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rsvp {
    pub id: Uuid,
    pub wedding_id: Uuid,
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub attendance_status: AttendanceStatus,
    pub number_of_guests: i32,
    pub dietary_restrictions: Option<String>,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// An RSVP as submitted by a guest, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct RsvpSubmission {
    pub wedding_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub guest_name: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub guest_email: Option<String>,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub guest_phone: Option<String>,
    pub attendance_status: Option<String>,
    #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
    pub number_of_guests: Option<i32>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub dietary_restrictions: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub special_requests: Option<String>,
}

/// Default party size when the guest leaves it blank.
pub const DEFAULT_NUMBER_OF_GUESTS: i32 = 1;

impl RsvpSubmission {
    /// Normalise whitespace and validate every field.
    ///
    /// Emails are lower-cased so duplicate detection is case-insensitive.
    ///
    /// # Errors
    /// Returns a `BAD_REQUEST` error listing each offending field.
    pub fn validated(self) -> Result<ValidRsvp, Error> {
        let submission = Self {
            guest_name: trimmed(&self.guest_name),
            guest_email: optional_text(self.guest_email).map(|email| email.to_lowercase()),
            guest_phone: optional_text(self.guest_phone),
            attendance_status: optional_text(self.attendance_status),
            dietary_restrictions: optional_text(self.dietary_restrictions),
            special_requests: optional_text(self.special_requests),
            ..self
        };

        let (status, extra) = match submission.attendance_status.as_deref() {
            None => (AttendanceStatus::default(), Vec::new()),
            Some(raw) => match raw.parse::<AttendanceStatus>() {
                Ok(status) => (status, Vec::new()),
                Err(_) => (
                    AttendanceStatus::default(),
                    vec![FieldViolation::new(
                        "attendance_status",
                        "must be one of attending, not_attending, maybe",
                    )],
                ),
            },
        };
        ensure_valid(&submission, extra)?;

        Ok(ValidRsvp {
            wedding_id: submission.wedding_id,
            guest_name: submission.guest_name,
            guest_email: submission.guest_email,
            guest_phone: submission.guest_phone,
            attendance_status: status,
            number_of_guests: submission
                .number_of_guests
                .unwrap_or(DEFAULT_NUMBER_OF_GUESTS),
            dietary_restrictions: submission.dietary_restrictions,
            special_requests: submission.special_requests,
        })
    }
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRsvp {
    pub wedding_id: Uuid,
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub attendance_status: AttendanceStatus,
    pub number_of_guests: i32,
    pub dietary_restrictions: Option<String>,
    pub special_requests: Option<String>,
}

impl ValidRsvp {
    /// Materialise the stored record.
    #[must_use]
    pub fn into_rsvp(self, id: Uuid, at: DateTime<Utc>) -> Rsvp {
        Rsvp {
            id,
            wedding_id: self.wedding_id,
            guest_name: self.guest_name,
            guest_email: self.guest_email,
            guest_phone: self.guest_phone,
            attendance_status: self.attendance_status,
            number_of_guests: self.number_of_guests,
            dietary_restrictions: self.dietary_restrictions,
            special_requests: self.special_requests,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }
}
