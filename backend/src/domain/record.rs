//! Record kinds held by the content store and the subsets admins may moderate.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::{Error, ErrorCode, Message, Photo, Rsvp, Wedding};

/// The four soft-deletable record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Wedding,
    Rsvp,
    Message,
    Photo,
}

impl RecordKind {
    /// Table the kind is stored in; also the audit `table_name`.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Wedding => "weddings",
            Self::Rsvp => "rsvps",
            Self::Message => "messages",
            Self::Photo => "photos",
        }
    }

    /// Singular lower-case label used in operation names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wedding => "wedding",
            Self::Rsvp => "rsvp",
            Self::Message => "message",
            Self::Photo => "photo",
        }
    }

    /// Error code reported when a record of this kind is absent.
    #[must_use]
    pub const fn not_found_code(self) -> ErrorCode {
        match self {
            Self::Wedding => ErrorCode::WeddingNotFound,
            Self::Rsvp => ErrorCode::RsvpNotFound,
            Self::Message => ErrorCode::MessageNotFound,
            Self::Photo => ErrorCode::PhotoNotFound,
        }
    }

    /// `<KIND>_NOT_FOUND` error with the default message.
    #[must_use]
    pub fn not_found(self) -> Error {
        Error::from_code(self.not_found_code())
    }

    /// Look a kind up by table name.
    #[must_use]
    pub fn from_table_name(table: &str) -> Option<Self> {
        [Self::Wedding, Self::Rsvp, Self::Message, Self::Photo]
            .into_iter()
            .find(|kind| kind.table_name() == table)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kinds whose visibility is controlled by approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovableKind {
    Message,
    Photo,
}

impl ApprovableKind {
    #[must_use]
    pub const fn record_kind(self) -> RecordKind {
        match self {
            Self::Message => RecordKind::Message,
            Self::Photo => RecordKind::Photo,
        }
    }

    /// Audit operation name, e.g. `approve_message`.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::Message => "approve_message",
            Self::Photo => "approve_photo",
        }
    }
}

/// Kinds an admin may soft delete and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovableKind {
    Rsvp,
    Message,
    Photo,
}

impl RemovableKind {
    #[must_use]
    pub const fn record_kind(self) -> RecordKind {
        match self {
            Self::Rsvp => RecordKind::Rsvp,
            Self::Message => RecordKind::Message,
            Self::Photo => RecordKind::Photo,
        }
    }

    /// Audit operation name for removal, e.g. `soft_delete_rsvp`.
    #[must_use]
    pub const fn delete_operation(self) -> &'static str {
        match self {
            Self::Rsvp => "soft_delete_rsvp",
            Self::Message => "soft_delete_message",
            Self::Photo => "soft_delete_photo",
        }
    }

    /// Audit operation name for restore, e.g. `restore_rsvp`.
    #[must_use]
    pub const fn restore_operation(self) -> &'static str {
        match self {
            Self::Rsvp => "restore_rsvp",
            Self::Message => "restore_message",
            Self::Photo => "restore_photo",
        }
    }
}

/// A record of any kind.
///
/// Serialises as the inner record so API payloads and audit snapshots share
/// one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Wedding(Wedding),
    Rsvp(Rsvp),
    Message(Message),
    Photo(Photo),
}

impl Record {
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Wedding(_) => RecordKind::Wedding,
            Self::Rsvp(_) => RecordKind::Rsvp,
            Self::Message(_) => RecordKind::Message,
            Self::Photo(_) => RecordKind::Photo,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Wedding(record) => record.id,
            Self::Rsvp(record) => record.id,
            Self::Message(record) => record.id,
            Self::Photo(record) => record.id,
        }
    }

    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Wedding(record) => record.deleted_at,
            Self::Rsvp(record) => record.deleted_at,
            Self::Message(record) => record.deleted_at,
            Self::Photo(record) => record.deleted_at,
        }
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Wedding(record) => record.created_at,
            Self::Rsvp(record) => record.created_at,
            Self::Message(record) => record.created_at,
            Self::Photo(record) => record.created_at,
        }
    }

    /// Copy of the record with the soft-delete marker set or cleared.
    #[must_use]
    pub fn with_deleted_at(mut self, deleted_at: Option<DateTime<Utc>>, at: DateTime<Utc>) -> Self {
        match &mut self {
            Self::Wedding(record) => {
                record.deleted_at = deleted_at;
                record.updated_at = at;
            }
            Self::Rsvp(record) => {
                record.deleted_at = deleted_at;
                record.updated_at = at;
            }
            Self::Message(record) => {
                record.deleted_at = deleted_at;
                record.updated_at = at;
            }
            Self::Photo(record) => {
                record.deleted_at = deleted_at;
                record.updated_at = at;
            }
        }
        self
    }

    /// Full JSON snapshot used for audit `old_values`/`new_values`.
    ///
    /// # Errors
    /// Returns an internal error if serialisation fails.
    pub fn snapshot(&self) -> Result<Value, Error> {
        serde_json::to_value(self)
            .map_err(|err| Error::internal(format!("failed to snapshot {}: {err}", self.kind())))
    }
}

impl From<Wedding> for Record {
    fn from(value: Wedding) -> Self {
        Self::Wedding(value)
    }
}

impl From<Rsvp> for Record {
    fn from(value: Rsvp) -> Self {
        Self::Rsvp(value)
    }
}

impl From<Message> for Record {
    fn from(value: Message) -> Self {
        Self::Message(value)
    }
}

impl From<Photo> for Record {
    fn from(value: Photo) -> Self {
        Self::Photo(value)
    }
}

impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_table_name(value)
            .ok_or_else(|| Error::bad_request(format!("unknown table: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wedding::fixtures;
    use rstest::rstest;

    #[rstest]
    #[case(RecordKind::Wedding, "weddings", ErrorCode::WeddingNotFound)]
    #[case(RecordKind::Rsvp, "rsvps", ErrorCode::RsvpNotFound)]
    #[case(RecordKind::Message, "messages", ErrorCode::MessageNotFound)]
    #[case(RecordKind::Photo, "photos", ErrorCode::PhotoNotFound)]
    fn kinds_map_to_tables_and_codes(
        #[case] kind: RecordKind,
        #[case] table: &str,
        #[case] code: ErrorCode,
    ) {
        assert_eq!(kind.table_name(), table);
        assert_eq!(kind.not_found().code(), code);
        assert_eq!(table.parse::<RecordKind>().expect("known table"), kind);
    }

    #[rstest]
    fn unknown_tables_are_rejected() {
        let err = "audit_logs".parse::<RecordKind>().expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }

    #[rstest]
    fn snapshot_is_flat_record_json() {
        let record = Record::from(fixtures::wedding());
        let snapshot = record.snapshot().expect("snapshot");
        assert_eq!(snapshot["bride_name"], "Sarah Johnson");
        assert_eq!(snapshot["wedding_date"], "2024-12-15");
        assert!(snapshot["deleted_at"].is_null());
    }

    #[rstest]
    fn operation_names_follow_kind() {
        assert_eq!(ApprovableKind::Photo.operation(), "approve_photo");
        assert_eq!(RemovableKind::Rsvp.delete_operation(), "soft_delete_rsvp");
        assert_eq!(RemovableKind::Message.restore_operation(), "restore_message");
    }
}
