//! Port for the content store: weddings, RSVPs, messages and photos.
//!
//! Reads never return soft-deleted rows unless the method says so. Every
//! write goes through [`ContentRepository::commit`], which applies one change
//! and appends its audit entry as a single unit of work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{AuditAction, AuditEntry, Message, Photo, Record, RecordKind, Rsvp, Wedding};

use super::define_port_error;

define_port_error! {
    /// Errors raised by content store adapters.
    pub enum ContentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "content repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "content repository query failed: {message}",
        /// The target row is absent or in the wrong deletion state.
        NotFound { kind: RecordKind, id: Uuid } =>
            "{kind} {id} not found",
        /// A uniqueness constraint rejected the write.
        Duplicate { message: String } =>
            "content repository rejected duplicate: {message}",
    }
}

/// A single content mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentChange {
    /// Insert a new record.
    Create(Record),
    /// Overwrite an active record with this state.
    Update(Record),
    /// Mark an active record deleted at `at`.
    SoftDelete {
        kind: RecordKind,
        id: Uuid,
        at: DateTime<Utc>,
    },
    /// Clear the deletion marker of a soft-deleted record.
    Restore {
        kind: RecordKind,
        id: Uuid,
        at: DateTime<Utc>,
    },
}

impl ContentChange {
    /// Audit action describing this change.
    #[must_use]
    pub const fn action(&self) -> AuditAction {
        match self {
            Self::Create(_) => AuditAction::Create,
            Self::Update(_) => AuditAction::Update,
            Self::SoftDelete { .. } => AuditAction::Delete,
            Self::Restore { .. } => AuditAction::Restore,
        }
    }

    /// Kind and id of the targeted record.
    #[must_use]
    pub const fn target(&self) -> (RecordKind, Uuid) {
        match self {
            Self::Create(record) | Self::Update(record) => (record.kind(), record.id()),
            Self::SoftDelete { kind, id, .. } | Self::Restore { kind, id, .. } => (*kind, *id),
        }
    }
}

/// Counts for the RSVP dashboard tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RsvpStats {
    pub total: i64,
    pub attending: i64,
    /// Sum of `number_of_guests` over attending RSVPs.
    pub total_guests: i64,
}

/// Counts for a moderated content kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModerationStats {
    pub total: i64,
    pub approved: i64,
    pub pending: i64,
}

impl ModerationStats {
    /// Derive `pending` from the active and approved counts.
    #[must_use]
    pub const fn from_counts(total: i64, approved: i64) -> Self {
        Self {
            total,
            approved,
            pending: total - approved,
        }
    }
}

/// Aggregate counts over active rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentStats {
    pub rsvps: RsvpStats,
    pub messages: ModerationStats,
    pub photos: ModerationStats,
}

/// Port for content storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch an active record.
    async fn find_by_id(
        &self,
        kind: RecordKind,
        id: &Uuid,
    ) -> Result<Option<Record>, ContentRepositoryError>;

    /// Fetch a soft-deleted record.
    async fn find_deleted_by_id(
        &self,
        kind: RecordKind,
        id: &Uuid,
    ) -> Result<Option<Record>, ContentRepositoryError>;

    /// The deployment's wedding: the oldest active row.
    async fn current_wedding(&self) -> Result<Option<Wedding>, ContentRepositoryError>;

    /// Active RSVP for `wedding_id` whose email matches case-insensitively.
    async fn find_rsvp_by_email(
        &self,
        wedding_id: &Uuid,
        email: &str,
    ) -> Result<Option<Rsvp>, ContentRepositoryError>;

    /// Active RSVPs, newest first.
    async fn list_rsvps(&self) -> Result<Vec<Rsvp>, ContentRepositoryError>;

    /// Active messages, newest first, optionally only approved ones.
    async fn list_messages(&self, approved_only: bool)
    -> Result<Vec<Message>, ContentRepositoryError>;

    /// Active photos, newest first, optionally only approved ones.
    async fn list_photos(&self, approved_only: bool) -> Result<Vec<Photo>, ContentRepositoryError>;

    /// Aggregate counts over active rows.
    async fn stats(&self) -> Result<ContentStats, ContentRepositoryError>;

    /// Apply `change` and append `audit` atomically.
    ///
    /// When the change matches no row (absent, or in the wrong deletion
    /// state) nothing is written and
    /// [`ContentRepositoryError::NotFound`] is returned.
    async fn commit(
        &self,
        change: &ContentChange,
        audit: &AuditEntry,
    ) -> Result<(), ContentRepositoryError>;
}
