//! Driving port for admin dashboard reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AdminContext, AuditEntry, AuditPage, Error, Message, Photo, RecordKind, Rsvp,
};

use super::ContentStats;

/// Ledger page size used when the caller gives none.
pub const DEFAULT_AUDIT_PAGE_SIZE: i64 = 100;
/// Largest page the ledger listing will return.
pub const MAX_AUDIT_PAGE_SIZE: i64 = 500;

/// Requested slice of the audit ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditLogPageRequest {
    limit: i64,
    offset: i64,
}

impl AuditLogPageRequest {
    /// Clamp `limit` to `1..=MAX_AUDIT_PAGE_SIZE` and `offset` to zero or more.
    ///
    /// # Examples
    /// ```
    /// use wedding_backend::domain::ports::AuditLogPageRequest;
    ///
    /// let page = AuditLogPageRequest::new(None, Some(-5));
    /// assert_eq!(page.limit(), 100);
    /// assert_eq!(page.offset(), 0);
    /// ```
    #[must_use]
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit
                .unwrap_or(DEFAULT_AUDIT_PAGE_SIZE)
                .clamp(1, MAX_AUDIT_PAGE_SIZE),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for AuditLogPageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Port for admin read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminQuery: Send + Sync {
    /// Dashboard counts.
    async fn stats(&self, context: &AdminContext) -> Result<ContentStats, Error>;

    /// Active RSVPs, newest first.
    async fn rsvps(&self, context: &AdminContext) -> Result<Vec<Rsvp>, Error>;

    /// Active messages including unapproved ones, newest first.
    async fn messages(&self, context: &AdminContext) -> Result<Vec<Message>, Error>;

    /// Active photos including unapproved ones, newest first.
    async fn photos(&self, context: &AdminContext) -> Result<Vec<Photo>, Error>;

    /// One page of the ledger.
    async fn audit_logs(
        &self,
        context: &AdminContext,
        page: AuditLogPageRequest,
    ) -> Result<AuditPage, Error>;

    /// The newest `limit` ledger entries.
    async fn recent_audit(
        &self,
        context: &AdminContext,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, Error>;

    /// Every ledger entry for one record.
    async fn audit_trail(
        &self,
        context: &AdminContext,
        kind: RecordKind,
        id: Uuid,
    ) -> Result<Vec<AuditEntry>, Error>;
}
