//! Admin dashboard reads over the content store and the audit ledger.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    AdminQuery, AuditLogPageRequest, AuditLogRepository, ContentRepository, ContentStats,
    MAX_AUDIT_PAGE_SIZE,
};
use crate::domain::repository_errors::{map_audit_error, map_content_error};
use crate::domain::{
    AdminContext, AuditEntry, AuditPage, Error, Message, Photo, RecordKind, Rsvp,
};

/// Admin read service implementing [`AdminQuery`].
#[derive(Clone)]
pub struct AdminQueryService<R, A> {
    content: Arc<R>,
    audit: Arc<A>,
}

impl<R, A> AdminQueryService<R, A> {
    pub fn new(content: Arc<R>, audit: Arc<A>) -> Self {
        Self { content, audit }
    }
}

#[async_trait]
impl<R, A> AdminQuery for AdminQueryService<R, A>
where
    R: ContentRepository,
    A: AuditLogRepository,
{
    async fn stats(&self, _context: &AdminContext) -> Result<ContentStats, Error> {
        self.content.stats().await.map_err(map_content_error)
    }

    async fn rsvps(&self, _context: &AdminContext) -> Result<Vec<Rsvp>, Error> {
        self.content.list_rsvps().await.map_err(map_content_error)
    }

    async fn messages(&self, _context: &AdminContext) -> Result<Vec<Message>, Error> {
        self.content
            .list_messages(false)
            .await
            .map_err(map_content_error)
    }

    async fn photos(&self, _context: &AdminContext) -> Result<Vec<Photo>, Error> {
        self.content
            .list_photos(false)
            .await
            .map_err(map_content_error)
    }

    async fn audit_logs(
        &self,
        _context: &AdminContext,
        page: AuditLogPageRequest,
    ) -> Result<AuditPage, Error> {
        self.audit
            .page(page.limit(), page.offset())
            .await
            .map_err(map_audit_error)
    }

    async fn recent_audit(
        &self,
        _context: &AdminContext,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, Error> {
        self.audit
            .recent(limit.clamp(1, MAX_AUDIT_PAGE_SIZE))
            .await
            .map_err(map_audit_error)
    }

    async fn audit_trail(
        &self,
        _context: &AdminContext,
        kind: RecordKind,
        id: Uuid,
    ) -> Result<Vec<AuditEntry>, Error> {
        self.audit
            .trail(kind.table_name(), &id.to_string())
            .await
            .map_err(map_audit_error)
    }
}
