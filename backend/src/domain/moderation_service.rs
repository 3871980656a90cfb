//! Moderation service: admin decisions on guest content with an audit trail.
//!
//! Each operation reads the current record, derives the new state in memory
//! and hands the change plus its ledger entry to
//! [`ContentRepository::commit`]. The snapshot written as `new_values` is
//! exactly the state persisted by the same commit.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    ApprovalRequest, ContentChange, ContentRepository, ModerationCommand, RemovalRequest,
};
use crate::domain::repository_errors::{map_commit_error, map_content_error};
use crate::domain::validation::optional_text;
use crate::domain::{
    AdminContext, Approvable, AuditAction, AuditDraft, AuditRecorder, Error, ErrorCode, Record,
    RecordKind, Wedding, WeddingPatch,
};

const DEFAULT_DELETE_REASON: &str = "Admin deletion";
const DEFAULT_RESTORE_REASON: &str = "Admin restore";

/// Moderation service implementing [`ModerationCommand`].
#[derive(Clone)]
pub struct ModerationService<R> {
    content: Arc<R>,
    recorder: AuditRecorder,
    clock: Arc<dyn Clock>,
}

impl<R> ModerationService<R> {
    /// Create the service over a content repository.
    pub fn new(content: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            content,
            recorder: AuditRecorder::new(Arc::clone(&clock)),
            clock,
        }
    }
}

impl<R> ModerationService<R>
where
    R: ContentRepository,
{
    async fn fetch_active(&self, kind: RecordKind, id: Uuid) -> Result<Record, Error> {
        self.content
            .find_by_id(kind, &id)
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| kind.not_found())
    }

    async fn apply(
        &self,
        context: &AdminContext,
        change: ContentChange,
        draft: AuditDraft,
    ) -> Result<(), Error> {
        let entry = self.recorder.entry(draft, context.actor());
        self.content
            .commit(&change, &entry)
            .await
            .map_err(map_commit_error(&change))
    }
}

fn with_approval(record: Record, approved: bool, at: DateTime<Utc>) -> Result<Record, Error> {
    match record {
        Record::Message(mut message) => {
            message.set_approval(approved, at);
            Ok(Record::Message(message))
        }
        Record::Photo(mut photo) => {
            photo.set_approval(approved, at);
            Ok(Record::Photo(photo))
        }
        other => Err(Error::internal(format!(
            "{} records have no approval state",
            other.kind()
        ))),
    }
}

#[async_trait]
impl<R> ModerationCommand for ModerationService<R>
where
    R: ContentRepository,
{
    async fn set_approval(
        &self,
        context: &AdminContext,
        request: ApprovalRequest,
    ) -> Result<Record, Error> {
        let ApprovalRequest { kind, id, approved } = request;
        let before = self.fetch_active(kind.record_kind(), id).await?;
        let after = with_approval(before.clone(), approved, self.clock.utc())?;
        let draft = AuditDraft::between(
            AuditAction::Update,
            Some(&before),
            Some(&after),
            json!({ "operation": kind.operation(), "approved": approved }),
        )?;

        self.apply(context, ContentChange::Update(after.clone()), draft)
            .await?;
        info!(
            operation = kind.operation(),
            table = kind.record_kind().table_name(),
            record_id = %id,
            approved,
            "moderation decision applied"
        );
        Ok(after)
    }

    async fn remove(&self, context: &AdminContext, request: RemovalRequest) -> Result<(), Error> {
        let RemovalRequest { kind, id, reason } = request;
        let record_kind = kind.record_kind();
        let before = self.fetch_active(record_kind, id).await?;
        let reason = optional_text(reason).unwrap_or_else(|| DEFAULT_DELETE_REASON.to_owned());
        let draft = AuditDraft::between(
            AuditAction::Delete,
            Some(&before),
            None,
            json!({ "operation": kind.delete_operation(), "reason": reason }),
        )?;
        let change = ContentChange::SoftDelete {
            kind: record_kind,
            id,
            at: self.clock.utc(),
        };

        self.apply(context, change, draft).await?;
        info!(
            operation = kind.delete_operation(),
            table = record_kind.table_name(),
            record_id = %id,
            %reason,
            "record soft deleted"
        );
        Ok(())
    }

    async fn restore(
        &self,
        context: &AdminContext,
        request: RemovalRequest,
    ) -> Result<Record, Error> {
        let RemovalRequest { kind, id, reason } = request;
        let record_kind = kind.record_kind();
        let deleted = self
            .content
            .find_deleted_by_id(record_kind, &id)
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| record_kind.not_found())?;
        let at = self.clock.utc();
        let restored = deleted.with_deleted_at(None, at);
        let reason = optional_text(reason).unwrap_or_else(|| DEFAULT_RESTORE_REASON.to_owned());
        let draft = AuditDraft::between(
            AuditAction::Restore,
            None,
            Some(&restored),
            json!({ "operation": kind.restore_operation(), "reason": reason }),
        )?;
        let change = ContentChange::Restore {
            kind: record_kind,
            id,
            at,
        };

        self.apply(context, change, draft).await?;
        info!(
            operation = kind.restore_operation(),
            table = record_kind.table_name(),
            record_id = %id,
            "record restored"
        );
        Ok(restored)
    }

    async fn update_wedding_details(
        &self,
        context: &AdminContext,
        patch: WeddingPatch,
    ) -> Result<Wedding, Error> {
        let patch = patch.validated()?;
        let current = self
            .content
            .current_wedding()
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| Error::from_code(ErrorCode::WeddingNotFound))?;
        let updated = current.clone().patched(patch, self.clock.utc());
        let before = Record::Wedding(current);
        let after = Record::Wedding(updated.clone());
        let draft = AuditDraft::between(
            AuditAction::Update,
            Some(&before),
            Some(&after),
            json!({ "operation": "update_wedding_details" }),
        )?;

        self.apply(context, ContentChange::Update(after), draft).await?;
        info!(
            operation = "update_wedding_details",
            table = RecordKind::Wedding.table_name(),
            record_id = %updated.id,
            "wedding details updated"
        );
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "moderation_service_tests.rs"]
mod tests;
