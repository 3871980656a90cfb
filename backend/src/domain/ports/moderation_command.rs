//! Driving port for admin moderation.
//!
//! Every method takes an [`AdminContext`], so callers must have passed the
//! access gate before any content is touched.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AdminContext, ApprovableKind, Error, Record, RemovableKind, Wedding, WeddingPatch,
};

/// Approve or hide a message or photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalRequest {
    pub kind: ApprovableKind,
    pub id: Uuid,
    pub approved: bool,
}

/// Soft delete or restore a guest record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalRequest {
    pub kind: RemovableKind,
    pub id: Uuid,
    pub reason: Option<String>,
}

/// Port for moderation use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationCommand: Send + Sync {
    /// Set the approval flag and return the updated record.
    async fn set_approval(
        &self,
        context: &AdminContext,
        request: ApprovalRequest,
    ) -> Result<Record, Error>;

    /// Soft delete a record.
    async fn remove(&self, context: &AdminContext, request: RemovalRequest) -> Result<(), Error>;

    /// Bring a soft-deleted record back and return it.
    async fn restore(
        &self,
        context: &AdminContext,
        request: RemovalRequest,
    ) -> Result<Record, Error>;

    /// Patch the wedding details and return the new state.
    async fn update_wedding_details(
        &self,
        context: &AdminContext,
        patch: WeddingPatch,
    ) -> Result<Wedding, Error>;
}
