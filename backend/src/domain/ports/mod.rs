//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`ContentRepository`, `AuditLogRepository`, `PhotoStorage`)
//! are implemented by outbound adapters. Driving ports (`ModerationCommand`,
//! `AdminQuery`, `GuestCommand`, `GuestQuery`) are what the HTTP adapter
//! calls.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_query;
mod audit_log_repository;
mod content_repository;
mod guest_command;
mod guest_query;
mod moderation_command;
mod photo_storage;

#[cfg(test)]
pub use admin_query::MockAdminQuery;
pub use admin_query::{
    AdminQuery, AuditLogPageRequest, DEFAULT_AUDIT_PAGE_SIZE, MAX_AUDIT_PAGE_SIZE,
};
#[cfg(test)]
pub use audit_log_repository::MockAuditLogRepository;
pub use audit_log_repository::{AuditLogRepository, AuditLogRepositoryError};
#[cfg(test)]
pub use content_repository::MockContentRepository;
pub use content_repository::{
    ContentChange, ContentRepository, ContentRepositoryError, ContentStats, ModerationStats,
    RsvpStats,
};
#[cfg(test)]
pub use guest_command::MockGuestCommand;
pub use guest_command::GuestCommand;
#[cfg(test)]
pub use guest_query::MockGuestQuery;
pub use guest_query::GuestQuery;
#[cfg(test)]
pub use moderation_command::MockModerationCommand;
pub use moderation_command::{ApprovalRequest, ModerationCommand, RemovalRequest};
#[cfg(test)]
pub use photo_storage::MockPhotoStorage;
pub use photo_storage::{PhotoStorage, PhotoStorageError};
