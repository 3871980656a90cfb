//! Read port for the audit ledger.
//!
//! Entries are appended by [`super::ContentRepository::commit`]; this port
//! only reads them back. All listings are ordered most recent first.

use async_trait::async_trait;

use crate::domain::{AuditEntry, AuditPage};

use super::define_port_error;

define_port_error! {
    /// Errors raised by audit ledger adapters.
    pub enum AuditLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "audit log connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "audit log query failed: {message}",
    }
}

/// Port for reading audit entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Every entry for one record.
    async fn trail(
        &self,
        table_name: &str,
        record_id: &str,
    ) -> Result<Vec<AuditEntry>, AuditLogRepositoryError>;

    /// The newest `limit` entries.
    async fn recent(&self, limit: i64) -> Result<Vec<AuditEntry>, AuditLogRepositoryError>;

    /// A page of entries plus the ledger size.
    async fn page(&self, limit: i64, offset: i64) -> Result<AuditPage, AuditLogRepositoryError>;
}
