//! PostgreSQL-backed `AuditLogRepository` using Diesel.
//!
//! Rows are returned newest first. Entries written in the same instant keep
//! insertion order through the `seq` column.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AuditLogRepository, AuditLogRepositoryError};
use crate::domain::{AuditEntry, AuditPage};

use super::error_mapping::StoreFailure;
use super::models::AuditLogRow;
use super::pool::DbPool;
use super::schema::audit_logs;

/// Diesel-backed implementation of the `AuditLogRepository` port.
#[derive(Clone)]
pub struct DieselAuditLogRepository {
    pool: DbPool,
}

impl DieselAuditLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn entries_from_rows(rows: Vec<AuditLogRow>) -> Result<Vec<AuditEntry>, AuditLogRepositoryError> {
    rows.into_iter()
        .map(|row| {
            AuditEntry::try_from(row).map_err(|error| {
                warn!(%error, "audit row failed to decode");
                AuditLogRepositoryError::query("invalid audit row")
            })
        })
        .collect()
}

#[async_trait]
impl AuditLogRepository for DieselAuditLogRepository {
    async fn trail(
        &self,
        table_name: &str,
        record_id: &str,
    ) -> Result<Vec<AuditEntry>, AuditLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;
        let rows = audit_logs::table
            .filter(audit_logs::table_name.eq(table_name))
            .filter(audit_logs::record_id.eq(record_id))
            .order((audit_logs::created_at.desc(), audit_logs::seq.desc()))
            .select(AuditLogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreFailure::from)?;
        entries_from_rows(rows)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<AuditEntry>, AuditLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;
        let rows = audit_logs::table
            .order((audit_logs::created_at.desc(), audit_logs::seq.desc()))
            .limit(limit)
            .select(AuditLogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreFailure::from)?;
        entries_from_rows(rows)
    }

    async fn page(&self, limit: i64, offset: i64) -> Result<AuditPage, AuditLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;
        let total = audit_logs::table
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(StoreFailure::from)?;
        let rows = audit_logs::table
            .order((audit_logs::created_at.desc(), audit_logs::seq.desc()))
            .limit(limit)
            .offset(offset)
            .select(AuditLogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreFailure::from)?;
        Ok(AuditPage {
            entries: entries_from_rows(rows)?,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::now;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(action: &str) -> AuditLogRow {
        AuditLogRow {
            id: Uuid::from_u128(7),
            table_name: "rsvps".to_owned(),
            record_id: Uuid::from_u128(8).to_string(),
            action: action.to_owned(),
            old_values: None,
            new_values: None,
            user_id: None,
            user_type: Some("guest".to_owned()),
            ip_address: Some("192.0.2.1".to_owned()),
            user_agent: None,
            metadata: None,
            created_at: now(),
        }
    }

    #[rstest]
    fn rows_decode_in_order() {
        let entries = entries_from_rows(vec![row("CREATE"), row("DELETE")]).expect("decoded");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].action.as_str(), "DELETE");
    }

    #[rstest]
    fn one_bad_row_fails_the_listing() {
        let err = entries_from_rows(vec![row("CREATE"), row("ARCHIVE")]).expect_err("bad row");
        assert_eq!(err, AuditLogRepositoryError::query("invalid audit row"));
    }
}
