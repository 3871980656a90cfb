//! PostgreSQL-backed `ContentRepository` using Diesel.
//!
//! Reads filter out soft-deleted rows unless asked for them. `commit`
//! applies the content change and inserts its audit row inside one
//! transaction; a change that matches no row rolls the transaction back and
//! surfaces as `NotFound`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{
    ContentChange, ContentRepository, ContentRepositoryError, ContentStats, ModerationStats,
    RsvpStats,
};
use crate::domain::{AttendanceStatus, AuditEntry, Message, Photo, Record, RecordKind, Rsvp, Wedding};

use super::error_mapping::StoreFailure;
use super::models::{MessageRow, NewAuditLogRow, PhotoRow, RsvpRow, WeddingRow};
use super::pool::DbPool;
use super::schema::{audit_logs, messages, photos, rsvps, weddings};

diesel::define_sql_function! {
    /// SQL `lower()` over a nullable text column.
    fn lower(value: diesel::sql_types::Nullable<diesel::sql_types::Varchar>)
        -> diesel::sql_types::Nullable<diesel::sql_types::Varchar>;
}

/// Which side of the soft-delete marker a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowState {
    Active,
    Deleted,
}

/// Failure inside the commit transaction.
#[derive(Debug)]
enum CommitError {
    Diesel(DieselError),
    /// The change matched no row; the transaction is rolled back.
    Missing,
}

impl From<DieselError> for CommitError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

/// Diesel-backed implementation of the `ContentRepository` port.
#[derive(Clone)]
pub struct DieselContentRepository {
    pool: DbPool,
}

impl DieselContentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load(
        &self,
        kind: RecordKind,
        id: Uuid,
        state: RowState,
    ) -> Result<Option<Record>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;
        load_record(&mut conn, kind, id, state).await.map_err(Into::into)
    }
}

fn invalid_rsvp(error: String) -> StoreFailure {
    warn!(%error, "rsvp row failed to decode");
    StoreFailure::Query("invalid rsvp row")
}

fn rsvps_from_rows(rows: Vec<RsvpRow>) -> Result<Vec<Rsvp>, StoreFailure> {
    rows.into_iter()
        .map(|row| Rsvp::try_from(row).map_err(invalid_rsvp))
        .collect()
}

/// Apply the deletion-state filter to a boxed query over `$table`.
macro_rules! with_state {
    ($query:expr, $table:ident, $state:expr) => {
        match $state {
            RowState::Active => $query.filter($table::deleted_at.is_null()),
            RowState::Deleted => $query.filter($table::deleted_at.is_not_null()),
        }
    };
}

async fn load_record(
    conn: &mut AsyncPgConnection,
    kind: RecordKind,
    id: Uuid,
    state: RowState,
) -> Result<Option<Record>, StoreFailure> {
    let record = match kind {
        RecordKind::Wedding => {
            let query = weddings::table
                .filter(weddings::id.eq(id))
                .select(WeddingRow::as_select())
                .into_boxed();
            with_state!(query, weddings, state)
                .first(conn)
                .await
                .optional()?
                .map(|row| Record::Wedding(Wedding::from(row)))
        }
        RecordKind::Rsvp => {
            let query = rsvps::table
                .filter(rsvps::id.eq(id))
                .select(RsvpRow::as_select())
                .into_boxed();
            with_state!(query, rsvps, state)
                .first(conn)
                .await
                .optional()?
                .map(Rsvp::try_from)
                .transpose()
                .map_err(invalid_rsvp)?
                .map(Record::Rsvp)
        }
        RecordKind::Message => {
            let query = messages::table
                .filter(messages::id.eq(id))
                .select(MessageRow::as_select())
                .into_boxed();
            with_state!(query, messages, state)
                .first(conn)
                .await
                .optional()?
                .map(|row| Record::Message(Message::from(row)))
        }
        RecordKind::Photo => {
            let query = photos::table
                .filter(photos::id.eq(id))
                .select(PhotoRow::as_select())
                .into_boxed();
            with_state!(query, photos, state)
                .first(conn)
                .await
                .optional()?
                .map(|row| Record::Photo(Photo::from(row)))
        }
    };
    Ok(record)
}

async fn insert_record(conn: &mut AsyncPgConnection, record: &Record) -> Result<(), CommitError> {
    match record {
        Record::Wedding(wedding) => {
            diesel::insert_into(weddings::table)
                .values(WeddingRow::from(wedding))
                .execute(conn)
                .await?;
        }
        Record::Rsvp(rsvp) => {
            diesel::insert_into(rsvps::table)
                .values(RsvpRow::from(rsvp))
                .execute(conn)
                .await?;
        }
        Record::Message(message) => {
            diesel::insert_into(messages::table)
                .values(MessageRow::from(message))
                .execute(conn)
                .await?;
        }
        Record::Photo(photo) => {
            diesel::insert_into(photos::table)
                .values(PhotoRow::from(photo))
                .execute(conn)
                .await?;
        }
    }
    Ok(())
}

/// Overwrite an active row; returns the number of rows touched.
async fn update_record(conn: &mut AsyncPgConnection, record: &Record) -> Result<usize, DieselError> {
    match record {
        Record::Wedding(wedding) => {
            diesel::update(
                weddings::table
                    .filter(weddings::id.eq(wedding.id))
                    .filter(weddings::deleted_at.is_null()),
            )
            .set(WeddingRow::from(wedding))
            .execute(conn)
            .await
        }
        Record::Rsvp(rsvp) => {
            diesel::update(
                rsvps::table
                    .filter(rsvps::id.eq(rsvp.id))
                    .filter(rsvps::deleted_at.is_null()),
            )
            .set(RsvpRow::from(rsvp))
            .execute(conn)
            .await
        }
        Record::Message(message) => {
            diesel::update(
                messages::table
                    .filter(messages::id.eq(message.id))
                    .filter(messages::deleted_at.is_null()),
            )
            .set(MessageRow::from(message))
            .execute(conn)
            .await
        }
        Record::Photo(photo) => {
            diesel::update(
                photos::table
                    .filter(photos::id.eq(photo.id))
                    .filter(photos::deleted_at.is_null()),
            )
            .set(PhotoRow::from(photo))
            .execute(conn)
            .await
        }
    }
}

/// Set or clear the soft-delete marker of one row currently in `$from`
/// state; evaluates to the number of rows touched.
macro_rules! set_deleted_at {
    ($conn:expr, $table:ident, $id:expr, $from:expr, $marker:expr, $at:expr) => {{
        let target = $table::table.filter($table::id.eq($id));
        match $from {
            RowState::Active => {
                diesel::update(target.filter($table::deleted_at.is_null()))
                    .set(($table::deleted_at.eq($marker), $table::updated_at.eq($at)))
                    .execute($conn)
                    .await
            }
            RowState::Deleted => {
                diesel::update(target.filter($table::deleted_at.is_not_null()))
                    .set(($table::deleted_at.eq($marker), $table::updated_at.eq($at)))
                    .execute($conn)
                    .await
            }
        }
    }};
}

async fn mark_deleted(
    conn: &mut AsyncPgConnection,
    kind: RecordKind,
    id: Uuid,
    at: DateTime<Utc>,
    restore: bool,
) -> Result<usize, DieselError> {
    let (from, marker) = if restore {
        (RowState::Deleted, None)
    } else {
        (RowState::Active, Some(at))
    };
    match kind {
        RecordKind::Wedding => set_deleted_at!(conn, weddings, id, from, marker, at),
        RecordKind::Rsvp => set_deleted_at!(conn, rsvps, id, from, marker, at),
        RecordKind::Message => set_deleted_at!(conn, messages, id, from, marker, at),
        RecordKind::Photo => set_deleted_at!(conn, photos, id, from, marker, at),
    }
}

async fn apply_change(conn: &mut AsyncPgConnection, change: &ContentChange) -> Result<(), CommitError> {
    let touched = match change {
        ContentChange::Create(record) => return insert_record(conn, record).await,
        ContentChange::Update(record) => update_record(conn, record).await?,
        ContentChange::SoftDelete { kind, id, at } => mark_deleted(conn, *kind, *id, *at, false).await?,
        ContentChange::Restore { kind, id, at } => mark_deleted(conn, *kind, *id, *at, true).await?,
    };
    if touched == 0 {
        return Err(CommitError::Missing);
    }
    Ok(())
}

#[async_trait]
impl ContentRepository for DieselContentRepository {
    async fn find_by_id(
        &self,
        kind: RecordKind,
        id: &Uuid,
    ) -> Result<Option<Record>, ContentRepositoryError> {
        self.load(kind, *id, RowState::Active).await
    }

    async fn find_deleted_by_id(
        &self,
        kind: RecordKind,
        id: &Uuid,
    ) -> Result<Option<Record>, ContentRepositoryError> {
        self.load(kind, *id, RowState::Deleted).await
    }

    async fn current_wedding(&self) -> Result<Option<Wedding>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;
        let row = weddings::table
            .filter(weddings::deleted_at.is_null())
            .order((weddings::created_at.asc(), weddings::id.asc()))
            .select(WeddingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(StoreFailure::from)?;
        Ok(row.map(Wedding::from))
    }

    async fn find_rsvp_by_email(
        &self,
        wedding_id: &Uuid,
        email: &str,
    ) -> Result<Option<Rsvp>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;
        let row = rsvps::table
            .filter(rsvps::wedding_id.eq(wedding_id))
            .filter(rsvps::deleted_at.is_null())
            .filter(lower(rsvps::guest_email).eq(email.to_lowercase()))
            .select(RsvpRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(StoreFailure::from)?;
        row.map(Rsvp::try_from)
            .transpose()
            .map_err(|err| ContentRepositoryError::from(invalid_rsvp(err)))
    }

    async fn list_rsvps(&self) -> Result<Vec<Rsvp>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;
        let rows = rsvps::table
            .filter(rsvps::deleted_at.is_null())
            .order((rsvps::created_at.desc(), rsvps::id.desc()))
            .select(RsvpRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreFailure::from)?;
        Ok(rsvps_from_rows(rows)?)
    }

    async fn list_messages(
        &self,
        approved_only: bool,
    ) -> Result<Vec<Message>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;
        let mut query = messages::table
            .filter(messages::deleted_at.is_null())
            .into_boxed();
        if approved_only {
            query = query.filter(messages::is_approved.eq(true));
        }
        let rows = query
            .order((messages::created_at.desc(), messages::id.desc()))
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreFailure::from)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn list_photos(&self, approved_only: bool) -> Result<Vec<Photo>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;
        let mut query = photos::table.filter(photos::deleted_at.is_null()).into_boxed();
        if approved_only {
            query = query.filter(photos::is_approved.eq(true));
        }
        let rows = query
            .order((photos::created_at.desc(), photos::id.desc()))
            .select(PhotoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreFailure::from)?;
        Ok(rows.into_iter().map(Photo::from).collect())
    }

    async fn stats(&self) -> Result<ContentStats, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;
        let stats = collect_stats(&mut conn).await.map_err(StoreFailure::from)?;
        Ok(stats)
    }

    async fn commit(
        &self,
        change: &ContentChange,
        audit: &AuditEntry,
    ) -> Result<(), ContentRepositoryError> {
        let (kind, id) = change.target();
        let mut conn = self.pool.get().await.map_err(StoreFailure::from)?;

        conn.transaction(|conn| {
            async move {
                apply_change(conn, change).await?;
                diesel::insert_into(audit_logs::table)
                    .values(NewAuditLogRow::from(audit))
                    .execute(conn)
                    .await?;
                Ok::<(), CommitError>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| match err {
            CommitError::Missing => {
                debug!(%kind, %id, action = change.action().as_str(), "change matched no row");
                ContentRepositoryError::not_found(kind, id)
            }
            CommitError::Diesel(error) => StoreFailure::from(error).into(),
        })
    }
}

async fn collect_stats(conn: &mut AsyncPgConnection) -> Result<ContentStats, DieselError> {
    let active_rsvps = || rsvps::table.filter(rsvps::deleted_at.is_null());
    let total = active_rsvps().count().get_result::<i64>(conn).await?;
    let attending = active_rsvps()
        .filter(rsvps::attendance_status.eq(AttendanceStatus::Attending.as_str()))
        .count()
        .get_result::<i64>(conn)
        .await?;
    let total_guests = active_rsvps()
        .filter(rsvps::attendance_status.eq(AttendanceStatus::Attending.as_str()))
        .select(diesel::dsl::sum(rsvps::number_of_guests))
        .first::<Option<i64>>(conn)
        .await?
        .unwrap_or(0);

    let message_total = messages::table
        .filter(messages::deleted_at.is_null())
        .count()
        .get_result::<i64>(conn)
        .await?;
    let message_approved = messages::table
        .filter(messages::deleted_at.is_null())
        .filter(messages::is_approved.eq(true))
        .count()
        .get_result::<i64>(conn)
        .await?;

    let photo_total = photos::table
        .filter(photos::deleted_at.is_null())
        .count()
        .get_result::<i64>(conn)
        .await?;
    let photo_approved = photos::table
        .filter(photos::deleted_at.is_null())
        .filter(photos::is_approved.eq(true))
        .count()
        .get_result::<i64>(conn)
        .await?;

    Ok(ContentStats {
        rsvps: RsvpStats {
            total,
            attending,
            total_guests,
        },
        messages: ModerationStats::from_counts(message_total, message_approved),
        photos: ModerationStats::from_counts(photo_total, photo_approved),
    })
}

#[cfg(test)]
mod tests {
    //! Unit coverage for the pieces that do not need a live database.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_rows_become_typed_not_found() {
        let id = Uuid::from_u128(9);
        let err = ContentRepositoryError::not_found(RecordKind::Photo, id);
        assert_eq!(err.to_string(), format!("photo {id} not found"));
    }

    #[rstest]
    fn unknown_attendance_is_a_query_failure() {
        assert_eq!(
            invalid_rsvp("unknown attendance status: perhaps".to_owned()),
            StoreFailure::Query("invalid rsvp row")
        );
    }

    #[rstest]
    fn diesel_errors_inside_commit_are_wrapped() {
        assert!(matches!(
            CommitError::from(DieselError::RollbackTransaction),
            CommitError::Diesel(DieselError::RollbackTransaction)
        ));
    }
}
