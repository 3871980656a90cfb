//! Shared Diesel error classification for the repositories.
//!
//! Raw database messages are logged at debug level and never reach the
//! domain; callers see short fixed strings plus the constraint name on
//! uniqueness failures.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{AuditLogRepositoryError, ContentRepositoryError};

use super::pool::PoolError;

/// Persistence failure reduced to what the ports can express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Connection(String),
    Query(&'static str),
    Duplicate(String),
}

impl From<PoolError> for StoreFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for StoreFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(
                    ?kind,
                    message = info.message(),
                    constraint = info.constraint_name(),
                    "diesel operation failed"
                );
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Duplicate(info.constraint_name().unwrap_or("unique constraint").to_owned())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection("database connection error".to_owned())
            }
            DieselError::NotFound => Self::Query("record not found"),
            DieselError::QueryBuilderError(_) => Self::Query("database query error"),
            _ => Self::Query("database error"),
        }
    }
}

impl From<StoreFailure> for ContentRepositoryError {
    fn from(failure: StoreFailure) -> Self {
        match failure {
            StoreFailure::Connection(message) => Self::connection(message),
            StoreFailure::Query(message) => Self::query(message),
            StoreFailure::Duplicate(constraint) => Self::duplicate(constraint),
        }
    }
}

impl From<StoreFailure> for AuditLogRepositoryError {
    fn from(failure: StoreFailure) -> Self {
        match failure {
            StoreFailure::Connection(message) => Self::connection(message),
            StoreFailure::Query(message) => Self::query(message),
            StoreFailure::Duplicate(constraint) => {
                Self::query(format!("duplicate audit entry: {constraint}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let failure = StoreFailure::from(PoolError::checkout("timed out"));
        assert_eq!(failure, StoreFailure::Connection("timed out".to_owned()));
        assert_eq!(
            ContentRepositoryError::from(failure),
            ContentRepositoryError::connection("timed out")
        );
    }

    #[rstest]
    fn missing_rows_are_query_failures() {
        let failure = StoreFailure::from(DieselError::NotFound);
        assert_eq!(
            AuditLogRepositoryError::from(failure),
            AuditLogRepositoryError::query("record not found")
        );
    }

    #[rstest]
    fn rollback_sentinel_is_a_query_failure() {
        assert_eq!(
            StoreFailure::from(DieselError::RollbackTransaction),
            StoreFailure::Query("database error")
        );
    }

    #[rstest]
    fn duplicates_survive_into_content_errors() {
        let err = ContentRepositoryError::from(StoreFailure::Duplicate(
            "rsvps_active_email_key".to_owned(),
        ));
        assert!(matches!(err, ContentRepositoryError::Duplicate { .. }));
    }
}
