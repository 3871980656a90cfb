//! Translation of driven-port failures into domain errors.
//!
//! Infrastructure detail is logged here and replaced by a generic internal
//! error; only not-found outcomes and RSVP email conflicts keep a
//! client-facing code.

use tracing::error;

use super::ports::{
    AuditLogRepositoryError, ContentChange, ContentRepositoryError, PhotoStorageError,
};
use super::{Error, ErrorCode, RecordKind};

pub(crate) fn map_content_error(error: ContentRepositoryError) -> Error {
    match error {
        ContentRepositoryError::NotFound { kind, .. } => kind.not_found(),
        ContentRepositoryError::Duplicate { message } => {
            error!(%message, "content repository rejected duplicate");
            Error::internal(format!("content repository rejected duplicate: {message}"))
        }
        ContentRepositoryError::Connection { message } => {
            error!(%message, "content repository unavailable");
            Error::internal(format!("content repository unavailable: {message}"))
        }
        ContentRepositoryError::Query { message } => {
            error!(%message, "content repository query failed");
            Error::internal(format!("content repository error: {message}"))
        }
    }
}

/// Failures of `commit(change, ..)`. Only RSVP rows carry a uniqueness rule
/// guests can trip, so other duplicates stay internal.
pub(crate) fn map_commit_error(
    change: &ContentChange,
) -> impl Fn(ContentRepositoryError) -> Error + use<> {
    let (kind, _) = change.target();
    move |error| match error {
        ContentRepositoryError::Duplicate { .. } if kind == RecordKind::Rsvp => {
            Error::from_code(ErrorCode::RsvpAlreadyExists)
        }
        other => map_content_error(other),
    }
}

pub(crate) fn map_audit_error(error: AuditLogRepositoryError) -> Error {
    error!(error = %error, "audit log read failed");
    Error::internal(format!("audit log error: {error}"))
}

pub(crate) fn map_storage_error(error: PhotoStorageError) -> Error {
    error!(error = %error, "photo storage failed");
    Error::new(ErrorCode::PhotoUploadFailed, "Photo upload failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordKind;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case(RecordKind::Rsvp, ErrorCode::RsvpNotFound)]
    #[case(RecordKind::Photo, ErrorCode::PhotoNotFound)]
    fn not_found_keeps_kind(#[case] kind: RecordKind, #[case] expected: ErrorCode) {
        let err = map_content_error(ContentRepositoryError::not_found(kind, Uuid::nil()));
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    fn rsvp_duplicate_maps_to_conflict_code() {
        let change = ContentChange::Restore {
            kind: RecordKind::Rsvp,
            id: Uuid::nil(),
            at: crate::domain::test_fixtures::now(),
        };
        let err = map_commit_error(&change)(ContentRepositoryError::duplicate("rsvps_email"));
        assert_eq!(err.code(), ErrorCode::RsvpAlreadyExists);
    }

    #[rstest]
    fn photo_duplicate_is_not_an_rsvp_conflict() {
        let change = ContentChange::Create(crate::domain::Record::Photo(
            crate::domain::test_fixtures::photo(Uuid::nil()),
        ));
        let err = map_commit_error(&change)(ContentRepositoryError::duplicate("photos_pkey"));
        assert_eq!(err.code(), ErrorCode::InternalServerError);
    }

    #[rstest]
    fn infrastructure_failures_are_internal() {
        let err = map_content_error(ContentRepositoryError::connection("refused"));
        assert_eq!(err.code(), ErrorCode::InternalServerError);
        let err = map_audit_error(AuditLogRepositoryError::query("syntax"));
        assert_eq!(err.code(), ErrorCode::InternalServerError);
        let err = map_storage_error(PhotoStorageError::io("disk full"));
        assert_eq!(err.code(), ErrorCode::PhotoUploadFailed);
    }
}
