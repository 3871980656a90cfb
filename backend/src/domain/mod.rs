//! Domain primitives, aggregates and services.
//!
//! Purpose: model the wedding site's content (the wedding, RSVPs, guestbook
//! messages and photos), the admin moderation workflow over it and the
//! append-only audit ledger that records every change. Nothing here depends
//! on HTTP or Diesel; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable error identifiers.
//! - Record types: [`Wedding`], [`Rsvp`], [`Message`], [`Photo`] and the
//!   [`Record`] union used for audit snapshots.
//! - Services: [`ModerationService`], [`GuestService`], [`AdminQueryService`].
//! - [`AccessGate`]: admin login and bearer token checks.

pub(crate) mod approval;
pub mod audit;
pub mod auth;
pub mod error;
pub mod message;
pub mod photo;
pub mod ports;
pub mod record;
pub(crate) mod repository_errors;
pub mod rsvp;
pub mod trace_id;
pub(crate) mod validation;
pub mod wedding;

mod admin_query_service;
mod guest_service;
mod moderation_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::admin_query_service::AdminQueryService;
pub use self::approval::Approvable;
pub use self::audit::{
    ActorType, AuditAction, AuditDraft, AuditEntry, AuditPage, AuditRecorder, RequestActor,
};
pub use self::auth::{
    AccessGate, AdminContext, AdminPassword, AdminPrincipal, AuthConfig, AuthConfigError,
    DEFAULT_TOKEN_TTL, IssuedCredential, hash_admin_password,
};
pub use self::error::{Error, ErrorCode, FieldViolation};
pub use self::guest_service::GuestService;
pub use self::message::{Message, MessageSubmission};
pub use self::moderation_service::ModerationService;
pub use self::photo::{
    DEFAULT_MAX_UPLOAD_BYTES, Photo, PhotoDetails, PhotoMimeType, PhotoUpload, ValidPhotoUpload,
};
pub use self::record::{ApprovableKind, Record, RecordKind, RemovableKind};
pub use self::rsvp::{AttendanceStatus, DEFAULT_NUMBER_OF_GUESTS, Rsvp, RsvpSubmission, ValidRsvp};
pub use self::trace_id::TraceId;
pub use self::wedding::{Wedding, WeddingPatch};

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use wedding_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
