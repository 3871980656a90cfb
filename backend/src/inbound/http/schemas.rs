//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The wrappers mirror the serialised shape of their domain counterparts but
//! live in the inbound adapter layer where framework concerns belong.
#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa's derive output"
)]

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "BAD_REQUEST")]
    BadRequest,
    #[schema(rename = "UNAUTHORIZED")]
    Unauthorized,
    #[schema(rename = "FORBIDDEN")]
    Forbidden,
    #[schema(rename = "INVALID_CREDENTIALS")]
    InvalidCredentials,
    #[schema(rename = "NOT_FOUND")]
    NotFound,
    #[schema(rename = "WEDDING_NOT_FOUND")]
    WeddingNotFound,
    #[schema(rename = "RSVP_NOT_FOUND")]
    RsvpNotFound,
    #[schema(rename = "RSVP_ALREADY_EXISTS")]
    RsvpAlreadyExists,
    #[schema(rename = "MESSAGE_NOT_FOUND")]
    MessageNotFound,
    #[schema(rename = "PHOTO_NOT_FOUND")]
    PhotoNotFound,
    #[schema(rename = "INVALID_FILE_TYPE")]
    InvalidFileType,
    #[schema(rename = "FILE_TOO_LARGE")]
    FileTooLarge,
    #[schema(rename = "PHOTO_UPLOAD_FAILED")]
    PhotoUploadFailed,
    #[schema(rename = "INTERNAL_SERVER_ERROR")]
    InternalServerError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
pub struct ErrorSchema {
    code: ErrorCodeSchema,
    #[schema(example = "Validation failed")]
    message: String,
    /// `[{field, message}]` for validation failures; omitted in production.
    details: Option<Value>,
    #[schema(example = "6f1c1c36-0d3c-4a8e-9a55-5f0f6f3fb0a1")]
    trace_id: Option<String>,
}

/// Failure envelope.
#[derive(ToSchema)]
#[schema(as = crate::inbound::http::error::ErrorEnvelope)]
pub struct ErrorEnvelopeSchema {
    /// Always `false`.
    success: bool,
    error: ErrorSchema,
}

/// Success envelope; `data` depends on the endpoint.
#[derive(ToSchema)]
#[schema(as = crate::inbound::http::envelope::Envelope)]
pub struct EnvelopeSchema {
    /// Always `true`.
    success: bool,
    #[schema(example = "Message approved successfully")]
    message: String,
    data: Option<Value>,
}

/// OpenAPI schema for [`crate::domain::Wedding`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Wedding)]
pub struct WeddingSchema {
    id: Uuid,
    #[schema(example = "Sarah Johnson")]
    bride_name: String,
    #[schema(example = "Michael Davis")]
    groom_name: String,
    wedding_date: NaiveDate,
    wedding_time: Option<NaiveTime>,
    venue_name: String,
    venue_address: String,
    ceremony_time: Option<NaiveTime>,
    ceremony_location: Option<String>,
    reception_time: Option<NaiveTime>,
    reception_location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// OpenAPI schema for [`crate::domain::Rsvp`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Rsvp)]
pub struct RsvpSchema {
    id: Uuid,
    wedding_id: Uuid,
    guest_name: String,
    guest_email: Option<String>,
    guest_phone: Option<String>,
    #[schema(example = "attending")]
    attendance_status: String,
    #[schema(minimum = 0, maximum = 10)]
    number_of_guests: i32,
    dietary_restrictions: Option<String>,
    special_requests: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// OpenAPI schema for [`crate::domain::Message`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Message)]
pub struct MessageSchema {
    id: Uuid,
    wedding_id: Uuid,
    sender_name: String,
    sender_email: Option<String>,
    message_content: String,
    is_approved: bool,
    /// Set exactly when `is_approved` is true.
    approved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// OpenAPI schema for [`crate::domain::Photo`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Photo)]
pub struct PhotoSchema {
    id: Uuid,
    wedding_id: Uuid,
    filename: String,
    original_filename: String,
    file_path: String,
    file_size: i64,
    #[schema(example = "image/jpeg")]
    mime_type: String,
    uploaded_by: Option<String>,
    caption: Option<String>,
    is_approved: bool,
    approved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// OpenAPI schema for [`crate::domain::AuditEntry`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AuditEntry)]
pub struct AuditEntrySchema {
    id: Uuid,
    #[schema(example = "messages")]
    table_name: String,
    record_id: String,
    #[schema(example = "UPDATE")]
    action: String,
    old_values: Option<Value>,
    new_values: Option<Value>,
    #[schema(example = "admin")]
    user_id: Option<String>,
    #[schema(example = "admin")]
    user_type: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    metadata: Option<Value>,
    created_at: DateTime<Utc>,
}

/// Dashboard counts.
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::ContentStats)]
pub struct ContentStatsSchema {
    /// `{total, attending, total_guests}`.
    rsvps: Value,
    /// `{total, approved, pending}`.
    messages: Value,
    /// `{total, approved, pending}`.
    photos: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_codes_use_wire_spelling() {
        let json = schema_json::<ErrorCodeSchema>();
        assert!(json.contains("RSVP_ALREADY_EXISTS"));
        assert!(json.contains("PHOTO_UPLOAD_FAILED"));
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
    }

    #[test]
    fn message_schema_lists_approval_fields() {
        let json = schema_json::<MessageSchema>();
        assert!(json.contains("is_approved"));
        assert!(json.contains("approved_at"));
    }
}
