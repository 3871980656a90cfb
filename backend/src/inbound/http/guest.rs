//! Public guest endpoints: wedding details, RSVPs, the guestbook and photos.
//!
//! Photos are posted as the raw image body with its `Content-Type`; the
//! descriptive fields travel in the query string:
//!
//! ```text
//! POST /api/photos?wedding_id=<uuid>&uploaded_by=Aunt%20May&filename=cake.jpg
//! Content-Type: image/jpeg
//! ```

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use futures_util::StreamExt;
use serde::Deserialize;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Error, MessageSubmission, PhotoDetails, PhotoUpload, RsvpSubmission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::GuestActor;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::schemas::{EnvelopeSchema, ErrorEnvelopeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_uuid;

/// Largest image body the upload route will buffer.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub u64);

/// RSVP form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RsvpRequest {
    pub wedding_id: Uuid,
    #[schema(example = "Jane Doe")]
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    /// `attending`, `not_attending` or `maybe`. Defaults to `maybe`.
    pub attendance_status: Option<String>,
    /// 0 to 10. Defaults to 1.
    pub number_of_guests: Option<i32>,
    pub dietary_restrictions: Option<String>,
    pub special_requests: Option<String>,
}

impl From<RsvpRequest> for RsvpSubmission {
    fn from(value: RsvpRequest) -> Self {
        Self {
            wedding_id: value.wedding_id,
            guest_name: value.guest_name,
            guest_email: value.guest_email,
            guest_phone: value.guest_phone,
            attendance_status: value.attendance_status,
            number_of_guests: value.number_of_guests,
            dietary_restrictions: value.dietary_restrictions,
            special_requests: value.special_requests,
        }
    }
}

/// Guestbook form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MessageRequest {
    pub wedding_id: Uuid,
    pub sender_name: String,
    pub sender_email: Option<String>,
    #[schema(example = "Congratulations to you both!")]
    pub message_content: String,
}

impl From<MessageRequest> for MessageSubmission {
    fn from(value: MessageRequest) -> Self {
        Self {
            wedding_id: value.wedding_id,
            sender_name: value.sender_name,
            sender_email: value.sender_email,
            message_content: value.message_content,
        }
    }
}

/// Descriptive fields for a photo upload.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhotoUploadQuery {
    pub wedding_id: String,
    pub uploaded_by: Option<String>,
    pub caption: Option<String>,
    /// Name of the file on the guest's device.
    pub filename: Option<String>,
}

/// Wedding details for the public site.
#[utoipa::path(
    get,
    path = "/api/wedding",
    responses(
        (status = 200, description = "Wedding details", body = EnvelopeSchema),
        (status = 404, description = "WEDDING_NOT_FOUND", body = ErrorEnvelopeSchema)
    ),
    tags = ["guest"],
    operation_id = "getWedding",
    security([])
)]
#[get("/wedding")]
pub async fn wedding(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let wedding = state.guest_query.wedding().await?;
    Ok(ok("Wedding details retrieved successfully", wedding))
}

/// Submit an RSVP.
#[utoipa::path(
    post,
    path = "/api/rsvp",
    request_body = RsvpRequest,
    responses(
        (status = 201, description = "RSVP stored", body = EnvelopeSchema),
        (status = 400, description = "Validation failed", body = ErrorEnvelopeSchema),
        (status = 404, description = "WEDDING_NOT_FOUND", body = ErrorEnvelopeSchema),
        (status = 409, description = "RSVP_ALREADY_EXISTS", body = ErrorEnvelopeSchema)
    ),
    tags = ["guest"],
    operation_id = "submitRsvp",
    security([])
)]
#[post("/rsvp")]
pub async fn submit_rsvp(
    state: web::Data<HttpState>,
    GuestActor(actor): GuestActor,
    payload: web::Json<RsvpRequest>,
) -> ApiResult<HttpResponse> {
    let rsvp = state
        .guest_command
        .submit_rsvp(&actor, payload.into_inner().into())
        .await?;
    Ok(created("RSVP submitted successfully", rsvp))
}

/// Leave a guestbook message. It stays hidden until approved.
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = MessageRequest,
    responses(
        (status = 201, description = "Message stored", body = EnvelopeSchema),
        (status = 400, description = "Validation failed", body = ErrorEnvelopeSchema)
    ),
    tags = ["guest"],
    operation_id = "submitMessage",
    security([])
)]
#[post("/messages")]
pub async fn submit_message(
    state: web::Data<HttpState>,
    GuestActor(actor): GuestActor,
    payload: web::Json<MessageRequest>,
) -> ApiResult<HttpResponse> {
    let message = state
        .guest_command
        .submit_message(&actor, payload.into_inner().into())
        .await?;
    Ok(created("Message submitted successfully", message))
}

/// Approved guestbook messages.
#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "Approved messages", body = EnvelopeSchema)
    ),
    tags = ["guest"],
    operation_id = "listApprovedMessages",
    security([])
)]
#[get("/messages")]
pub async fn approved_messages(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let messages = state.guest_query.approved_messages().await?;
    Ok(ok("Approved messages retrieved successfully", messages))
}

/// Read at most `limit + 1` bytes so oversized bodies are rejected by size
/// validation without buffering them whole.
async fn read_capped(mut payload: web::Payload, limit: u64) -> Result<Vec<u8>, Error> {
    let cap = usize::try_from(limit.saturating_add(1)).unwrap_or(usize::MAX);
    let mut bytes = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| Error::bad_request(format!("Failed to read upload: {err}")))?;
        let room = cap.saturating_sub(bytes.len());
        bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
        if bytes.len() >= cap {
            debug!(limit, "upload exceeded limit; stopped reading");
            break;
        }
    }
    Ok(bytes)
}

/// Upload a photo. It stays hidden until approved.
#[utoipa::path(
    post,
    path = "/api/photos",
    params(PhotoUploadQuery),
    request_body(content = Vec<u8>, content_type = "image/jpeg", description = "JPEG, PNG or WebP bytes"),
    responses(
        (status = 201, description = "Photo stored", body = EnvelopeSchema),
        (status = 400, description = "INVALID_FILE_TYPE, FILE_TOO_LARGE or validation failure", body = ErrorEnvelopeSchema),
        (status = 500, description = "PHOTO_UPLOAD_FAILED", body = ErrorEnvelopeSchema)
    ),
    tags = ["guest"],
    operation_id = "uploadPhoto",
    security([])
)]
#[post("/photos")]
pub async fn upload_photo(
    state: web::Data<HttpState>,
    limit: web::Data<UploadLimit>,
    req: HttpRequest,
    GuestActor(actor): GuestActor,
    query: web::Query<PhotoUploadQuery>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let PhotoUploadQuery {
        wedding_id,
        uploaded_by,
        caption,
        filename,
    } = query.into_inner();
    let wedding_id = parse_uuid(&wedding_id, "wedding_id")?;
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let bytes = read_capped(payload, limit.0).await?;

    let upload = PhotoUpload {
        details: PhotoDetails {
            wedding_id,
            original_filename: filename,
            uploaded_by,
            caption,
        },
        content_type,
        bytes,
    };
    let photo = state.guest_command.upload_photo(&actor, upload).await?;
    Ok(created("Photo uploaded successfully", photo))
}

/// Approved photos.
#[utoipa::path(
    get,
    path = "/api/photos",
    responses(
        (status = 200, description = "Approved photos", body = EnvelopeSchema)
    ),
    tags = ["guest"],
    operation_id = "listApprovedPhotos",
    security([])
)]
#[get("/photos")]
pub async fn approved_photos(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let photos = state.guest_query.approved_photos().await?;
    Ok(ok("Approved photos retrieved successfully", photos))
}

/// Register the public routes under `/api`, buffering at most
/// `max_upload_bytes` of any photo.
pub fn configure(max_upload_bytes: u64) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api")
                .app_data(web::Data::new(UploadLimit(max_upload_bytes)))
                .service(wedding)
                .service(submit_rsvp)
                .service(submit_message)
                .service(approved_messages)
                .service(upload_photo)
                .service(approved_photos),
        );
    }
}

#[cfg(test)]
#[path = "guest_tests.rs"]
mod tests;
