//! Success envelope shared by every JSON endpoint.
//!
//! ```text
//! {"success": true, "message": "Message approved successfully", "data": {...}}
//! ```

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// Body of a successful response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    fn respond(status: StatusCode, message: impl Into<String>, data: Option<T>) -> HttpResponse {
        HttpResponse::build(status).json(Self {
            success: true,
            message: message.into(),
            data,
        })
    }
}

/// `200 OK` carrying `data`.
pub(crate) fn ok<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    Envelope::respond(StatusCode::OK, message, Some(data))
}

/// `201 Created` carrying the new record.
pub(crate) fn created<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    Envelope::respond(StatusCode::CREATED, message, Some(data))
}

/// `200 OK` with no payload.
pub(crate) fn message_only(message: impl Into<String>) -> HttpResponse {
    Envelope::<()>::respond(StatusCode::OK, message, None)
}
