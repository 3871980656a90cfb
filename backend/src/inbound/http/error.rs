//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into the `{success: false, error}`
//! envelope with consistent status codes.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(true);

/// Choose whether error `details` reach clients. Disabled in production.
pub fn expose_error_details(enabled: bool) {
    EXPOSE_DETAILS.store(enabled, Ordering::Relaxed);
}

/// Failure envelope written for every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: Error,
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::BadRequest | ErrorCode::InvalidFileType | ErrorCode::FileTooLarge => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::Unauthorized | ErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound
        | ErrorCode::WeddingNotFound
        | ErrorCode::RsvpNotFound
        | ErrorCode::MessageNotFound
        | ErrorCode::PhotoNotFound => StatusCode::NOT_FOUND,
        ErrorCode::RsvpAlreadyExists => StatusCode::CONFLICT,
        ErrorCode::PhotoUploadFailed | ErrorCode::InternalServerError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Body sent for `error`: server failures lose their message and details,
/// and details are dropped entirely unless `expose_details` is set.
pub(crate) fn client_view(error: &Error, expose_details: bool) -> Error {
    let view = if error.code().is_internal() {
        error!(code = ?error.code(), message = %error.message(), trace_id = ?error.trace_id(), "request failed");
        let redacted = Error::from_code(error.code()).without_details();
        match error.trace_id() {
            Some(id) => redacted.with_trace_id(id.to_owned()),
            None => redacted,
        }
    } else {
        error.clone()
    };
    if expose_details {
        view
    } else {
        view.without_details()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(ErrorEnvelope {
            success: false,
            error: client_view(self, EXPOSE_DETAILS.load(Ordering::Relaxed)),
        })
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
