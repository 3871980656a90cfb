//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses with the status codes documented on [`ErrorCode`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
///
/// Codes serialise in `SCREAMING_SNAKE_CASE` so clients can match on the same
/// identifiers the admin dashboard already understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    BadRequest,
    /// Authentication is missing or the bearer credential is invalid.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// Admin login password did not match.
    InvalidCredentials,
    /// A generic resource does not exist.
    NotFound,
    /// No active wedding is configured.
    WeddingNotFound,
    /// The RSVP does not exist or was removed.
    RsvpNotFound,
    /// An RSVP already exists for the guest email.
    RsvpAlreadyExists,
    /// The message does not exist or was removed.
    MessageNotFound,
    /// The photo does not exist or was removed.
    PhotoNotFound,
    /// The uploaded file is not an accepted image type.
    InvalidFileType,
    /// The uploaded file exceeds the configured size limit.
    FileTooLarge,
    /// The photo could not be stored.
    PhotoUploadFailed,
    /// An unexpected error occurred inside the domain.
    InternalServerError,
}

impl ErrorCode {
    /// Message used when a caller does not supply one.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::InvalidCredentials => "Invalid username or password",
            Self::NotFound => "Resource not found",
            Self::WeddingNotFound => "Wedding information not found",
            Self::RsvpNotFound => "RSVP not found",
            Self::RsvpAlreadyExists => "RSVP already exists for this guest",
            Self::MessageNotFound => "Message not found",
            Self::PhotoNotFound => "Photo not found",
            Self::InvalidFileType => "Invalid file type",
            Self::FileTooLarge => "File too large",
            Self::PhotoUploadFailed => "Photo upload failed",
            Self::InternalServerError => "Internal server error",
        }
    }

    /// Whether the code represents a server-side failure.
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(self, Self::InternalServerError | Self::PhotoUploadFailed)
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Name of the offending field as it appears on the wire.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl FieldViolation {
    /// Build a violation for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is never empty; blank messages fall back to
///   [`ErrorCode::default_message`].
///
/// # Examples
/// ```
/// use wedding_backend::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::MessageNotFound, "");
/// assert_eq!(err.code(), ErrorCode::MessageNotFound);
/// assert_eq!(err.message(), "Message not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl Error {
    /// Create a new error, capturing the trace identifier in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.default_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Create an error carrying the code's default message.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Correlation identifier captured when the error was raised.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach structured details to the error.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach a trace identifier to the error.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Drop supplementary details, keeping code and message.
    #[must_use]
    pub fn without_details(mut self) -> Self {
        self.details = None;
        self
    }

    /// Convenience constructor for [`ErrorCode::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Itemised validation failure: `BAD_REQUEST` with `[{field, message}]`.
    ///
    /// # Examples
    /// ```
    /// use wedding_backend::domain::{Error, ErrorCode, FieldViolation};
    ///
    /// let err = Error::validation(vec![FieldViolation::new("guest_name", "required")]);
    /// assert_eq!(err.code(), ErrorCode::BadRequest);
    /// assert_eq!(err.message(), "Validation failed");
    /// assert!(err.details().is_some_and(serde_json::Value::is_array));
    /// ```
    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        let details = serde_json::to_value(&violations).unwrap_or(Value::Null);
        Self::bad_request("Validation failed").with_details(details)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalServerError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalServerError, message)
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Self::from_code(code)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
