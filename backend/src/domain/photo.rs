//! Guest photo uploads.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::approval::impl_approvable;
use super::validation::{ensure_valid, optional_text};
use super::{Error, ErrorCode};

/// Upload size limit applied when none is configured: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted image MIME types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoMimeType {
    Jpeg,
    /// Non-standard alias some browsers still send.
    Jpg,
    Png,
    Webp,
}

impl PhotoMimeType {
    /// Canonical MIME string as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Jpg => "image/jpg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// File extension used for generated filenames.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg | Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

impl FromStr for PhotoMimeType {
    type Err = Error;

    /// Parse a `Content-Type` value, ignoring parameters and case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" => Ok(Self::Jpeg),
            "image/jpg" => Ok(Self::Jpg),
            "image/png" => Ok(Self::Png),
            "image/webp" => Ok(Self::Webp),
            _ => Err(Error::new(
                ErrorCode::InvalidFileType,
                "Invalid file type. Only JPEG, PNG, and WebP images are allowed.",
            )),
        }
    }
}

/// A stored photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub wedding_id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_by: Option<String>,
    pub caption: Option<String>,
    pub is_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_approvable!(Photo);

/// Descriptive fields sent alongside the image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct PhotoDetails {
    pub wedding_id: Uuid,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub original_filename: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub uploaded_by: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub caption: Option<String>,
}

/// A guest upload before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub details: PhotoDetails,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// An upload that passed type, size and field checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPhotoUpload {
    pub details: PhotoDetails,
    pub mime_type: PhotoMimeType,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    /// Check the MIME type, the size limit and the descriptive fields.
    ///
    /// # Errors
    /// `INVALID_FILE_TYPE`, `FILE_TOO_LARGE` or an itemised `BAD_REQUEST`.
    pub fn validated(self, max_bytes: u64) -> Result<ValidPhotoUpload, Error> {
        let mime_type: PhotoMimeType = self.content_type.parse()?;
        let size = u64::try_from(self.bytes.len()).unwrap_or(u64::MAX);
        if size == 0 {
            return Err(Error::bad_request("No photo uploaded"));
        }
        if size > max_bytes {
            return Err(Error::new(
                ErrorCode::FileTooLarge,
                format!("File too large. Maximum size is {max_bytes} bytes."),
            ));
        }
        let details = PhotoDetails {
            wedding_id: self.details.wedding_id,
            original_filename: optional_text(self.details.original_filename),
            uploaded_by: optional_text(self.details.uploaded_by),
            caption: optional_text(self.details.caption),
        };
        ensure_valid(&details, Vec::new())?;
        Ok(ValidPhotoUpload {
            details,
            mime_type,
            bytes: self.bytes,
        })
    }
}

impl ValidPhotoUpload {
    /// Build the stored filename: `<millis>-<suffix>-<stem>.<ext>`.
    ///
    /// The stem keeps ASCII alphanumerics, `-` and `_` from the original name
    /// and falls back to `photo`.
    #[must_use]
    pub fn generated_filename(&self, at: DateTime<Utc>, suffix: u32) -> String {
        let stem = self
            .details
            .original_filename
            .as_deref()
            .map(|name| name.rsplit_once('.').map_or(name, |(stem, _)| stem))
            .map(sanitise_stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "photo".to_owned());
        format!(
            "{}-{suffix}-{stem}.{}",
            at.timestamp_millis(),
            self.mime_type.extension()
        )
    }

    /// Materialise an unapproved photo stored under `filename`.
    #[must_use]
    pub fn into_photo(self, id: Uuid, filename: String, file_path: String, at: DateTime<Utc>) -> Photo {
        let original_filename = self
            .details
            .original_filename
            .unwrap_or_else(|| filename.clone());
        Photo {
            id,
            wedding_id: self.details.wedding_id,
            file_size: i64::try_from(self.bytes.len()).unwrap_or(i64::MAX),
            filename,
            original_filename,
            file_path,
            mime_type: self.mime_type.as_str().to_owned(),
            uploaded_by: self.details.uploaded_by,
            caption: self.details.caption,
            is_approved: false,
            approved_at: None,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }
}

fn sanitise_stem(stem: &str) -> String {
    stem.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .take(64)
        .collect()
}
