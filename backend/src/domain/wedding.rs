//! The wedding record and admin edits to it.
//!
//! A deployment serves a single wedding. Reads pick the oldest active row;
//! nothing in the schema prevents a second row, but the application never
//! creates one.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Error;
use super::validation::{ensure_valid, optional_text, trimmed};

/// Wedding details shown on the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wedding {
    pub id: Uuid,
    pub bride_name: String,
    pub groom_name: String,
    pub wedding_date: NaiveDate,
    pub wedding_time: Option<NaiveTime>,
    pub venue_name: String,
    pub venue_address: String,
    pub ceremony_time: Option<NaiveTime>,
    pub ceremony_location: Option<String>,
    pub reception_time: Option<NaiveTime>,
    pub reception_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Partial update applied by an administrator.
///
/// `None` leaves a field untouched. Nullable columns use a nested `Option`
/// so `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeddingPatch {
    pub bride_name: Option<String>,
    pub groom_name: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub wedding_time: Option<Option<NaiveTime>>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub ceremony_time: Option<Option<NaiveTime>>,
    pub ceremony_location: Option<Option<String>>,
    pub reception_time: Option<Option<NaiveTime>>,
    pub reception_location: Option<Option<String>>,
}

#[derive(Validate)]
struct PatchFields {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    bride_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    groom_name: Option<String>,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    venue_name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    venue_address: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    ceremony_location: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    reception_location: Option<String>,
}

impl WeddingPatch {
    /// Trim text fields and reject values that violate column constraints.
    ///
    /// # Errors
    /// Returns a `BAD_REQUEST` error listing each offending field.
    pub fn validated(self) -> Result<Self, Error> {
        let patch = Self {
            bride_name: self.bride_name.as_deref().map(trimmed),
            groom_name: self.groom_name.as_deref().map(trimmed),
            venue_name: self.venue_name.as_deref().map(trimmed),
            venue_address: self.venue_address.as_deref().map(trimmed),
            ceremony_location: self.ceremony_location.map(optional_text),
            reception_location: self.reception_location.map(optional_text),
            ..self
        };
        let fields = PatchFields {
            bride_name: patch.bride_name.clone(),
            groom_name: patch.groom_name.clone(),
            venue_name: patch.venue_name.clone(),
            venue_address: patch.venue_address.clone(),
            ceremony_location: patch.ceremony_location.clone().flatten(),
            reception_location: patch.reception_location.clone().flatten(),
        };
        ensure_valid(&fields, Vec::new())?;
        Ok(patch)
    }
}

impl Wedding {
    /// Apply `patch` and stamp `updated_at`.
    #[must_use]
    pub fn patched(mut self, patch: WeddingPatch, at: DateTime<Utc>) -> Self {
        let WeddingPatch {
            bride_name,
            groom_name,
            wedding_date,
            wedding_time,
            venue_name,
            venue_address,
            ceremony_time,
            ceremony_location,
            reception_time,
            reception_location,
        } = patch;
        if let Some(value) = bride_name {
            self.bride_name = value;
        }
        if let Some(value) = groom_name {
            self.groom_name = value;
        }
        if let Some(value) = wedding_date {
            self.wedding_date = value;
        }
        if let Some(value) = wedding_time {
            self.wedding_time = value;
        }
        if let Some(value) = venue_name {
            self.venue_name = value;
        }
        if let Some(value) = venue_address {
            self.venue_address = value;
        }
        if let Some(value) = ceremony_time {
            self.ceremony_time = value;
        }
        if let Some(value) = ceremony_location {
            self.ceremony_location = value;
        }
        if let Some(value) = reception_time {
            self.reception_time = value;
        }
        if let Some(value) = reception_location {
            self.reception_location = value;
        }
        self.updated_at = at;
        self
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn wedding() -> Wedding {
        let created = Utc
            .with_ymd_and_hms(2024, 6, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        Wedding {
            id: Uuid::from_u128(0x5eed),
            bride_name: "Sarah Johnson".to_owned(),
            groom_name: "Michael Davis".to_owned(),
            wedding_date: NaiveDate::from_ymd_opt(2024, 12, 15).expect("valid date"),
            wedding_time: NaiveTime::from_hms_opt(16, 0, 0),
            venue_name: "Grand Garden Hotel".to_owned(),
            venue_address: "123 Garden Lane".to_owned(),
            ceremony_time: NaiveTime::from_hms_opt(16, 0, 0),
            ceremony_location: Some("Rose Garden".to_owned()),
            reception_time: NaiveTime::from_hms_opt(18, 0, 0),
            reception_location: Some("Grand Ballroom".to_owned()),
            created_at: created,
            updated_at: created,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn patch_updates_only_supplied_fields() {
        let wedding = fixtures::wedding();
        let at = Utc
            .with_ymd_and_hms(2024, 7, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let patch = WeddingPatch {
            venue_name: Some("Lakeside Pavilion".to_owned()),
            ceremony_location: Some(None),
            ..WeddingPatch::default()
        };

        let updated = wedding.clone().patched(patch, at);

        assert_eq!(updated.venue_name, "Lakeside Pavilion");
        assert_eq!(updated.ceremony_location, None);
        assert_eq!(updated.bride_name, wedding.bride_name);
        assert_eq!(updated.reception_location, wedding.reception_location);
        assert_eq!(updated.updated_at, at);
        assert_eq!(updated.created_at, wedding.created_at);
    }

    #[rstest]
    fn validated_trims_names() {
        let patch = WeddingPatch {
            bride_name: Some("  Sarah  ".to_owned()),
            ..WeddingPatch::default()
        };
        let patch = patch.validated().expect("valid patch");
        assert_eq!(patch.bride_name.as_deref(), Some("Sarah"));
    }

    #[rstest]
    fn validated_rejects_blank_required_fields() {
        let patch = WeddingPatch {
            groom_name: Some("   ".to_owned()),
            venue_name: Some("x".repeat(201)),
            ..WeddingPatch::default()
        };
        let err = patch.validated().expect_err("invalid patch");
        let details = err.details().expect("details").to_string();
        assert!(details.contains("groom_name"));
        assert!(details.contains("venue_name"));
    }
}
