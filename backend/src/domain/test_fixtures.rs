//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use super::{AdminContext, AdminPrincipal, Message, Photo, Rsvp, AttendanceStatus};

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 2, 15, 45, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock { utc_now: now() })
}

pub(crate) fn wedding_id() -> Uuid {
    Uuid::from_u128(0x5eed)
}

pub(crate) fn admin_context() -> AdminContext {
    let principal = AdminPrincipal::new("admin");
    AdminContext::new(
        principal,
        Some("198.51.100.7".to_owned()),
        Some("dashboard-test".to_owned()),
    )
}

pub(crate) fn message(id: Uuid) -> Message {
    Message {
        id,
        wedding_id: wedding_id(),
        sender_name: "Jane Doe".to_owned(),
        sender_email: None,
        message_content: "Congrats!".to_owned(),
        is_approved: false,
        approved_at: None,
        created_at: created_at(),
        updated_at: created_at(),
        deleted_at: None,
    }
}

pub(crate) fn photo(id: Uuid) -> Photo {
    Photo {
        id,
        wedding_id: wedding_id(),
        filename: "1727784000000-7-cake.jpg".to_owned(),
        original_filename: "cake.jpg".to_owned(),
        file_path: "uploads/1727784000000-7-cake.jpg".to_owned(),
        file_size: 2048,
        mime_type: "image/jpeg".to_owned(),
        uploaded_by: Some("Uncle Bob".to_owned()),
        caption: Some("The cake".to_owned()),
        is_approved: true,
        approved_at: Some(created_at()),
        created_at: created_at(),
        updated_at: created_at(),
        deleted_at: None,
    }
}

pub(crate) fn rsvp(id: Uuid) -> Rsvp {
    Rsvp {
        id,
        wedding_id: wedding_id(),
        guest_name: "Jane Doe".to_owned(),
        guest_email: Some("jane@example.com".to_owned()),
        guest_phone: None,
        attendance_status: AttendanceStatus::Attending,
        number_of_guests: 2,
        dietary_restrictions: None,
        special_requests: None,
        created_at: created_at(),
        updated_at: created_at(),
        deleted_at: None,
    }
}
