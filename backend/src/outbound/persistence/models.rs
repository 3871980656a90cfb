//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Content rows double as changesets: an
//! update writes every column, so `treat_none_as_null` is set to clear
//! nullable fields rather than skip them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{ActorType, AuditAction, AuditEntry, Message, Photo, Rsvp, Wedding};

use super::schema::{audit_logs, messages, photos, rsvps, weddings};

// ---------------------------------------------------------------------------
// Content rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = weddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct WeddingRow {
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

impl From<WeddingRow> for Wedding {
    fn from(row: WeddingRow) -> Self {
        Self {
            id: row.id,
            bride_name: row.bride_name,
            groom_name: row.groom_name,
            wedding_date: row.wedding_date,
            wedding_time: row.wedding_time,
            venue_name: row.venue_name,
            venue_address: row.venue_address,
            ceremony_time: row.ceremony_time,
            ceremony_location: row.ceremony_location,
            reception_time: row.reception_time,
            reception_location: row.reception_location,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

impl From<&Wedding> for WeddingRow {
    fn from(wedding: &Wedding) -> Self {
        Self {
            id: wedding.id,
            bride_name: wedding.bride_name.clone(),
            groom_name: wedding.groom_name.clone(),
            wedding_date: wedding.wedding_date,
            wedding_time: wedding.wedding_time,
            venue_name: wedding.venue_name.clone(),
            venue_address: wedding.venue_address.clone(),
            ceremony_time: wedding.ceremony_time,
            ceremony_location: wedding.ceremony_location.clone(),
            reception_time: wedding.reception_time,
            reception_location: wedding.reception_location.clone(),
            created_at: wedding.created_at,
            updated_at: wedding.updated_at,
            deleted_at: wedding.deleted_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = rsvps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RsvpRow {
    pub id: Uuid,
    pub wedding_id: Uuid,
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub attendance_status: String,
    pub number_of_guests: i32,
    pub dietary_restrictions: Option<String>,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<RsvpRow> for Rsvp {
    type Error = String;

    fn try_from(row: RsvpRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            wedding_id: row.wedding_id,
            guest_name: row.guest_name,
            guest_email: row.guest_email,
            guest_phone: row.guest_phone,
            attendance_status: row.attendance_status.parse()?,
            number_of_guests: row.number_of_guests,
            dietary_restrictions: row.dietary_restrictions,
            special_requests: row.special_requests,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

impl From<&Rsvp> for RsvpRow {
    fn from(rsvp: &Rsvp) -> Self {
        Self {
            id: rsvp.id,
            wedding_id: rsvp.wedding_id,
            guest_name: rsvp.guest_name.clone(),
            guest_email: rsvp.guest_email.clone(),
            guest_phone: rsvp.guest_phone.clone(),
            attendance_status: rsvp.attendance_status.as_str().to_owned(),
            number_of_guests: rsvp.number_of_guests,
            dietary_restrictions: rsvp.dietary_restrictions.clone(),
            special_requests: rsvp.special_requests.clone(),
            created_at: rsvp.created_at,
            updated_at: rsvp.updated_at,
            deleted_at: rsvp.deleted_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MessageRow {
    pub id: Uuid,
    pub wedding_id: Uuid,
    pub sender_name: String,
    pub sender_email: Option<String>,
    pub message_content: String,
    pub is_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            wedding_id: row.wedding_id,
            sender_name: row.sender_name,
            sender_email: row.sender_email,
            message_content: row.message_content,
            is_approved: row.is_approved,
            approved_at: row.approved_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

impl From<&Message> for MessageRow {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            wedding_id: message.wedding_id,
            sender_name: message.sender_name.clone(),
            sender_email: message.sender_email.clone(),
            message_content: message.message_content.clone(),
            is_approved: message.is_approved,
            approved_at: message.approved_at,
            created_at: message.created_at,
            updated_at: message.updated_at,
            deleted_at: message.deleted_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PhotoRow {
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

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Self {
            id: row.id,
            wedding_id: row.wedding_id,
            filename: row.filename,
            original_filename: row.original_filename,
            file_path: row.file_path,
            file_size: row.file_size,
            mime_type: row.mime_type,
            uploaded_by: row.uploaded_by,
            caption: row.caption,
            is_approved: row.is_approved,
            approved_at: row.approved_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

impl From<&Photo> for PhotoRow {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id,
            wedding_id: photo.wedding_id,
            filename: photo.filename.clone(),
            original_filename: photo.original_filename.clone(),
            file_path: photo.file_path.clone(),
            file_size: photo.file_size,
            mime_type: photo.mime_type.clone(),
            uploaded_by: photo.uploaded_by.clone(),
            caption: photo.caption.clone(),
            is_approved: photo.is_approved,
            approved_at: photo.approved_at,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
            deleted_at: photo.deleted_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Audit rows
// ---------------------------------------------------------------------------

/// Row struct for reading from the audit_logs table. `seq` is only used
/// for ordering and is not selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuditLogRow {
    pub id: Uuid,
    pub table_name: String,
    pub record_id: String,
    pub action: String,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub user_id: Option<String>,
    pub user_type: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AuditLogRow> for AuditEntry {
    type Error = String;

    fn try_from(row: AuditLogRow) -> Result<Self, Self::Error> {
        let action = AuditAction::parse(&row.action)
            .ok_or_else(|| format!("unknown audit action: {}", row.action))?;
        let user_type = row
            .user_type
            .as_deref()
            .map(|value| {
                ActorType::parse(value).ok_or_else(|| format!("unknown actor type: {value}"))
            })
            .transpose()?;
        Ok(Self {
            id: row.id,
            table_name: row.table_name,
            record_id: row.record_id,
            action,
            old_values: row.old_values,
            new_values: row.new_values,
            user_id: row.user_id,
            user_type,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            metadata: row.metadata,
            created_at: row.created_at,
        })
    }
}

/// Insertable struct for appending audit entries; `seq` is assigned by
/// the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_logs)]
pub(crate) struct NewAuditLogRow<'a> {
    pub id: Uuid,
    pub table_name: &'a str,
    pub record_id: &'a str,
    pub action: &'static str,
    pub old_values: Option<&'a Value>,
    pub new_values: Option<&'a Value>,
    pub user_id: Option<&'a str>,
    pub user_type: Option<&'static str>,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub metadata: Option<&'a Value>,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a AuditEntry> for NewAuditLogRow<'a> {
    fn from(entry: &'a AuditEntry) -> Self {
        Self {
            id: entry.id,
            table_name: &entry.table_name,
            record_id: &entry.record_id,
            action: entry.action.as_str(),
            old_values: entry.old_values.as_ref(),
            new_values: entry.new_values.as_ref(),
            user_id: entry.user_id.as_deref(),
            user_type: entry.user_type.map(ActorType::as_str),
            ip_address: entry.ip_address.as_deref(),
            user_agent: entry.user_agent.as_deref(),
            metadata: entry.metadata.as_ref(),
            created_at: entry.created_at,
        }
    }
}
