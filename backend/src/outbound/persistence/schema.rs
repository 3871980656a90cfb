//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// The deployment's wedding. Reads use the oldest active row.
    weddings (id) {
        id -> Uuid,
        bride_name -> Varchar,
        groom_name -> Varchar,
        wedding_date -> Date,
        wedding_time -> Nullable<Time>,
        venue_name -> Varchar,
        venue_address -> Text,
        ceremony_time -> Nullable<Time>,
        ceremony_location -> Nullable<Varchar>,
        reception_time -> Nullable<Time>,
        reception_location -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        /// Soft-delete marker; active rows have `NULL`.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Guest RSVPs.
    ///
    /// A partial unique index on `(wedding_id, lower(guest_email))` covers
    /// active rows with an email.
    rsvps (id) {
        id -> Uuid,
        wedding_id -> Uuid,
        guest_name -> Varchar,
        guest_email -> Nullable<Varchar>,
        guest_phone -> Nullable<Varchar>,
        /// One of `attending`, `not_attending`, `maybe`.
        attendance_status -> Varchar,
        number_of_guests -> Int4,
        dietary_restrictions -> Nullable<Text>,
        special_requests -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Guestbook messages, hidden until approved.
    messages (id) {
        id -> Uuid,
        wedding_id -> Uuid,
        sender_name -> Varchar,
        sender_email -> Nullable<Varchar>,
        message_content -> Text,
        is_approved -> Bool,
        approved_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Uploaded photo metadata; the bytes live in photo storage.
    photos (id) {
        id -> Uuid,
        wedding_id -> Uuid,
        filename -> Varchar,
        original_filename -> Varchar,
        file_path -> Varchar,
        file_size -> Int8,
        mime_type -> Varchar,
        uploaded_by -> Nullable<Varchar>,
        caption -> Nullable<Text>,
        is_approved -> Bool,
        approved_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Append-only ledger of content changes.
    audit_logs (id) {
        id -> Uuid,
        /// Insertion order; tie-breaker for equal `created_at`.
        seq -> Int8,
        table_name -> Varchar,
        record_id -> Varchar,
        /// One of `CREATE`, `UPDATE`, `DELETE`, `RESTORE`.
        action -> Varchar,
        old_values -> Nullable<Jsonb>,
        new_values -> Nullable<Jsonb>,
        user_id -> Nullable<Varchar>,
        /// `admin` or `guest`.
        user_type -> Nullable<Varchar>,
        ip_address -> Nullable<Varchar>,
        user_agent -> Nullable<Text>,
        metadata -> Nullable<Jsonb>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(rsvps -> weddings (wedding_id));
diesel::joinable!(messages -> weddings (wedding_id));
diesel::joinable!(photos -> weddings (wedding_id));

diesel::allow_tables_to_appear_in_same_query!(weddings, rsvps, messages, photos, audit_logs,);
