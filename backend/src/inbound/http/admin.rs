//! Admin API handlers.
//!
//! ```text
//! POST   /api/admin/login {"password":"..."}
//! GET    /api/admin/stats
//! PUT    /api/admin/messages/{id} {"is_approved":true}
//! DELETE /api/admin/rsvps/{id} {"reason":"duplicate"}
//! GET    /api/admin/audit-logs?limit=20&offset=40
//! ```
//!
//! Every route except `login` requires `Authorization: Bearer <token>`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ApprovalRequest, AuditLogPageRequest, RemovalRequest};
use crate::domain::{AdminPassword, ApprovableKind, RecordKind, RemovableKind, WeddingPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminAuth;
use crate::inbound::http::envelope::{message_only, ok};
use crate::inbound::http::schemas::{AuditEntrySchema, EnvelopeSchema, ErrorEnvelopeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{optional_json, parse_uuid};

/// Entries returned by the recent-activity feed when no limit is given.
const DEFAULT_RECENT_AUDIT: i64 = 50;

/// Body for `POST /api/admin/login`.
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub password: String,
}

/// Issued admin credential.
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Body for the approval toggles.
#[derive(Deserialize, ToSchema)]
pub struct ApprovalBody {
    pub is_approved: bool,
}

/// Optional body for deletions and restores.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReasonBody {
    #[schema(example = "duplicate")]
    pub reason: Option<String>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial wedding update. Absent fields are untouched; `null` clears an
/// optional field.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct WeddingUpdateRequest {
    pub bride_name: Option<String>,
    pub groom_name: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, example = "16:00:00")]
    pub wedding_time: Option<Option<NaiveTime>>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub ceremony_time: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub ceremony_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub reception_time: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub reception_location: Option<Option<String>>,
}

impl From<WeddingUpdateRequest> for WeddingPatch {
    fn from(value: WeddingUpdateRequest) -> Self {
        Self {
            bride_name: value.bride_name,
            groom_name: value.groom_name,
            wedding_date: value.wedding_date,
            wedding_time: value.wedding_time,
            venue_name: value.venue_name,
            venue_address: value.venue_address,
            ceremony_time: value.ceremony_time,
            ceremony_location: value.ceremony_location,
            reception_time: value.reception_time,
            reception_location: value.reception_location,
        }
    }
}

/// Paging for the ledger listing.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditLogQuery {
    /// Page size, 1 to 500. Defaults to 100.
    pub limit: Option<i64>,
    /// Entries to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Size of the recent-activity feed.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentAuditQuery {
    /// Entries to return, 1 to 500. Defaults to 50.
    pub limit: Option<i64>,
}

/// A page of the ledger.
#[derive(Serialize, ToSchema)]
pub struct AuditLogsResponse {
    #[schema(value_type = Vec<AuditEntrySchema>)]
    pub logs: Vec<crate::domain::AuditEntry>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

const fn display_label(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Wedding => "Wedding",
        RecordKind::Rsvp => "RSVP",
        RecordKind::Message => "Message",
        RecordKind::Photo => "Photo",
    }
}

/// Exchange the admin password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = EnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let password = AdminPassword::try_new(&payload.password)?;
    let credential = state.access.login(&password).await?;
    Ok(ok(
        "Login successful",
        LoginResponse {
            token: credential.token,
            expires_at: credential.expires_at,
        },
    ))
}

/// Dashboard counts over active records.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Statistics", body = EnvelopeSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema),
        (status = 403, description = "Not an admin token", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminStats"
)]
#[get("/stats")]
pub async fn stats(state: web::Data<HttpState>, admin: AdminAuth) -> ApiResult<HttpResponse> {
    let stats = state.admin_query.stats(&admin.0).await?;
    Ok(ok("Statistics retrieved successfully", stats))
}

/// Every active RSVP, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/rsvps",
    responses(
        (status = 200, description = "RSVPs", body = EnvelopeSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListRsvps"
)]
#[get("/rsvps")]
pub async fn list_rsvps(state: web::Data<HttpState>, admin: AdminAuth) -> ApiResult<HttpResponse> {
    let rsvps = state.admin_query.rsvps(&admin.0).await?;
    Ok(ok("RSVPs retrieved successfully", rsvps))
}

/// Every active message, approved or not.
#[utoipa::path(
    get,
    path = "/api/admin/messages",
    responses(
        (status = 200, description = "Messages", body = EnvelopeSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListMessages"
)]
#[get("/messages")]
pub async fn list_messages(
    state: web::Data<HttpState>,
    admin: AdminAuth,
) -> ApiResult<HttpResponse> {
    let messages = state.admin_query.messages(&admin.0).await?;
    Ok(ok("Messages retrieved successfully", messages))
}

/// Every active photo, approved or not.
#[utoipa::path(
    get,
    path = "/api/admin/photos",
    responses(
        (status = 200, description = "Photos", body = EnvelopeSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListPhotos"
)]
#[get("/photos")]
pub async fn list_photos(state: web::Data<HttpState>, admin: AdminAuth) -> ApiResult<HttpResponse> {
    let photos = state.admin_query.photos(&admin.0).await?;
    Ok(ok("Photos retrieved successfully", photos))
}

async fn set_approval(
    state: &HttpState,
    admin: AdminAuth,
    kind: ApprovableKind,
    raw_id: &str,
    approved: bool,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(raw_id, "id")?;
    let record = state
        .moderation
        .set_approval(&admin.0, ApprovalRequest { kind, id, approved })
        .await?;
    let verb = if approved { "approved" } else { "hidden" };
    Ok(ok(
        format!("{} {verb} successfully", display_label(kind.record_kind())),
        record,
    ))
}

/// Approve or hide a guestbook message.
#[utoipa::path(
    put,
    path = "/api/admin/messages/{id}",
    params(("id" = String, Path, description = "Message id")),
    request_body = ApprovalBody,
    responses(
        (status = 200, description = "Message approved or hidden", body = EnvelopeSchema),
        (status = 400, description = "Invalid id or body", body = ErrorEnvelopeSchema),
        (status = 404, description = "MESSAGE_NOT_FOUND", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminApproveMessage"
)]
#[put("/messages/{id}")]
pub async fn approve_message(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    path: web::Path<String>,
    payload: web::Json<ApprovalBody>,
) -> ApiResult<HttpResponse> {
    set_approval(&state, admin, ApprovableKind::Message, &path, payload.is_approved).await
}

/// Approve or hide a photo.
#[utoipa::path(
    put,
    path = "/api/admin/photos/{id}",
    params(("id" = String, Path, description = "Photo id")),
    request_body = ApprovalBody,
    responses(
        (status = 200, description = "Photo approved or hidden", body = EnvelopeSchema),
        (status = 400, description = "Invalid id or body", body = ErrorEnvelopeSchema),
        (status = 404, description = "PHOTO_NOT_FOUND", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminApprovePhoto"
)]
#[put("/photos/{id}")]
pub async fn approve_photo(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    path: web::Path<String>,
    payload: web::Json<ApprovalBody>,
) -> ApiResult<HttpResponse> {
    set_approval(&state, admin, ApprovableKind::Photo, &path, payload.is_approved).await
}

/// Edit the wedding details.
#[utoipa::path(
    put,
    path = "/api/admin/wedding",
    request_body = WeddingUpdateRequest,
    responses(
        (status = 200, description = "Wedding updated", body = EnvelopeSchema),
        (status = 400, description = "Validation failed", body = ErrorEnvelopeSchema),
        (status = 404, description = "WEDDING_NOT_FOUND", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateWedding"
)]
#[put("/wedding")]
pub async fn update_wedding(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    payload: web::Json<WeddingUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let wedding = state
        .moderation
        .update_wedding_details(&admin.0, payload.into_inner().into())
        .await?;
    Ok(ok("Wedding details updated successfully", wedding))
}

fn removal(kind: RemovableKind, raw_id: &str, body: &[u8]) -> ApiResult<RemovalRequest> {
    let id = parse_uuid(raw_id, "id")?;
    let ReasonBody { reason } = optional_json(body)?;
    Ok(RemovalRequest { kind, id, reason })
}

async fn remove(
    state: &HttpState,
    admin: AdminAuth,
    kind: RemovableKind,
    raw_id: &str,
    body: &[u8],
) -> ApiResult<HttpResponse> {
    let request = removal(kind, raw_id, body)?;
    state.moderation.remove(&admin.0, request).await?;
    Ok(message_only(format!(
        "{} deleted successfully",
        display_label(kind.record_kind())
    )))
}

async fn restore(
    state: &HttpState,
    admin: AdminAuth,
    kind: RemovableKind,
    raw_id: &str,
    body: &[u8],
) -> ApiResult<HttpResponse> {
    let request = removal(kind, raw_id, body)?;
    let record = state.moderation.restore(&admin.0, request).await?;
    Ok(ok(
        format!("{} restored successfully", display_label(kind.record_kind())),
        record,
    ))
}

/// Soft delete an RSVP.
#[utoipa::path(
    delete,
    path = "/api/admin/rsvps/{id}",
    params(("id" = String, Path, description = "RSVP id")),
    request_body(content = ReasonBody, description = "Optional reason recorded in the audit log"),
    responses(
        (status = 200, description = "RSVP deleted", body = EnvelopeSchema),
        (status = 400, description = "Invalid id or body", body = ErrorEnvelopeSchema),
        (status = 404, description = "RSVP_NOT_FOUND", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteRsvp"
)]
#[delete("/rsvps/{id}")]
pub async fn delete_rsvp(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    remove(&state, admin, RemovableKind::Rsvp, &path, &body).await
}

/// Soft delete a message.
#[utoipa::path(
    delete,
    path = "/api/admin/messages/{id}",
    params(("id" = String, Path, description = "Message id")),
    request_body(content = ReasonBody, description = "Optional reason recorded in the audit log"),
    responses(
        (status = 200, description = "Message deleted", body = EnvelopeSchema),
        (status = 400, description = "Invalid id or body", body = ErrorEnvelopeSchema),
        (status = 404, description = "MESSAGE_NOT_FOUND", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteMessage"
)]
#[delete("/messages/{id}")]
pub async fn delete_message(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    remove(&state, admin, RemovableKind::Message, &path, &body).await
}

/// Soft delete a photo. The stored file is kept so the record can be restored.
#[utoipa::path(
    delete,
    path = "/api/admin/photos/{id}",
    params(("id" = String, Path, description = "Photo id")),
    request_body(content = ReasonBody, description = "Optional reason recorded in the audit log"),
    responses(
        (status = 200, description = "Photo deleted", body = EnvelopeSchema),
        (status = 400, description = "Invalid id or body", body = ErrorEnvelopeSchema),
        (status = 404, description = "PHOTO_NOT_FOUND", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDeletePhoto"
)]
#[delete("/photos/{id}")]
pub async fn delete_photo(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    remove(&state, admin, RemovableKind::Photo, &path, &body).await
}

/// Undo the soft delete of an RSVP.
#[utoipa::path(
    post,
    path = "/api/admin/rsvps/{id}/restore",
    params(("id" = String, Path, description = "RSVP id")),
    request_body(content = ReasonBody, description = "Optional reason recorded in the audit log"),
    responses(
        (status = 200, description = "RSVP restored", body = EnvelopeSchema),
        (status = 400, description = "Invalid id or body", body = ErrorEnvelopeSchema),
        (status = 404, description = "No deleted RSVP with this id", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminRestoreRsvp"
)]
#[post("/rsvps/{id}/restore")]
pub async fn restore_rsvp(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    restore(&state, admin, RemovableKind::Rsvp, &path, &body).await
}

/// Undo the soft delete of a message.
#[utoipa::path(
    post,
    path = "/api/admin/messages/{id}/restore",
    params(("id" = String, Path, description = "Message id")),
    request_body(content = ReasonBody, description = "Optional reason recorded in the audit log"),
    responses(
        (status = 200, description = "Message restored", body = EnvelopeSchema),
        (status = 400, description = "Invalid id or body", body = ErrorEnvelopeSchema),
        (status = 404, description = "No deleted message with this id", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminRestoreMessage"
)]
#[post("/messages/{id}/restore")]
pub async fn restore_message(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    restore(&state, admin, RemovableKind::Message, &path, &body).await
}

/// Undo the soft delete of a photo.
#[utoipa::path(
    post,
    path = "/api/admin/photos/{id}/restore",
    params(("id" = String, Path, description = "Photo id")),
    request_body(content = ReasonBody, description = "Optional reason recorded in the audit log"),
    responses(
        (status = 200, description = "Photo restored", body = EnvelopeSchema),
        (status = 400, description = "Invalid id or body", body = ErrorEnvelopeSchema),
        (status = 404, description = "No deleted photo with this id", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminRestorePhoto"
)]
#[post("/photos/{id}/restore")]
pub async fn restore_photo(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    restore(&state, admin, RemovableKind::Photo, &path, &body).await
}

/// Page through the ledger, most recent first.
#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Audit logs", body = EnvelopeSchema),
        (status = 400, description = "Invalid query", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminAuditLogs"
)]
#[get("/audit-logs")]
pub async fn audit_logs(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    query: web::Query<AuditLogQuery>,
) -> ApiResult<HttpResponse> {
    let page = AuditLogPageRequest::new(query.limit, query.offset);
    let result = state.admin_query.audit_logs(&admin.0, page).await?;
    Ok(ok(
        "Audit logs retrieved successfully",
        AuditLogsResponse {
            logs: result.entries,
            total: result.total,
            limit: page.limit(),
            offset: page.offset(),
        },
    ))
}

/// The newest ledger entries for the activity feed.
#[utoipa::path(
    get,
    path = "/api/admin/audit-logs/recent",
    params(RecentAuditQuery),
    responses(
        (status = 200, description = "Recent activity", body = EnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminRecentAudit"
)]
#[get("/audit-logs/recent")]
pub async fn recent_audit(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    query: web::Query<RecentAuditQuery>,
) -> ApiResult<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_AUDIT);
    let entries = state.admin_query.recent_audit(&admin.0, limit).await?;
    Ok(ok("Recent activity retrieved successfully", entries))
}

/// Every ledger entry for one record, most recent first.
#[utoipa::path(
    get,
    path = "/api/admin/audit-logs/{table}/{id}",
    params(
        ("table" = String, Path, description = "weddings, rsvps, messages or photos"),
        ("id" = String, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record history", body = EnvelopeSchema),
        (status = 400, description = "Unknown table or invalid id", body = ErrorEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "adminAuditTrail"
)]
#[get("/audit-logs/{table}/{id}")]
pub async fn audit_trail(
    state: web::Data<HttpState>,
    admin: AdminAuth,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (table, raw_id) = path.into_inner();
    let kind: RecordKind = table.parse()?;
    let id = parse_uuid(&raw_id, "id")?;
    let entries = state.admin_query.audit_trail(&admin.0, kind, id).await?;
    Ok(ok("Audit trail retrieved successfully", entries))
}

/// Register the admin routes under `/api/admin`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .service(login)
            .service(stats)
            .service(list_rsvps)
            .service(list_messages)
            .service(list_photos)
            .service(approve_message)
            .service(approve_photo)
            .service(update_wedding)
            .service(delete_rsvp)
            .service(delete_message)
            .service(delete_photo)
            .service(restore_rsvp)
            .service(restore_message)
            .service(restore_photo)
            .service(audit_logs)
            .service(recent_audit)
            .service(audit_trail),
    );
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
