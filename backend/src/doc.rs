//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every public, admin and health endpoint together
//! with the schema wrappers from [`crate::inbound::http::schemas`], which
//! keep utoipa out of the domain types. Admin endpoints are guarded by the
//! `AdminBearer` scheme; public ones opt out with `security([])`.
//!
//! The document backs Swagger UI in debug builds and is exported with
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::admin::{
    ApprovalBody, AuditLogsResponse, LoginRequest, LoginResponse, ReasonBody,
    WeddingUpdateRequest,
};
use crate::inbound::http::guest::{MessageRequest, RsvpRequest};
use crate::inbound::http::schemas::{
    AuditEntrySchema, ContentStatsSchema, EnvelopeSchema, ErrorCodeSchema, ErrorEnvelopeSchema,
    ErrorSchema, MessageSchema, PhotoSchema, RsvpSchema, WeddingSchema,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Add the admin bearer token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_owned());
        bearer.description = Some("Token issued by POST /api/admin/login.".to_owned());
        components.add_security_scheme("AdminBearer", SecurityScheme::Http(bearer));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Wedding backend API",
        description = "Guest RSVPs, guestbook and photos with admin moderation and an audit trail."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("AdminBearer" = [])),
    paths(
        crate::inbound::http::admin::login,
        crate::inbound::http::admin::stats,
        crate::inbound::http::admin::list_rsvps,
        crate::inbound::http::admin::list_messages,
        crate::inbound::http::admin::list_photos,
        crate::inbound::http::admin::approve_message,
        crate::inbound::http::admin::approve_photo,
        crate::inbound::http::admin::update_wedding,
        crate::inbound::http::admin::delete_rsvp,
        crate::inbound::http::admin::delete_message,
        crate::inbound::http::admin::delete_photo,
        crate::inbound::http::admin::restore_rsvp,
        crate::inbound::http::admin::restore_message,
        crate::inbound::http::admin::restore_photo,
        crate::inbound::http::admin::audit_logs,
        crate::inbound::http::admin::recent_audit,
        crate::inbound::http::admin::audit_trail,
        crate::inbound::http::guest::wedding,
        crate::inbound::http::guest::submit_rsvp,
        crate::inbound::http::guest::submit_message,
        crate::inbound::http::guest::approved_messages,
        crate::inbound::http::guest::upload_photo,
        crate::inbound::http::guest::approved_photos,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        EnvelopeSchema,
        ErrorEnvelopeSchema,
        ErrorSchema,
        ErrorCodeSchema,
        WeddingSchema,
        RsvpSchema,
        MessageSchema,
        PhotoSchema,
        AuditEntrySchema,
        ContentStatsSchema,
        LoginRequest,
        LoginResponse,
        ApprovalBody,
        ReasonBody,
        WeddingUpdateRequest,
        AuditLogsResponse,
        RsvpRequest,
        MessageRequest,
    )),
    tags(
        (name = "admin", description = "Moderation, wedding edits and the audit trail"),
        (name = "guest", description = "Public wedding site"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
