//! Tests for the admin HTTP handlers.

use super::*;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::ports::{ContentStats, ModerationStats, RsvpStats};
use crate::domain::test_fixtures::{message, photo, rsvp};
use crate::domain::wedding::fixtures::wedding;
use crate::domain::{
    AuditAction, AuditEntry, AuditPage, DEFAULT_MAX_UPLOAD_BYTES, Error, ErrorCode, Record,
};
use crate::inbound::http::test_utils::{PortMocks, TEST_PASSWORD, access_gate, admin_bearer, api_app};

async fn call(mocks: PortMocks, req: test::TestRequest, with_token: bool) -> (StatusCode, Value) {
    let gate = access_gate();
    let req = if with_token {
        req.insert_header((AUTHORIZATION, admin_bearer(&gate).await))
    } else {
        req
    };
    let app = test::init_service(api_app(mocks.into_state(gate), DEFAULT_MAX_UPLOAD_BYTES)).await;
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

fn audit_entry(action: AuditAction) -> AuditEntry {
    AuditEntry {
        id: Uuid::from_u128(0xa0),
        table_name: "messages".to_owned(),
        record_id: Uuid::from_u128(7).to_string(),
        action,
        old_values: None,
        new_values: Some(json!({"is_approved": true})),
        user_id: Some("admin".to_owned()),
        user_type: None,
        ip_address: None,
        user_agent: None,
        metadata: None,
        created_at: crate::domain::test_fixtures::now(),
    }
}

#[rstest]
#[actix_web::test]
async fn login_issues_a_token_for_the_admin_password() {
    let req = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({"password": TEST_PASSWORD}));

    let (status, body) = call(PortMocks::default(), req, false).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["data"]["expires_at"].is_string());
}

#[rstest]
#[actix_web::test]
async fn login_rejects_wrong_password() {
    let req = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({"password": "guess"}));

    let (status, body) = call(PortMocks::default(), req, false).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[rstest]
#[actix_web::test]
async fn login_rejects_empty_password() {
    let req = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({"password": ""}));

    let (status, body) = call(PortMocks::default(), req, false).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "password");
}

#[rstest]
#[case("/api/admin/stats")]
#[case("/api/admin/rsvps")]
#[case("/api/admin/audit-logs")]
#[actix_web::test]
async fn admin_routes_require_a_token(#[case] uri: &str) {
    let (status, body) = call(PortMocks::default(), test::TestRequest::get().uri(uri), false).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "Authorization token required");
}

#[rstest]
#[actix_web::test]
async fn garbage_token_is_rejected() {
    let req = test::TestRequest::get()
        .uri("/api/admin/stats")
        .insert_header((AUTHORIZATION, "Bearer not-a-token"));

    let (status, body) = call(PortMocks::default(), req, false).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid or expired token");
}

#[rstest]
#[actix_web::test]
async fn stats_are_wrapped_in_the_envelope() {
    let mut mocks = PortMocks::default();
    mocks.admin_query.expect_stats().times(1).returning(|_| {
        Ok(ContentStats {
            rsvps: RsvpStats {
                total: 3,
                attending: 2,
                total_guests: 5,
            },
            messages: ModerationStats {
                total: 4,
                approved: 1,
                pending: 3,
            },
            photos: ModerationStats::default(),
        })
    });

    let (status, body) = call(mocks, test::TestRequest::get().uri("/api/admin/stats"), true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Statistics retrieved successfully");
    assert_eq!(body["data"]["rsvps"]["total_guests"], 5);
    assert_eq!(body["data"]["messages"]["pending"], 3);
}

#[rstest]
#[case(true, "Message approved successfully")]
#[case(false, "Message hidden successfully")]
#[actix_web::test]
async fn message_approval_toggles(#[case] approved: bool, #[case] expected: &str) {
    let id = Uuid::from_u128(7);
    let mut mocks = PortMocks::default();
    mocks
        .moderation
        .expect_set_approval()
        .withf(move |context, request| {
            request.kind == ApprovableKind::Message
                && request.id == id
                && request.approved == approved
                && context.actor().ip_address.as_deref() == Some("203.0.113.9")
        })
        .times(1)
        .returning(move |_, _| {
            let mut updated = message(id);
            updated.is_approved = approved;
            Ok(Record::Message(updated))
        });
    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/messages/{id}"))
        .peer_addr("203.0.113.9:40000".parse().expect("socket addr"))
        .set_json(json!({"is_approved": approved}));

    let (status, body) = call(mocks, req, true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], expected);
    assert_eq!(body["data"]["is_approved"], approved);
}

#[rstest]
#[actix_web::test]
async fn photo_approval_uses_the_photo_kind() {
    let id = Uuid::from_u128(8);
    let mut mocks = PortMocks::default();
    mocks
        .moderation
        .expect_set_approval()
        .withf(move |_, request| request.kind == ApprovableKind::Photo && request.id == id)
        .times(1)
        .returning(move |_, _| Ok(Record::Photo(photo(id))));
    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/photos/{id}"))
        .set_json(json!({"is_approved": true}));

    let (status, body) = call(mocks, req, true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Photo approved successfully");
}

#[rstest]
#[actix_web::test]
async fn approval_rejects_malformed_ids_before_the_service() {
    let req = test::TestRequest::put()
        .uri("/api/admin/messages/not-a-uuid")
        .set_json(json!({"is_approved": true}));

    let (status, body) = call(PortMocks::default(), req, true).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["details"],
        json!([{"field": "id", "message": "must be a valid UUID"}])
    );
}

#[rstest]
#[actix_web::test]
async fn approval_of_missing_message_is_404() {
    let mut mocks = PortMocks::default();
    mocks
        .moderation
        .expect_set_approval()
        .returning(|_, _| Err(Error::from_code(ErrorCode::MessageNotFound)));
    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/messages/{}", Uuid::from_u128(9)))
        .set_json(json!({"is_approved": true}));

    let (status, body) = call(mocks, req, true).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "MESSAGE_NOT_FOUND");
}

#[rstest]
#[actix_web::test]
async fn delete_passes_reason_and_returns_no_data() {
    let id = Uuid::from_u128(11);
    let mut mocks = PortMocks::default();
    mocks
        .moderation
        .expect_remove()
        .withf(move |_, request| {
            request.kind == RemovableKind::Rsvp
                && request.id == id
                && request.reason.as_deref() == Some("duplicate")
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/rsvps/{id}"))
        .set_json(json!({"reason": "duplicate"}));

    let (status, body) = call(mocks, req, true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "RSVP deleted successfully"}));
}

#[rstest]
#[actix_web::test]
async fn delete_without_body_has_no_reason() {
    let mut mocks = PortMocks::default();
    mocks
        .moderation
        .expect_remove()
        .withf(|_, request| request.kind == RemovableKind::Message && request.reason.is_none())
        .times(1)
        .returning(|_, _| Ok(()));
    let req = test::TestRequest::delete().uri(&format!("/api/admin/messages/{}", Uuid::from_u128(12)));

    let (status, body) = call(mocks, req, true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Message deleted successfully");
}

#[rstest]
#[case::delete(test::TestRequest::delete(), "")]
#[case::restore(test::TestRequest::post(), "/restore")]
#[actix_web::test]
async fn truncated_reason_body_is_rejected_before_the_service(
    #[case] req: test::TestRequest,
    #[case] suffix: &str,
) {
    let req = req
        .uri(&format!("/api/admin/rsvps/{}{suffix}", Uuid::from_u128(14)))
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"reason": "dup"#);

    let (status, body) = call(PortMocks::default(), req, true).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[rstest]
#[actix_web::test]
async fn restore_returns_the_record() {
    let id = Uuid::from_u128(13);
    let mut mocks = PortMocks::default();
    mocks
        .moderation
        .expect_restore()
        .withf(move |_, request| request.kind == RemovableKind::Rsvp && request.id == id)
        .times(1)
        .returning(move |_, _| Ok(Record::Rsvp(rsvp(id))));
    let req = test::TestRequest::post().uri(&format!("/api/admin/rsvps/{id}/restore"));

    let (status, body) = call(mocks, req, true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "RSVP restored successfully");
    assert_eq!(body["data"]["id"], id.to_string());
}

#[rstest]
#[actix_web::test]
async fn wedding_update_distinguishes_null_from_absent() {
    let mut mocks = PortMocks::default();
    mocks
        .moderation
        .expect_update_wedding_details()
        .withf(|_, patch| {
            patch.venue_name.as_deref() == Some("Lakeside Pavilion")
                && patch.ceremony_location == Some(None)
                && patch.reception_location.is_none()
        })
        .times(1)
        .returning(|_, _| Ok(wedding()));
    let req = test::TestRequest::put()
        .uri("/api/admin/wedding")
        .set_json(json!({"venue_name": "Lakeside Pavilion", "ceremony_location": null}));

    let (status, body) = call(mocks, req, true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Wedding details updated successfully");
    assert_eq!(body["data"]["bride_name"], "Sarah Johnson");
}

#[rstest]
#[actix_web::test]
async fn wedding_update_rejects_unknown_fields() {
    let req = test::TestRequest::put()
        .uri("/api/admin/wedding")
        .set_json(json!({"id": Uuid::nil()}));

    let (status, body) = call(PortMocks::default(), req, true).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[rstest]
#[case("", 100, 0)]
#[case("?limit=20&offset=40", 20, 40)]
#[case("?limit=9000&offset=-3", 500, 0)]
#[actix_web::test]
async fn audit_logs_echo_the_effective_page(
    #[case] query: &str,
    #[case] limit: i64,
    #[case] offset: i64,
) {
    let mut mocks = PortMocks::default();
    mocks
        .admin_query
        .expect_audit_logs()
        .withf(move |_, page| page.limit() == limit && page.offset() == offset)
        .times(1)
        .returning(|_, _| {
            Ok(AuditPage {
                entries: vec![audit_entry(AuditAction::Update)],
                total: 41,
            })
        });
    let req = test::TestRequest::get().uri(&format!("/api/admin/audit-logs{query}"));

    let (status, body) = call(mocks, req, true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Audit logs retrieved successfully");
    assert_eq!(body["data"]["total"], 41);
    assert_eq!(body["data"]["limit"], limit);
    assert_eq!(body["data"]["offset"], offset);
    assert_eq!(body["data"]["logs"][0]["action"], "UPDATE");
}

#[rstest]
#[actix_web::test]
async fn recent_audit_defaults_to_fifty() {
    let mut mocks = PortMocks::default();
    mocks
        .admin_query
        .expect_recent_audit()
        .withf(|_, limit| *limit == 50)
        .times(1)
        .returning(|_, _| Ok(vec![audit_entry(AuditAction::Delete)]));

    let (status, body) = call(mocks, test::TestRequest::get().uri("/api/admin/audit-logs/recent"), true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["action"], "DELETE");
}

#[rstest]
#[actix_web::test]
async fn audit_trail_parses_table_and_id() {
    let id = Uuid::from_u128(7);
    let mut mocks = PortMocks::default();
    mocks
        .admin_query
        .expect_audit_trail()
        .withf(move |_, kind, record_id| *kind == RecordKind::Message && *record_id == id)
        .times(1)
        .returning(|_, _, _| Ok(vec![audit_entry(AuditAction::Create)]));
    let req = test::TestRequest::get().uri(&format!("/api/admin/audit-logs/messages/{id}"));

    let (status, body) = call(mocks, req, true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["table_name"], "messages");
}

#[rstest]
#[actix_web::test]
async fn audit_trail_rejects_unknown_tables() {
    let req = test::TestRequest::get().uri(&format!("/api/admin/audit-logs/users/{}", Uuid::nil()));

    let (status, body) = call(PortMocks::default(), req, true).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "unknown table: users");
}
