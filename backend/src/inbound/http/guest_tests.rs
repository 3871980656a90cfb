//! Tests for the public guest handlers.

use super::*;
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::test_fixtures::{message, photo, rsvp, wedding_id};
use crate::domain::wedding::fixtures::wedding;
use crate::domain::{ActorType, DEFAULT_MAX_UPLOAD_BYTES, ErrorCode};
use crate::inbound::http::test_utils::{PortMocks, access_gate, api_app};

async fn call_with_limit(
    mocks: PortMocks,
    req: test::TestRequest,
    max_upload_bytes: u64,
) -> (StatusCode, Value) {
    let app = test::init_service(api_app(mocks.into_state(access_gate()), max_upload_bytes)).await;
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

async fn call(mocks: PortMocks, req: test::TestRequest) -> (StatusCode, Value) {
    call_with_limit(mocks, req, DEFAULT_MAX_UPLOAD_BYTES).await
}

#[rstest]
#[actix_web::test]
async fn wedding_details_are_public() {
    let mut mocks = PortMocks::default();
    mocks.guest_query.expect_wedding().times(1).returning(|| Ok(wedding()));

    let (status, body) = call(mocks, test::TestRequest::get().uri("/api/wedding")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Wedding details retrieved successfully");
    assert_eq!(body["data"]["venue_name"], "Grand Garden Hotel");
}

#[rstest]
#[actix_web::test]
async fn rsvp_is_created_with_guest_actor() {
    let mut mocks = PortMocks::default();
    mocks
        .guest_command
        .expect_submit_rsvp()
        .withf(|actor, submission| {
            actor.user_type == ActorType::Guest
                && actor.user_agent.as_deref() == Some("Mozilla/5.0")
                && submission.guest_name == "Jane Doe"
                && submission.number_of_guests == Some(2)
        })
        .times(1)
        .returning(|_, _| Ok(rsvp(uuid::Uuid::from_u128(21))));
    let req = test::TestRequest::post()
        .uri("/api/rsvp")
        .insert_header(("User-Agent", "Mozilla/5.0"))
        .set_json(json!({
            "wedding_id": wedding_id(),
            "guest_name": "Jane Doe",
            "guest_email": "jane@example.com",
            "attendance_status": "attending",
            "number_of_guests": 2
        }));

    let (status, body) = call(mocks, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "RSVP submitted successfully");
    assert_eq!(body["data"]["attendance_status"], "attending");
}

#[rstest]
#[actix_web::test]
async fn duplicate_rsvp_is_a_conflict() {
    let mut mocks = PortMocks::default();
    mocks
        .guest_command
        .expect_submit_rsvp()
        .returning(|_, _| Err(Error::from_code(ErrorCode::RsvpAlreadyExists)));
    let req = test::TestRequest::post().uri("/api/rsvp").set_json(json!({
        "wedding_id": wedding_id(),
        "guest_name": "Jane Doe",
        "guest_email": "jane@example.com"
    }));

    let (status, body) = call(mocks, req).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "RSVP_ALREADY_EXISTS");
}

#[rstest]
#[actix_web::test]
async fn rsvp_without_wedding_id_is_rejected_before_the_service() {
    let req = test::TestRequest::post()
        .uri("/api/rsvp")
        .set_json(json!({"guest_name": "Jane Doe"}));

    let (status, body) = call(PortMocks::default(), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[rstest]
#[actix_web::test]
async fn message_submission_returns_created() {
    let mut mocks = PortMocks::default();
    mocks
        .guest_command
        .expect_submit_message()
        .withf(|_, submission| submission.message_content == "Congrats!")
        .times(1)
        .returning(|_, _| Ok(message(uuid::Uuid::from_u128(22))));
    let req = test::TestRequest::post().uri("/api/messages").set_json(json!({
        "wedding_id": wedding_id(),
        "sender_name": "Jane Doe",
        "message_content": "Congrats!"
    }));

    let (status, body) = call(mocks, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Message submitted successfully");
    assert_eq!(body["data"]["is_approved"], false);
}

#[rstest]
#[actix_web::test]
async fn public_lists_use_the_query_port() {
    let mut mocks = PortMocks::default();
    mocks
        .guest_query
        .expect_approved_messages()
        .times(1)
        .returning(|| Ok(Vec::new()));
    mocks
        .guest_query
        .expect_approved_photos()
        .times(1)
        .returning(|| Ok(vec![photo(uuid::Uuid::from_u128(23))]));
    let app = test::init_service(api_app(
        mocks.into_state(access_gate()),
        DEFAULT_MAX_UPLOAD_BYTES,
    ))
    .await;

    let messages: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/messages").to_request(),
    )
    .await;
    let photos: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/photos").to_request(),
    )
    .await;

    assert_eq!(messages["message"], "Approved messages retrieved successfully");
    assert_eq!(messages["data"], json!([]));
    assert_eq!(photos["message"], "Approved photos retrieved successfully");
    assert_eq!(photos["data"][0]["mime_type"], "image/jpeg");
}

#[rstest]
#[actix_web::test]
async fn photo_upload_forwards_body_type_and_query() {
    let mut mocks = PortMocks::default();
    mocks
        .guest_command
        .expect_upload_photo()
        .withf(|_, upload| {
            upload.content_type == "image/png"
                && upload.bytes == [0x89, 0x50, 0x4E, 0x47]
                && upload.details.wedding_id == wedding_id()
                && upload.details.uploaded_by.as_deref() == Some("Aunt May")
                && upload.details.original_filename.as_deref() == Some("cake.png")
                && upload.details.caption.is_none()
        })
        .times(1)
        .returning(|_, _| Ok(photo(uuid::Uuid::from_u128(24))));
    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/photos?wedding_id={}&uploaded_by=Aunt%20May&filename=cake.png",
            wedding_id()
        ))
        .insert_header(("Content-Type", "image/png"))
        .set_payload(vec![0x89, 0x50, 0x4E, 0x47]);

    let (status, body) = call(mocks, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Photo uploaded successfully");
}

#[rstest]
#[actix_web::test]
async fn oversized_upload_is_truncated_to_one_byte_past_the_limit() {
    let mut mocks = PortMocks::default();
    mocks
        .guest_command
        .expect_upload_photo()
        .withf(|_, upload| upload.bytes.len() == 9)
        .times(1)
        .returning(|_, _| {
            Err(Error::new(
                ErrorCode::FileTooLarge,
                "File too large. Maximum size is 8 bytes.",
            ))
        });
    let req = test::TestRequest::post()
        .uri(&format!("/api/photos?wedding_id={}", wedding_id()))
        .insert_header(("Content-Type", "image/jpeg"))
        .set_payload(vec![0_u8; 64]);

    let (status, body) = call_with_limit(mocks, req, 8).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "FILE_TOO_LARGE");
}

#[rstest]
#[actix_web::test]
async fn upload_with_bad_wedding_id_is_itemised() {
    let req = test::TestRequest::post()
        .uri("/api/photos?wedding_id=abc")
        .insert_header(("Content-Type", "image/jpeg"))
        .set_payload(vec![1_u8]);

    let (status, body) = call(PortMocks::default(), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "wedding_id");
}
