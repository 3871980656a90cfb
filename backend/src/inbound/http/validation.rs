//! Shared validation helpers for inbound HTTP adapters.
//!
//! Malformed bodies, query strings and path segments never reach a handler;
//! the extractor configs below turn them into `BAD_REQUEST` envelopes.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::{Error, FieldViolation};

/// Largest JSON body accepted by admin and guest endpoints.
const JSON_LIMIT_BYTES: usize = 64 * 1024;

pub(crate) fn parse_uuid(value: &str, field: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        Error::validation(vec![FieldViolation::new(field, "must be a valid UUID")])
    })
}

/// Parse a JSON body that may be omitted; an empty payload yields the default.
pub(crate) fn optional_json<T>(body: &[u8]) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    if body.trim_ascii().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| Error::bad_request(format!("Invalid JSON body: {err}")))
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_owned(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body too large".to_owned()
        }
        other => format!("Invalid JSON body: {other}"),
    };
    Error::bad_request(message).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::bad_request(format!("Invalid query string: {err}")).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::bad_request(format!("Invalid path parameter: {err}")).into()
}

/// Extractor configs mapping parse failures onto the error envelope.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT_BYTES)
            .error_handler(json_error),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error))
    .app_data(web::PathConfig::default().error_handler(path_error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Deserialize)]
    struct Body {
        #[expect(dead_code, reason = "only deserialised")]
        name: String,
    }

    #[rstest]
    fn invalid_uuid_is_itemised() {
        let err = parse_uuid("nope", "id").expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(
            err.details(),
            Some(&serde_json::json!([{"field": "id", "message": "must be a valid UUID"}]))
        );
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Note {
        note: Option<String>,
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"  \n".as_slice())]
    fn missing_optional_body_uses_default(#[case] body: &[u8]) {
        assert_eq!(optional_json::<Note>(body).expect("default"), Note::default());
    }

    #[rstest]
    fn present_optional_body_is_parsed() {
        let parsed: Note = optional_json(br#"{"note":"hi"}"#).expect("parsed");
        assert_eq!(parsed.note.as_deref(), Some("hi"));
    }

    #[rstest]
    fn truncated_optional_body_is_bad_request() {
        let err = optional_json::<Note>(br#"{"note": "hi"#).expect_err("truncated");
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }

    #[rstest]
    fn valid_uuid_parses() {
        let id = Uuid::from_u128(3);
        assert_eq!(parse_uuid(&id.to_string(), "id").expect("valid"), id);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_yields_bad_request_envelope() {
        let app = actix_test::init_service(App::new().configure(configure_extractors).route(
            "/",
            web::post().to(|_: web::Json<Body>| async { HttpResponse::Ok().finish() }),
        ))
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"name\":")
            .to_request();

        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}
