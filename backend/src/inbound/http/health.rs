//! Liveness and readiness probes.
//!
//! Readiness flips once migrations have run and the pool is built; liveness
//! drops during graceful shutdown so load balancers stop routing early.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, HeaderValue};
use actix_web::{HttpResponse, get, web};

use crate::inbound::http::envelope::Envelope;

/// Process health flags shared with the probe handlers.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Live but not yet ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

fn probe(ok: bool, up: &str, down: &str) -> HttpResponse {
    let (status, message) = if ok {
        (StatusCode::OK, up)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, down)
    };
    HttpResponse::build(status)
        .insert_header((CACHE_CONTROL, HeaderValue::from_static("no-store")))
        .json(Envelope::<()> {
            success: ok,
            message: message.to_owned(),
            data: None,
        })
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Accepting traffic"),
        (status = 503, description = "Still starting up")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_ready(), "Service is ready", "Service is starting")
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is alive"),
        (status = 503, description = "Process is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_alive(), "Service is alive", "Service is shutting down")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    async fn get(state: web::Data<HealthState>, uri: &str) -> (StatusCode, Option<String>, Value) {
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let cache = res
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body: Value = test::read_body_json(res).await;
        (status, cache, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_waits_for_mark_ready() {
        let state = web::Data::new(HealthState::new());

        let (status, cache, body) = get(state.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body["success"], false);

        state.mark_ready();
        let (status, _, body) = get(state, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Service is ready");
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_fails_after_mark_unhealthy() {
        let state = web::Data::new(HealthState::new());
        let (status, _, _) = get(state.clone(), "/health/live").await;
        assert_eq!(status, StatusCode::OK);

        state.mark_unhealthy();
        let (status, _, body) = get(state, "/health/live").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "Service is shutting down");
    }
}
