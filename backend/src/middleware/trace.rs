//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! A valid UUID in the inbound `trace-id` header is reused; otherwise a new
//! one is generated. The identifier is placed in task-local scope for the
//! handler, echoed in the response header and logged with the request
//! outcome.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware adding a `trace-id` header to every response.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use wedding_backend::middleware::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let inbound = req
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok());
        let trace_id = TraceId::from_header_or_generate(inbound);
        let method = req.method().clone();
        let path = req.path().to_owned();
        let started = Instant::now();

        // Some services do work when called, before their future is polled.
        let fut = TraceId::sync_scope(trace_id, || self.service.call(req));
        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = fut.await?;
            let status = res.status();
            let elapsed_ms = started.elapsed().as_millis();
            if status.is_server_error() {
                warn!(%trace_id, %method, %path, status = status.as_u16(), elapsed_ms, "request failed");
            } else {
                info!(%trace_id, %method, %path, status = status.as_u16(), elapsed_ms, "request handled");
            }
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(%error, %trace_id, "failed to encode trace identifier header");
                }
            }
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use uuid::Uuid;

    fn echo_trace_id() -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = Error,
            InitError = (),
        >,
    > {
        App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async {
                let id = TraceId::current().map(|id| id.to_string()).unwrap_or_default();
                HttpResponse::Ok().body(id)
            }),
        )
    }

    #[actix_web::test]
    async fn handler_sees_the_header_value() {
        let app = test::init_service(echo_trace_id()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned();
        let body = test::read_body(res).await;
        assert_eq!(header.as_bytes(), body.as_ref());
        assert!(header.parse::<Uuid>().is_ok());
    }

    #[actix_web::test]
    async fn inbound_trace_id_is_propagated() {
        let app = test::init_service(echo_trace_id()).await;
        let supplied = Uuid::from_u128(99).to_string();
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((TRACE_ID_HEADER, supplied.as_str()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(
            res.headers().get(TRACE_ID_HEADER).and_then(|v| v.to_str().ok()),
            Some(supplied.as_str())
        );
    }
}
