//! Request extractors for admin credentials and audit actor metadata.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! bearer checks and actor derivation here.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, USER_AGENT};
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::{AdminContext, Error, RequestActor};
use crate::inbound::http::state::HttpState;

/// Socket peer address. Forwarding headers are client supplied and ignored.
fn client_ip(req: &HttpRequest) -> Option<String> {
    req.peer_addr().map(|addr| addr.ip().to_string())
}

fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// An authenticated admin request.
///
/// Rejects with `UNAUTHORIZED` or `FORBIDDEN` before the handler runs.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub AdminContext);

impl FromRequest for AdminAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            return ready(Err(Error::internal("HTTP state not configured")));
        };
        let authorization = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        ready(state.access.authenticate(authorization).map(|principal| {
            Self(AdminContext::new(principal, client_ip(req), user_agent(req)))
        }))
    }
}

/// Anonymous guest metadata for the audit ledger.
#[derive(Debug, Clone)]
pub struct GuestActor(pub RequestActor);

impl FromRequest for GuestActor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(RequestActor::guest(client_ip(req), user_agent(req)))))
    }
}
