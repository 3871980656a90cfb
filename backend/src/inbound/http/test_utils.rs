//! Test helpers for inbound HTTP components.

use std::sync::{Arc, OnceLock};

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;
use zeroize::Zeroizing;

use crate::domain::ports::{
    MockAdminQuery, MockGuestCommand, MockGuestQuery, MockModerationCommand,
};
use crate::domain::{AccessGate, AdminPassword, AuthConfig, DEFAULT_TOKEN_TTL, hash_admin_password};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{admin, guest, validation};

pub const TEST_PASSWORD: &str = "wedding2024";

fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_admin_password(TEST_PASSWORD).expect("hash test password"))
        .clone()
}

/// Gate accepting [`TEST_PASSWORD`], running on the wall clock.
pub fn access_gate() -> Arc<AccessGate> {
    let config = AuthConfig {
        admin_password_hash: Zeroizing::new(password_hash()),
        signing_secret: Zeroizing::new(b"http-test-secret".to_vec()),
        token_ttl: DEFAULT_TOKEN_TTL,
    };
    Arc::new(AccessGate::new(config, Arc::new(DefaultClock)).expect("valid auth config"))
}

/// `Authorization` header value for a freshly issued admin token.
pub async fn admin_bearer(gate: &AccessGate) -> String {
    let password = AdminPassword::try_new(TEST_PASSWORD).expect("password");
    let credential = gate.login(&password).await.expect("login");
    format!("Bearer {}", credential.token)
}

/// Mock driving ports; unset expectations panic when called.
#[derive(Default)]
pub struct PortMocks {
    pub moderation: MockModerationCommand,
    pub admin_query: MockAdminQuery,
    pub guest_command: MockGuestCommand,
    pub guest_query: MockGuestQuery,
}

impl PortMocks {
    pub fn into_state(self, access: Arc<AccessGate>) -> HttpState {
        HttpState::new(
            access,
            HttpStatePorts {
                moderation: Arc::new(self.moderation),
                admin_query: Arc::new(self.admin_query),
                guest_command: Arc::new(self.guest_command),
                guest_query: Arc::new(self.guest_query),
            },
        )
    }
}

/// Every API route wired against `state`.
pub fn api_app(
    state: HttpState,
    max_upload_bytes: u64,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(validation::configure_extractors)
        .configure(admin::configure)
        .configure(guest::configure(max_upload_bytes))
}
