//! Builders wiring the Diesel and filesystem adapters into HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use wedding_backend::domain::ports::PhotoStorageError;
use wedding_backend::domain::{
    AccessGate, AdminQueryService, AuthConfigError, GuestService, ModerationService,
};
use wedding_backend::inbound::http::state::{HttpState, HttpStatePorts};
use wedding_backend::outbound::persistence::{DieselAuditLogRepository, DieselContentRepository};
use wedding_backend::outbound::storage::DirPhotoStorage;

use super::ServerConfig;

/// Failures while assembling the handler dependencies.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    #[error("invalid admin credentials configuration: {0}")]
    Auth(#[from] AuthConfigError),
    #[error("photo storage unavailable: {0}")]
    Storage(#[from] PhotoStorageError),
}

/// Build the shared handler state on the wall clock.
pub(super) fn build_http_state(config: &ServerConfig) -> Result<HttpState, StateBuildError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let content = Arc::new(DieselContentRepository::new(config.db_pool.clone()));
    let audit = Arc::new(DieselAuditLogRepository::new(config.db_pool.clone()));
    let storage = Arc::new(DirPhotoStorage::open(&config.upload_dir)?);

    let access = Arc::new(AccessGate::new(config.auth.clone(), Arc::clone(&clock))?);
    let guest = Arc::new(
        GuestService::new(Arc::clone(&content), storage, Arc::clone(&clock))
            .with_max_upload_bytes(config.max_upload_bytes),
    );

    Ok(HttpState::new(
        access,
        HttpStatePorts {
            moderation: Arc::new(ModerationService::new(Arc::clone(&content), clock)),
            admin_query: Arc::new(AdminQueryService::new(content, audit)),
            guest_command: guest.clone(),
            guest_query: guest,
        },
    ))
}
