//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use wedding_backend::domain::AuthConfig;
use wedding_backend::outbound::persistence::DbPool;

/// Everything needed to assemble the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) auth: AuthConfig,
    pub(crate) upload_dir: PathBuf,
    pub(crate) max_upload_bytes: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, auth: AuthConfig) -> Self {
        Self {
            bind_addr,
            db_pool,
            auth,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: wedding_backend::domain::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Directory photos are written to.
    #[must_use]
    pub fn with_upload_dir(mut self, upload_dir: PathBuf) -> Self {
        self.upload_dir = upload_dir;
        self
    }

    /// Largest photo body the upload route will accept.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
