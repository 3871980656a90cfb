//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AccessGate;
use crate::domain::ports::{AdminQuery, GuestCommand, GuestQuery, ModerationCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub access: Arc<AccessGate>,
    pub moderation: Arc<dyn ModerationCommand>,
    pub admin_query: Arc<dyn AdminQuery>,
    pub guest_command: Arc<dyn GuestCommand>,
    pub guest_query: Arc<dyn GuestQuery>,
}

/// Parameter object for [`HttpState::new`].
pub struct HttpStatePorts {
    pub moderation: Arc<dyn ModerationCommand>,
    pub admin_query: Arc<dyn AdminQuery>,
    pub guest_command: Arc<dyn GuestCommand>,
    pub guest_query: Arc<dyn GuestQuery>,
}

impl HttpState {
    /// Bundle the access gate with the driving ports.
    pub fn new(access: Arc<AccessGate>, ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            moderation,
            admin_query,
            guest_command,
            guest_query,
        } = ports;
        Self {
            access,
            moderation,
            admin_query,
            guest_command,
            guest_query,
        }
    }
}
