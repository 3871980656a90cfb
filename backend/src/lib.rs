//! Wedding site backend: guest RSVPs, guestbook and photos with admin
//! moderation and an append-only audit trail.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the records,
//! services and ports; [`inbound`] adapts HTTP onto the driving ports;
//! [`outbound`] implements the driven ports with PostgreSQL and the local
//! filesystem.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(feature = "test-support")]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
