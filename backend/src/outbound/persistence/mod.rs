//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin: they translate between the internal row structs
//! in `models.rs` and domain types, and map database failures onto the port
//! error enums. Connections come from a `bb8` pool via `diesel-async`;
//! migrations are embedded and run once at startup.
//!
//! ```ignore
//! use wedding_backend::outbound::persistence::{DbPool, DieselContentRepository, PoolConfig};
//!
//! run_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let content = DieselContentRepository::new(pool.clone());
//! ```

mod diesel_audit_log_repository;
mod diesel_content_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_audit_log_repository::DieselAuditLogRepository;
pub use diesel_content_repository::DieselContentRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
