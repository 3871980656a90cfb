//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL content store and audit ledger via Diesel
//! - **storage**: photo files in a capability-scoped upload directory
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod persistence;
pub mod storage;
