//! HTTP inbound adapter exposing REST endpoints.
//!
//! Admin routes live under `/api/admin` and must be registered before the
//! public `/api` scope so the longer prefix wins.

pub mod admin;
pub mod auth;
pub mod envelope;
pub mod error;
pub mod guest;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::{ApiResult, expose_error_details};
