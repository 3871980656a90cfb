//! Driving port for the public site's reads.

use async_trait::async_trait;

use crate::domain::{Error, Message, Photo, Wedding};

/// Port for public read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestQuery: Send + Sync {
    /// The wedding being celebrated.
    async fn wedding(&self) -> Result<Wedding, Error>;

    /// Approved messages, newest first.
    async fn approved_messages(&self) -> Result<Vec<Message>, Error>;

    /// Approved photos, newest first.
    async fn approved_photos(&self) -> Result<Vec<Photo>, Error>;
}
