//! Port for storing uploaded image bytes.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by photo storage adapters.
    pub enum PhotoStorageError {
        /// The filename would escape the storage root.
        InvalidName { name: String } => "invalid photo filename: {name}",
        /// Reading or writing the backing store failed.
        Io { message: String } => "photo storage failed: {message}",
    }
}

/// Port for photo file storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Persist `bytes` under `filename` and return the stored path.
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, PhotoStorageError>;

    /// Remove a stored file. Missing files are not an error.
    async fn remove(&self, filename: &str) -> Result<(), PhotoStorageError>;
}
