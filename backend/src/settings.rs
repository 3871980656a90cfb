//! Application settings loaded via OrthoConfig.
//!
//! Values come from `WEDDING_*` environment variables, an optional config
//! file and command-line flags. Secrets are copied into [`Zeroizing`]
//! buffers as soon as they are turned into an [`AuthConfig`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use zeroize::Zeroizing;

use crate::domain::{AuthConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_TOKEN_TTL};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Errors raised when settings values cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("token_ttl_hours must be between 1 and 8760, got {0}")]
    TokenTtl(u64),
    #[error("max_upload_bytes must be greater than zero")]
    UploadLimit,
}

/// The environment layer splits values on commas, so secrets such as argon2
/// PHC strings (`m=19456,t=2,p=1`) can arrive as a list of fragments.
#[derive(Deserialize)]
#[serde(untagged)]
enum SplitString {
    Whole(String),
    Parts(Vec<String>),
}

fn comma_joined<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SplitString::deserialize(deserializer)? {
        SplitString::Whole(value) => value,
        SplitString::Parts(parts) => parts.join(","),
    })
}

/// Runtime configuration for the wedding backend.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WEDDING")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    #[serde(deserialize_with = "comma_joined")]
    pub database_url: String,
    /// Argon2 PHC string for the admin password.
    #[serde(deserialize_with = "comma_joined")]
    pub admin_password_hash: String,
    /// Secret used to sign admin bearer tokens.
    #[serde(deserialize_with = "comma_joined")]
    pub jwt_secret: String,
    /// Admin token lifetime in hours.
    pub token_ttl_hours: Option<u64>,
    /// Directory uploaded photos are written to.
    pub upload_dir: Option<PathBuf>,
    /// Largest accepted photo upload.
    pub max_upload_bytes: Option<u64>,
    /// Pool size for database connections.
    pub db_max_connections: Option<u32>,
    /// Hide error details from API responses.
    #[ortho_config(default = false, skip_cli)]
    pub production: bool,
    /// Apply embedded migrations on startup. Defaults to true.
    #[ortho_config(skip_cli)]
    pub run_migrations: Option<bool>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &"<redacted>")
            .field("admin_password_hash", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("db_max_connections", &self.db_max_connections)
            .field("production", &self.production)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Admin token lifetime.
    ///
    /// # Errors
    /// Returns [`SettingsError::TokenTtl`] outside one hour to one year.
    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        match self.token_ttl_hours {
            None => Ok(DEFAULT_TOKEN_TTL),
            Some(hours @ 1..=8760) => Ok(Duration::from_secs(hours * 3600)),
            Some(hours) => Err(SettingsError::TokenTtl(hours)),
        }
    }

    /// Secrets and lifetime for the access gate.
    ///
    /// # Errors
    /// Propagates [`Self::token_ttl`] failures.
    pub fn auth_config(&self) -> Result<AuthConfig, SettingsError> {
        Ok(AuthConfig {
            admin_password_hash: Zeroizing::new(self.admin_password_hash.trim().to_owned()),
            signing_secret: Zeroizing::new(self.jwt_secret.as_bytes().to_vec()),
            token_ttl: self.token_ttl()?,
        })
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Upload size limit in bytes.
    ///
    /// # Errors
    /// Returns [`SettingsError::UploadLimit`] for zero.
    pub fn max_upload_bytes(&self) -> Result<u64, SettingsError> {
        match self.max_upload_bytes {
            Some(0) => Err(SettingsError::UploadLimit),
            Some(limit) => Ok(limit),
            None => Ok(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}
