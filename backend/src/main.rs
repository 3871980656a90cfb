//! Backend entry-point: loads settings, migrates the database and serves the
//! guest and admin APIs.

mod server;

use std::time::Duration;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use wedding_backend::inbound::http::expose_error_details;
use wedding_backend::inbound::http::health::HealthState;
use wedding_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use wedding_backend::settings::AppSettings;

use server::{ServerConfig, create_server};

const DB_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let bind_addr = settings.bind_addr()?;
    let auth = settings.auth_config()?;
    let max_upload_bytes = settings.max_upload_bytes()?;

    expose_error_details(!settings.production);
    if settings.production {
        info!("production mode: error details hidden from responses");
    }

    if settings.run_migrations() {
        run_migrations(&settings.database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
    }

    let pool = DbPool::new(
        PoolConfig::new(settings.database_url.as_str())
            .with_max_size(settings.db_max_connections())
            .with_connection_timeout(DB_CONNECT_TIMEOUT),
    )
    .await
    .wrap_err("failed to connect to the database")?;

    let config = ServerConfig::new(bind_addr, pool, auth)
        .with_upload_dir(settings.upload_dir())
        .with_max_upload_bytes(max_upload_bytes);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "wedding backend listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}
