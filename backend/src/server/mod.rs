//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::StateBuildError;

use state_builders::build_http_state;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use wedding_backend::Trace;
#[cfg(debug_assertions)]
use wedding_backend::doc::ApiDoc;
use wedding_backend::inbound::http::health::{HealthState, live, ready};
use wedding_backend::inbound::http::state::HttpState;
use wedding_backend::inbound::http::validation::configure_extractors;
use wedding_backend::inbound::http::{admin, guest};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Errors raised while starting the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    State(#[from] StateBuildError),
    #[error("failed to bind HTTP listener: {0}")]
    Bind(#[from] std::io::Error),
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    max_upload_bytes: u64,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        max_upload_bytes,
    } = deps;

    // The admin scope must be registered before the guest `/api` scope.
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_extractors)
        .configure(admin::configure)
        .configure(guest::configure(max_upload_bytes))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server for the given configuration.
///
/// Readiness is flipped once the listener is bound.
///
/// # Errors
/// Returns [`ServerError`] when handler state cannot be assembled or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> Result<Server, ServerError> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let server_health_state = health_state.clone();
    let max_upload_bytes = config.max_upload_bytes;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            max_upload_bytes,
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
