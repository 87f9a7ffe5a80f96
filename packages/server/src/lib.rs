#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the RO-PE incident-reporting application.
//!
//! Serves the REST API for submitting and querying occurrence reports,
//! plus the static map frontend. All state lives in [`AppState`]: the
//! in-memory occurrence store, the auth service, and the configuration
//! built once from the environment.

pub mod config;
mod handlers;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use rope_auth::AuthService;
use rope_store::OccurrenceStore;

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Occurrence collection.
    pub store: OccurrenceStore,
    /// User registry and session tokens.
    pub auth: AuthService,
    /// Runtime configuration.
    pub config: ServerConfig,
}

/// Builds the CORS middleware from the configured origin allow-list.
///
/// An empty list yields a permissive policy for local development; a
/// non-empty list restricts browsers to exactly those origins.
fn cors_for(config: &ServerConfig) -> Cors {
    if config.allowed_origins.is_empty() {
        return Cors::permissive();
    }

    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials();
    for origin in &config.allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}

/// Starts the RO-PE API server.
///
/// This is a regular async function — the caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let bind_addr = config.bind_addr.clone();
    let port = config.port;

    let state = web::Data::new(AppState {
        store: OccurrenceStore::new(),
        auth: AuthService::new(),
        config: config.clone(),
    });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = cors_for(&config);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(handlers::api_scope())
            // Serve the map frontend
            .service(Files::new("/", config.static_dir.clone()).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
