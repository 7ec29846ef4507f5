#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the incident panel.
//!
//! Loads the enriched incident dataset once at startup into a shared
//! [`DatasetCache`] and serves cascading filter options, aggregates and
//! paginated filtered rows. Every request carries its own filter criteria.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use incident_panel_dataset::DatasetCache;
use incident_panel_source::DatasetConfig;

/// Default bind address when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// Session-lifetime cache of the enriched dataset.
    pub cache: Arc<DatasetCache>,
}

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    /// Interface to bind.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
}

impl ServerOptions {
    /// Reads `BIND_ADDR` and `PORT`, falling back to `127.0.0.1:8080`.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { bind_addr, port }
    }
}

/// Registers the `/api` routes. Shared by [`run_server`] and the handler
/// tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/load-report", web::get().to(handlers::load_report))
            .route("/options", web::post().to(handlers::options))
            .route("/summary", web::post().to(handlers::summary))
            .route("/incidents", web::post().to(handlers::incidents))
            .route("/reload", web::post().to(handlers::reload)),
    );
}

/// Starts the incident panel API server.
///
/// Loads the dataset described by `config` before binding, so a missing
/// incident export stops the server instead of failing every request. This
/// is a regular async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the dataset cannot be loaded, or
/// if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: DatasetConfig, options: ServerOptions) -> std::io::Result<()> {
    let cache = Arc::new(DatasetCache::from_config(config));

    log::info!("Loading incident dataset...");
    let loader = Arc::clone(&cache);
    let loaded = web::block(move || loader.get_or_load())
        .await
        .map_err(std::io::Error::other)?
        .map_err(|e| {
            log::error!("Failed to load incident dataset: {e}");
            std::io::Error::other(e)
        })?;

    if !loaded.report.is_enriched() {
        log::warn!("Serving without camera catalog: region and neighborhood filters disabled");
    }

    let state = web::Data::new(AppState { cache });
    let ServerOptions { bind_addr, port } = options;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
