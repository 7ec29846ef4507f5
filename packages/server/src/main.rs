#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the incident panel API server.
//!
//! Reads the dataset config (embedded default plus the `INCIDENTS_CSV` and
//! `CAMERAS_CSV` overrides) and listens on `BIND_ADDR:PORT`.

use incident_panel_server::{ServerOptions, run_server};
use incident_panel_source::DatasetConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = DatasetConfig::resolve(None).map_err(std::io::Error::other)?;

    run_server(config, ServerOptions::from_env()).await
}
