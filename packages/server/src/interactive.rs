//! Interactive mode for the server.
//!
//! Prompts the user for bind address and port before starting the server.

use dialoguer::{Confirm, Input};
use incident_panel_source::DatasetConfig;

use crate::{ServerOptions, run_server};

/// Runs the server in interactive mode, prompting for where to listen.
///
/// Prompts default to the `BIND_ADDR` and `PORT` environment values.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(config: DatasetConfig) -> std::io::Result<()> {
    println!("Incident Panel Server");
    println!();

    let defaults = ServerOptions::from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or(defaults.bind_addr);

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    run_server(config, ServerOptions { bind_addr, port }).await
}
