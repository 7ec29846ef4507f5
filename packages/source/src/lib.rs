#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident and camera CSV sources.
//!
//! Reads the incident export and the camera catalog according to a
//! [`DatasetConfig`], normalizes incident rows into
//! [`IncidentRecord`](incident_panel_incident_models::IncidentRecord) values
//! and deduplicates the catalog into a [`CameraCatalog`].

pub mod cameras;
pub mod classify;
pub mod config;
pub mod normalize;
pub mod parsing;
pub mod table;

use std::path::{Path, PathBuf};

pub use cameras::{CameraCatalog, resolve_cameras};
pub use config::{CameraSourceConfig, DatasetConfig, IncidentSourceConfig};
pub use normalize::{NormalizeOutcome, normalize_incidents};
pub use table::RawTable;

/// Errors that can occur while reading or normalizing source files.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset config TOML is malformed.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// The incident export does not exist. Nothing can be shown without it.
    #[error("Incident file not found: {}", path.display())]
    MissingIncidentFile {
        /// Path that was tried.
        path: PathBuf,
    },

    /// The camera catalog does not exist.
    #[error("Camera file not found: {}", path.display())]
    MissingCameraFile {
        /// Path that was tried.
        path: PathBuf,
    },

    /// A required column is absent from a table's header row.
    #[error("Column '{column}' missing from {table}")]
    MissingColumn {
        /// Configured column name.
        column: String,
        /// Label of the table being read.
        table: String,
    },

    /// The configured delimiter is not a single ASCII character.
    #[error("Invalid delimiter '{0}': expected a single ASCII character")]
    InvalidDelimiter(String),
}

/// Reads and normalizes the incident export described by `config`.
///
/// # Errors
///
/// Returns [`SourceError::MissingIncidentFile`] if the file does not exist,
/// or another [`SourceError`] if it cannot be parsed.
pub fn load_incidents(config: &IncidentSourceConfig) -> Result<NormalizeOutcome, SourceError> {
    let table = open_table(&config.path, config.delimiter_byte()?, "incident file")
        .map_err(|e| match e {
            SourceError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                SourceError::MissingIncidentFile {
                    path: config.path.clone(),
                }
            }
            other => other,
        })?;

    log::info!(
        "Read {} incident rows from {}",
        table.len(),
        config.path.display()
    );

    normalize_incidents(&table, &config.columns)
}

/// Reads and deduplicates the camera catalog described by `config`.
///
/// # Errors
///
/// Returns [`SourceError::MissingCameraFile`] if the file does not exist,
/// or another [`SourceError`] if it cannot be parsed.
pub fn load_cameras(config: &CameraSourceConfig) -> Result<CameraCatalog, SourceError> {
    let table = open_table(&config.path, config.delimiter_byte()?, "camera file")
        .map_err(|e| match e {
            SourceError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                SourceError::MissingCameraFile {
                    path: config.path.clone(),
                }
            }
            other => other,
        })?;

    log::info!(
        "Read {} camera rows from {}",
        table.len(),
        config.path.display()
    );

    resolve_cameras(&table, &config.columns)
}

fn open_table(path: &Path, delimiter: u8, label: &str) -> Result<RawTable, SourceError> {
    let file = std::fs::File::open(path)?;
    RawTable::read(std::io::BufReader::new(file), delimiter, label)
}
