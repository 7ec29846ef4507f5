//! Dataset source configuration.
//!
//! [`DatasetConfig`] names the two input files and the columns read from
//! each. A default layout matching the municipal export is baked into the
//! binary from `config/default.toml`; a deployment can supply its own TOML
//! file and override the file paths through the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SourceError;

/// The default config, embedded at compile time.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Environment variable overriding the incident file path.
pub const INCIDENTS_PATH_ENV: &str = "INCIDENTS_CSV";

/// Environment variable overriding the camera file path.
pub const CAMERAS_PATH_ENV: &str = "CAMERAS_CSV";

/// Both input sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The incident export.
    pub incidents: IncidentSourceConfig,
    /// The camera catalog.
    pub cameras: CameraSourceConfig,
}

/// Location and layout of the incident export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentSourceConfig {
    /// CSV file path.
    pub path: PathBuf,
    /// Field delimiter (default `;`).
    #[serde(default = "default_incident_delimiter")]
    pub delimiter: String,
    /// Column names.
    pub columns: IncidentColumns,
}

/// Column names of the incident export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentColumns {
    /// Occurrence date, `DD/MM/YYYY`.
    pub date: String,
    /// Occurrence time, `HH:MM:SS`.
    pub time: String,
    /// Merged camera identifier.
    pub camera_id: String,
    /// Occurrence type.
    pub incident_type: String,
    /// Problem columns, tried in order (first non-empty wins). Columns
    /// absent from the file are treated as empty.
    #[serde(default)]
    pub problem: Vec<String>,
}

/// Location and layout of the camera catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSourceConfig {
    /// CSV file path.
    pub path: PathBuf,
    /// Field delimiter (default `,`).
    #[serde(default = "default_camera_delimiter")]
    pub delimiter: String,
    /// Column names.
    pub columns: CameraColumns,
}

/// Column names of the camera catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraColumns {
    /// Camera code (join key).
    pub code: String,
    /// Fixed camera indicator.
    pub fixed_count: String,
    /// PTZ camera indicator.
    pub ptz_count: String,
    /// Administrative region.
    pub region: String,
    /// Neighborhood.
    pub neighborhood: String,
    /// Camera display name.
    pub display_name: String,
}

fn default_incident_delimiter() -> String {
    ";".to_string()
}

fn default_camera_delimiter() -> String {
    ",".to_string()
}

impl IncidentSourceConfig {
    /// Returns the delimiter as a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidDelimiter`] if the delimiter is not a
    /// single ASCII character.
    pub fn delimiter_byte(&self) -> Result<u8, SourceError> {
        delimiter_byte(&self.delimiter)
    }
}

impl CameraSourceConfig {
    /// Returns the delimiter as a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidDelimiter`] if the delimiter is not a
    /// single ASCII character.
    pub fn delimiter_byte(&self) -> Result<u8, SourceError> {
        delimiter_byte(&self.delimiter)
    }
}

fn delimiter_byte(delimiter: &str) -> Result<u8, SourceError> {
    match delimiter.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(SourceError::InvalidDelimiter(delimiter.to_string())),
    }
}

/// Parses a [`DatasetConfig`] from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_config_toml(toml_str: &str) -> Result<DatasetConfig, SourceError> {
    Ok(toml::de::from_str(toml_str)?)
}

impl DatasetConfig {
    /// The embedded default layout.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the embedded TOML is invalid.
    pub fn embedded_default() -> Result<Self, SourceError> {
        parse_config_toml(DEFAULT_CONFIG_TOML)
    }

    /// Reads a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path)?;
        parse_config_toml(&contents)
    }

    /// Loads the config file at `path` (or the embedded default when
    /// `None`) and applies the `INCIDENTS_CSV` / `CAMERAS_CSV` overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the config cannot be read or parsed.
    pub fn resolve(path: Option<&Path>) -> Result<Self, SourceError> {
        let config = match path {
            Some(path) => {
                log::info!("Loading dataset config from {}", path.display());
                Self::from_path(path)?
            }
            None => Self::embedded_default()?,
        };

        Ok(config.with_paths(
            std::env::var_os(INCIDENTS_PATH_ENV).map(PathBuf::from),
            std::env::var_os(CAMERAS_PATH_ENV).map(PathBuf::from),
        ))
    }

    /// Replaces the file paths that are `Some`.
    #[must_use]
    pub fn with_paths(mut self, incidents: Option<PathBuf>, cameras: Option<PathBuf>) -> Self {
        if let Some(path) = incidents {
            self.incidents.path = path;
        }
        if let Some(path) = cameras {
            self.cameras.path = path;
        }
        self
    }
}
