//! Camera catalog resolution.
//!
//! Projects the camera survey spreadsheet onto [`CameraReference`] rows keyed
//! by camera code. When a code appears more than once the first row wins and
//! later rows are discarded and counted.

use std::collections::BTreeMap;

use incident_panel_incident_models::CameraReference;

use crate::SourceError;
use crate::config::CameraColumns;
use crate::parsing::parse_indicator;
use crate::table::RawTable;

/// Deduplicated camera catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraCatalog {
    cameras: BTreeMap<String, CameraReference>,
    /// Rows dropped because their code was already seen.
    pub duplicates_discarded: usize,
    /// Rows dropped because their code cell was blank.
    pub blank_codes: usize,
}

impl CameraCatalog {
    /// Builds a catalog from references in source order.
    pub fn from_references(references: impl IntoIterator<Item = CameraReference>) -> Self {
        let mut catalog = Self::default();
        for reference in references {
            catalog.insert_first_wins(reference);
        }
        catalog
    }

    fn insert_first_wins(&mut self, reference: CameraReference) {
        if self.cameras.contains_key(&reference.code) {
            log::debug!(
                "Discarding duplicate camera code '{}' (first occurrence kept)",
                reference.code
            );
            self.duplicates_discarded += 1;
        } else {
            self.cameras.insert(reference.code.clone(), reference);
        }
    }

    /// Looks up a camera by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CameraReference> {
        self.cameras.get(code)
    }

    /// Number of distinct cameras.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    /// Whether the catalog has no cameras.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

/// Resolves a camera table into a deduplicated catalog.
///
/// # Errors
///
/// Returns [`SourceError::MissingColumn`] if any configured column is absent.
pub fn resolve_cameras(
    table: &RawTable,
    columns: &CameraColumns,
) -> Result<CameraCatalog, SourceError> {
    let code = table.require_column(&columns.code)?;
    let fixed = table.require_column(&columns.fixed_count)?;
    let ptz = table.require_column(&columns.ptz_count)?;
    let region = table.require_column(&columns.region)?;
    let neighborhood = table.require_column(&columns.neighborhood)?;
    let display_name = table.require_column(&columns.display_name)?;

    let mut catalog = CameraCatalog::default();

    for row in table.rows() {
        let Some(code) = row.get(code) else {
            catalog.blank_codes += 1;
            continue;
        };

        catalog.insert_first_wins(CameraReference {
            code: code.to_owned(),
            fixed_count: row.get(fixed).and_then(parse_indicator),
            ptz_count: row.get(ptz).and_then(parse_indicator),
            region: row.get(region).map(String::from),
            neighborhood: row.get(neighborhood).map(String::from),
            display_name: row.get(display_name).map(String::from),
        });
    }

    log::info!(
        "[{}] resolved {} cameras ({} duplicate codes discarded, {} blank codes skipped)",
        table.label(),
        catalog.len(),
        catalog.duplicates_discarded,
        catalog.blank_codes
    );

    Ok(catalog)
}
