//! Load diagnostics surfaced to operators.

use serde::Serialize;

/// What happened to the camera catalog during a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ReferenceStatus {
    /// The catalog loaded.
    #[serde(rename_all = "camelCase")]
    Loaded {
        /// Distinct camera codes.
        cameras: usize,
        /// Rows discarded because their code repeated an earlier row.
        duplicates_discarded: usize,
        /// Rows discarded because their code was blank.
        blank_codes: usize,
    },
    /// The catalog could not be used; the dataset is unenriched.
    Unavailable {
        /// Why the catalog was not loaded.
        reason: String,
    },
}

/// Counts describing one dataset load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Incident rows read from the export.
    pub rows_read: usize,
    /// Incidents kept (valid timestamp).
    pub incidents_kept: usize,
    /// Incident rows excluded for a missing or malformed timestamp.
    pub rows_excluded: usize,
    /// Camera catalog outcome.
    pub reference: ReferenceStatus,
    /// Kept incidents matched to a catalog camera.
    pub matched: usize,
    /// Kept incidents with no catalog camera.
    pub unmatched: usize,
}

impl LoadReport {
    /// Whether the camera catalog was applied.
    #[must_use]
    pub const fn is_enriched(&self) -> bool {
        matches!(self.reference, ReferenceStatus::Loaded { .. })
    }
}
