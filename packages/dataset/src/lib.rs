#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Builds the enriched incident dataset.
//!
//! Loads the incident export (required) and the camera catalog (optional),
//! joins them, and records what happened in a [`LoadReport`]. A missing or
//! unreadable catalog degrades to an unenriched dataset with a warning; a
//! missing incident export is fatal.

pub mod cache;
pub mod join;
pub mod report;

pub use cache::{CacheState, DatasetCache};
pub use join::{JoinOutcome, enrich};
pub use report::{LoadReport, ReferenceStatus};

use incident_panel_incident_models::EnrichedDataset;
use incident_panel_source::{
    CameraCatalog, DatasetConfig, NormalizeOutcome, SourceError, load_cameras, load_incidents,
};

/// Errors that prevent a dataset from being built.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The incident export could not be read or normalized.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// An enriched dataset together with its load diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDataset {
    /// The immutable working dataset.
    pub dataset: EnrichedDataset,
    /// Counts describing how the dataset was built.
    pub report: LoadReport,
}

/// Joins already-normalized incidents with a catalog load result.
///
/// A catalog error is not propagated: it is logged and recorded in the
/// report, and the dataset is built unenriched.
#[must_use]
pub fn build_dataset(
    incidents: NormalizeOutcome,
    catalog: Result<CameraCatalog, SourceError>,
) -> LoadedDataset {
    let (catalog, reference) = match catalog {
        Ok(catalog) => {
            let reference = ReferenceStatus::Loaded {
                cameras: catalog.len(),
                duplicates_discarded: catalog.duplicates_discarded,
                blank_codes: catalog.blank_codes,
            };
            (Some(catalog), reference)
        }
        Err(e) => {
            log::warn!("Camera catalog unavailable, continuing without enrichment: {e}");
            (
                None,
                ReferenceStatus::Unavailable {
                    reason: e.to_string(),
                },
            )
        }
    };

    let NormalizeOutcome {
        records,
        rows_read,
        excluded,
    } = incidents;
    let kept = records.len();
    let JoinOutcome {
        dataset,
        matched,
        unmatched,
    } = enrich(records, catalog.as_ref());

    LoadedDataset {
        dataset,
        report: LoadReport {
            rows_read,
            incidents_kept: kept,
            rows_excluded: excluded,
            reference,
            matched,
            unmatched,
        },
    }
}

/// Loads both sources named in `config` and builds the enriched dataset.
///
/// # Errors
///
/// Returns [`DatasetError::Source`] if the incident export is missing or
/// cannot be parsed. Camera catalog problems never fail the load.
pub fn load_dataset(config: &DatasetConfig) -> Result<LoadedDataset, DatasetError> {
    let incidents = load_incidents(&config.incidents)?;
    let loaded = build_dataset(incidents, load_cameras(&config.cameras));

    log::info!(
        "Dataset ready: {} incidents ({} excluded, {} matched to cameras)",
        loaded.report.incidents_kept,
        loaded.report.rows_excluded,
        loaded.report.matched
    );

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use incident_panel_incident_models::{CameraReference, Enrichment, IncidentRecord, Secretariat};

    use super::*;

    fn outcome(cameras: &[&str]) -> NormalizeOutcome {
        let records = cameras
            .iter()
            .map(|c| IncidentRecord {
                occurred_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
                raw_camera_identifier: Some((*c).to_string()),
                canonical_camera_id: (*c).to_string(),
                secretariat: Secretariat::Sg,
                incident_type: None,
                problem_category: None,
            })
            .collect::<Vec<_>>();
        NormalizeOutcome {
            rows_read: records.len() + 2,
            excluded: 2,
            records,
        }
    }

    fn reference(code: &str) -> CameraReference {
        CameraReference {
            code: code.to_string(),
            fixed_count: Some(1),
            ptz_count: Some(0),
            region: Some("Norte".to_string()),
            neighborhood: None,
            display_name: None,
        }
    }

    #[test]
    fn report_counts_add_up() {
        let catalog = CameraCatalog::from_references([reference("SG1"), reference("SG1")]);
        let loaded = build_dataset(outcome(&["SG1", "SG2", "SG1"]), Ok(catalog));
        let report = &loaded.report;
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.incidents_kept, 3);
        assert_eq!(report.rows_excluded, 2);
        assert_eq!(report.matched + report.unmatched, report.incidents_kept);
        assert_eq!(
            report.reference,
            ReferenceStatus::Loaded {
                cameras: 1,
                duplicates_discarded: 1,
                blank_codes: 0,
            }
        );
        assert!(report.is_enriched());
    }

    #[test]
    fn catalog_error_degrades_to_unenriched() {
        let loaded = build_dataset(
            outcome(&["SG1"]),
            Err(SourceError::MissingCameraFile {
                path: "cams.csv".into(),
            }),
        );
        assert!(!loaded.dataset.is_enriched());
        assert!(!loaded.report.is_enriched());
        assert!(matches!(
            loaded.report.reference,
            ReferenceStatus::Unavailable { ref reason } if reason.contains("cams.csv")
        ));
    }

    #[test]
    fn missing_incident_file_is_fatal() {
        let mut config = DatasetConfig::embedded_default().unwrap();
        config.incidents.path = "/nonexistent/incidents.csv".into();
        let err = load_dataset(&config).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Source(SourceError::MissingIncidentFile { .. })
        ));
    }

    #[test]
    fn missing_camera_file_on_disk_degrades_to_unenriched() {
        let dir = std::env::temp_dir().join(format!(
            "incident_panel_dataset_{}_missing_cameras",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let incidents = dir.join("incidents.csv");
        std::fs::write(
            &incidents,
            "Data da Ocorrência;Hora da ocorrência;Identificador_da_camera_mesclado;Tipo da ocorrência\n\
             05/01/2024;10:15:00;Centro: SG014;Descarte\n\
             31/02/2024;08:30:00;SG014;Descarte\n",
        )
        .unwrap();

        let mut config = DatasetConfig::embedded_default().unwrap();
        config.incidents.path = incidents;
        config.cameras.path = dir.join("no_such_cameras.csv");

        let loaded = load_dataset(&config).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded.dataset.enrichment, Enrichment::Unenriched);
        assert_eq!(loaded.dataset.len(), 1);
        assert_eq!(loaded.report.rows_excluded, 1);
        assert!(matches!(
            loaded.report.reference,
            ReferenceStatus::Unavailable { ref reason } if reason.contains("no_such_cameras.csv")
        ));
    }

    #[test]
    fn report_serializes_camel_case() {
        let loaded = build_dataset(outcome(&[]), Ok(CameraCatalog::default()));
        let json = serde_json::to_value(&loaded.report).unwrap();
        assert_eq!(json["rowsExcluded"], 2);
        assert_eq!(json["reference"]["status"], "loaded");
        assert_eq!(json["reference"]["duplicatesDiscarded"], 0);
    }
}
