//! Left-outer join of incidents against the camera catalog.

use incident_panel_incident_models::{
    EnrichedDataset, EnrichedIncident, Enrichment, IncidentRecord,
};
use incident_panel_source::CameraCatalog;
use incident_panel_source::classify::{CameraCounts, classify_camera_type};

/// Result of joining incidents with the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Exactly one row per input incident, in input order.
    pub dataset: EnrichedDataset,
    /// Incidents whose canonical camera id was found in the catalog.
    pub matched: usize,
    /// Incidents with no catalog entry (always all of them when the catalog
    /// is unavailable).
    pub unmatched: usize,
}

/// Joins incidents (by canonical camera id) against the catalog (by code).
///
/// Every incident appears exactly once in the output. With no catalog the
/// dataset is marked [`Enrichment::Unenriched`] and every camera type is
/// `Indefinido`.
#[must_use]
pub fn enrich(records: Vec<IncidentRecord>, catalog: Option<&CameraCatalog>) -> JoinOutcome {
    let Some(catalog) = catalog else {
        let unmatched = records.len();
        return JoinOutcome {
            dataset: EnrichedDataset {
                incidents: records.into_iter().map(EnrichedIncident::unmatched).collect(),
                enrichment: Enrichment::Unenriched,
            },
            matched: 0,
            unmatched,
        };
    };

    let mut matched = 0;
    let incidents: Vec<EnrichedIncident> = records
        .into_iter()
        .map(|incident| {
            let reference = if incident.has_camera() {
                catalog.get(&incident.canonical_camera_id)
            } else {
                None
            };

            match reference {
                Some(camera) => {
                    matched += 1;
                    EnrichedIncident {
                        incident,
                        region: camera.region.clone(),
                        neighborhood: camera.neighborhood.clone(),
                        display_name: camera.display_name.clone(),
                        camera_type: classify_camera_type(CameraCounts {
                            fixed: camera.fixed_count,
                            ptz: camera.ptz_count,
                        }),
                    }
                }
                None => EnrichedIncident::unmatched(incident),
            }
        })
        .collect();

    let unmatched = incidents.len() - matched;
    if unmatched > 0 {
        log::info!("{unmatched} of {} incidents have no camera catalog entry", incidents.len());
    }

    JoinOutcome {
        dataset: EnrichedDataset {
            incidents,
            enrichment: Enrichment::Enriched,
        },
        matched,
        unmatched,
    }
}
