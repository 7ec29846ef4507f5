//! Per-stage column access, option sets and selection.
//!
//! Both functions here are pure: they take a working set and return a new
//! one (or its options) without touching the underlying dataset.

use std::collections::BTreeSet;

use incident_panel_filter_models::{DateRange, FilterCriteria, FilterStage};
use incident_panel_incident_models::EnrichedIncident;

/// The value a record carries for a stage's column, if any.
///
/// Always `None` for the date-range stage, which filters on the timestamp
/// rather than a categorical column. Empty canonical camera ids read as
/// missing.
#[must_use]
pub fn stage_value(incident: &EnrichedIncident, stage: FilterStage) -> Option<&str> {
    match stage {
        FilterStage::DateRange => None,
        FilterStage::Secretariat => Some(incident.incident.secretariat.as_ref()),
        FilterStage::Region => incident.region.as_deref(),
        FilterStage::Neighborhood => incident.neighborhood.as_deref(),
        FilterStage::Camera => {
            Some(incident.canonical_camera_id()).filter(|id| !id.is_empty())
        }
        FilterStage::IncidentType => incident.incident.incident_type.as_deref(),
        FilterStage::ProblemCategory => incident.incident.problem_category.as_deref(),
    }
}

/// Sorted distinct non-null values of `stage`'s column among `records`.
#[must_use]
pub fn stage_options(records: &[&EnrichedIncident], stage: FilterStage) -> Vec<String> {
    records
        .iter()
        .filter_map(|incident| stage_value(incident, stage))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Keeps the records that fall in `range`.
#[must_use]
pub fn apply_date_range<'a>(
    records: Vec<&'a EnrichedIncident>,
    range: &DateRange,
) -> Vec<&'a EnrichedIncident> {
    records
        .into_iter()
        .filter(|incident| range.contains(incident.occurred_at()))
        .collect()
}

/// Applies one categorical stage's selection from `criteria`.
///
/// The secretariat stage is a no-op when no secretariat is selected; list
/// stages are no-ops when their selection is empty. Records whose column is
/// null never match a non-empty selection.
#[must_use]
pub fn apply_stage<'a>(
    records: Vec<&'a EnrichedIncident>,
    stage: FilterStage,
    criteria: &FilterCriteria,
) -> Vec<&'a EnrichedIncident> {
    match stage {
        FilterStage::DateRange => records,
        FilterStage::Secretariat => match criteria.secretariat {
            None => records,
            Some(secretariat) => records
                .into_iter()
                .filter(|incident| incident.incident.secretariat == secretariat)
                .collect(),
        },
        _ => {
            let selected = criteria.selected(stage);
            if selected.is_empty() {
                return records;
            }
            let selected: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
            records
                .into_iter()
                .filter(|incident| {
                    stage_value(incident, stage).is_some_and(|v| selected.contains(v))
                })
                .collect()
        }
    }
}
