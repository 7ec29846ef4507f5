#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sequential cascading filter over the enriched incident dataset.
//!
//! [`evaluate`] runs the seven [`FilterStage`]s in order. Before each
//! categorical stage applies its selection, the stage's option set is
//! computed from the records that survived the earlier stages, so every
//! option list reflects the upstream choices. Evaluation never mutates the
//! dataset and returns the same result for the same criteria.

pub mod stage;

use chrono::NaiveDate;
use incident_panel_filter_models::{
    CascadeOptions, DateBounds, DateRange, FilterCriteria, FilterStage, StageOptions,
};
use incident_panel_incident_models::{EnrichedDataset, EnrichedIncident};

pub use stage::{apply_date_range, apply_stage, stage_options, stage_value};

/// Errors that halt an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// The start date is after the end date.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Requested first day.
        start: NaiveDate,
        /// Requested last day.
        end: NaiveDate,
    },
}

/// Result of one evaluation: per-stage options plus the surviving records.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    /// Option sets computed along the cascade.
    pub options: CascadeOptions,
    /// Records that passed every stage, in dataset order.
    pub records: Vec<&'a EnrichedIncident>,
}

impl FilterOutcome<'_> {
    /// Number of records that passed every stage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record passed. This is the "no data" state, not an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Earliest and latest occurrence dates of the whole dataset.
#[must_use]
pub fn date_bounds(dataset: &EnrichedDataset) -> Option<DateBounds> {
    dataset.timestamp_range().map(|(min, max)| DateBounds {
        min: min.date(),
        max: max.date(),
    })
}

/// Fills unset date criteria from `bounds` and validates the result.
///
/// Returns `Ok(None)` only when an end of the range is unset and there are
/// no bounds to take it from (an empty dataset).
///
/// # Errors
///
/// Returns [`FilterError::InvalidDateRange`] if the start is after the end.
pub fn resolve_date_range(
    bounds: Option<DateBounds>,
    criteria: &FilterCriteria,
) -> Result<Option<DateRange>, FilterError> {
    let start = criteria.start_date.or_else(|| bounds.map(|b| b.min));
    let end = criteria.end_date.or_else(|| bounds.map(|b| b.max));

    match (start, end) {
        (Some(start), Some(end)) if start > end => {
            Err(FilterError::InvalidDateRange { start, end })
        }
        (Some(start), Some(end)) => Ok(Some(DateRange { start, end })),
        _ => Ok(None),
    }
}

/// Runs every stage of the cascade against `dataset`.
///
/// Region and neighborhood stages are reported as unavailable (and their
/// selections ignored) when the dataset is unenriched.
///
/// # Errors
///
/// Returns [`FilterError::InvalidDateRange`] if the requested start date is
/// after the end date. No partial result is produced.
pub fn evaluate<'a>(
    dataset: &'a EnrichedDataset,
    criteria: &FilterCriteria,
) -> Result<FilterOutcome<'a>, FilterError> {
    let bounds = date_bounds(dataset);
    let applied_range = resolve_date_range(bounds, criteria)?;

    let mut working: Vec<&EnrichedIncident> = dataset.incidents.iter().collect();
    if let Some(range) = &applied_range {
        working = apply_date_range(working, range);
        log::debug!(
            "[{}] {} .. {}: {} records remain",
            FilterStage::DateRange,
            range.start,
            range.end,
            working.len()
        );
    }

    let mut stages = Vec::with_capacity(FilterStage::ALL.len() - 1);

    for stage in FilterStage::ALL.into_iter().skip(1) {
        if stage.requires_enrichment() && !dataset.is_enriched() {
            if !criteria.selected(stage).is_empty() {
                log::warn!(
                    "Ignoring {} selection: camera catalog not loaded",
                    stage.label()
                );
            }
            stages.push(StageOptions {
                stage,
                values: Vec::new(),
                available: false,
            });
            continue;
        }

        stages.push(StageOptions {
            stage,
            values: stage_options(&working, stage),
            available: true,
        });
        working = apply_stage(working, stage, criteria);
        log::debug!("[{stage}] {} records remain", working.len());
    }

    Ok(FilterOutcome {
        options: CascadeOptions {
            date_bounds: bounds,
            applied_range,
            stages,
        },
        records: working,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, TimeDelta};
    use incident_panel_incident_models::{
        CameraType, Enrichment, IncidentRecord, Secretariat,
    };

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(ts: NaiveDateTime, camera: &str, region: &str, kind: &str) -> EnrichedIncident {
        EnrichedIncident {
            incident: IncidentRecord {
                occurred_at: ts,
                raw_camera_identifier: Some(camera.to_string()),
                canonical_camera_id: camera.to_string(),
                secretariat: if camera.starts_with("SG") {
                    Secretariat::Sg
                } else {
                    Secretariat::Scsp
                },
                incident_type: Some(kind.to_string()),
                problem_category: None,
            },
            region: Some(region.to_string()),
            neighborhood: Some(format!("{region}-bairro")),
            display_name: None,
            camera_type: CameraType::Fixed,
        }
    }

    fn dataset(incidents: Vec<EnrichedIncident>) -> EnrichedDataset {
        EnrichedDataset {
            incidents,
            enrichment: Enrichment::Enriched,
        }
    }

    fn jan_feb() -> EnrichedDataset {
        dataset(vec![
            row(date(2024, 1, 5).and_hms_opt(10, 0, 0).unwrap(), "SG1", "A", "Lixo"),
            row(date(2024, 1, 20).and_hms_opt(14, 0, 0).unwrap(), "SG2", "A", "Entulho"),
            row(date(2024, 2, 3).and_hms_opt(9, 0, 0).unwrap(), "SCSP1", "B", "Lixo"),
            row(date(2024, 2, 28).and_hms_opt(22, 0, 0).unwrap(), "SCSP2", "B", "Lixo"),
        ])
    }

    #[test]
    fn region_options_follow_date_range() {
        let data = jan_feb();
        let criteria = FilterCriteria {
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 1, 31)),
            ..FilterCriteria::default()
        };
        let outcome = evaluate(&data, &criteria).unwrap();
        let regions = outcome.options.for_stage(FilterStage::Region).unwrap();
        assert_eq!(regions.values, vec!["A"]);
        assert_eq!(outcome.len(), 2);
    }

    #[test]
    fn downstream_options_follow_upstream_selection() {
        let data = jan_feb();
        let criteria = FilterCriteria {
            regions: vec!["B".to_string()],
            ..FilterCriteria::default()
        };
        let outcome = evaluate(&data, &criteria).unwrap();
        let cameras = outcome.options.for_stage(FilterStage::Camera).unwrap();
        assert_eq!(cameras.values, vec!["SCSP1", "SCSP2"]);
        let regions = outcome.options.for_stage(FilterStage::Region).unwrap();
        assert_eq!(regions.values, vec!["A", "B"]);
    }

    #[test]
    fn defaults_to_full_dataset_bounds() {
        let data = jan_feb();
        let outcome = evaluate(&data, &FilterCriteria::default()).unwrap();
        assert_eq!(outcome.len(), 4);
        assert_eq!(
            outcome.options.date_bounds,
            Some(DateBounds {
                min: date(2024, 1, 5),
                max: date(2024, 2, 28),
            })
        );
        assert_eq!(
            outcome.options.applied_range,
            Some(DateRange {
                start: date(2024, 1, 5),
                end: date(2024, 2, 28),
            })
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let data = jan_feb();
        let criteria = FilterCriteria {
            start_date: Some(date(2024, 3, 10)),
            end_date: Some(date(2024, 3, 1)),
            ..FilterCriteria::default()
        };
        assert_eq!(
            evaluate(&data, &criteria).unwrap_err(),
            FilterError::InvalidDateRange {
                start: date(2024, 3, 10),
                end: date(2024, 3, 1),
            }
        );
    }

    #[test]
    fn evaluation_is_idempotent() {
        let data = jan_feb();
        let criteria = FilterCriteria {
            secretariat: Some(Secretariat::Scsp),
            incident_types: vec!["Lixo".to_string()],
            ..FilterCriteria::default()
        };
        let first = evaluate(&data, &criteria).unwrap();
        let second = evaluate(&data, &criteria).unwrap();
        assert_eq!(first.records, second.records);
        assert_eq!(first.options, second.options);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn end_day_is_inclusive_until_midnight() {
        let start = date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        let incidents = (0..100)
            .map(|i| {
                let ts = start + TimeDelta::minutes(i * 446);
                row(ts, &format!("SG{}", i % 7), "A", "Lixo")
            })
            .collect();
        let data = dataset(incidents);
        let criteria = FilterCriteria {
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 1, 15)),
            ..FilterCriteria::default()
        };
        let outcome = evaluate(&data, &criteria).unwrap();
        let cutoff = date(2024, 1, 16).and_hms_opt(0, 0, 0).unwrap();

        assert!(!outcome.is_empty());
        assert!(outcome.records.iter().all(|r| r.occurred_at() < cutoff));
        let expected = data
            .incidents
            .iter()
            .filter(|r| r.occurred_at() < cutoff)
            .count();
        assert_eq!(outcome.len(), expected);
    }

    #[test]
    fn unenriched_dataset_skips_catalog_stages() {
        let mut data = jan_feb();
        data.enrichment = Enrichment::Unenriched;
        for incident in &mut data.incidents {
            incident.region = None;
            incident.neighborhood = None;
        }
        let criteria = FilterCriteria {
            regions: vec!["A".to_string()],
            ..FilterCriteria::default()
        };
        let outcome = evaluate(&data, &criteria).unwrap();
        assert_eq!(outcome.len(), 4);
        let regions = outcome.options.for_stage(FilterStage::Region).unwrap();
        assert!(!regions.available);
        assert!(regions.values.is_empty());
        assert!(outcome.options.for_stage(FilterStage::Camera).unwrap().available);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let data = jan_feb();
        let criteria = FilterCriteria {
            cameras: vec!["NOPE".to_string()],
            ..FilterCriteria::default()
        };
        let outcome = evaluate(&data, &criteria).unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn empty_dataset_has_no_range() {
        let data = dataset(Vec::new());
        let outcome = evaluate(&data, &FilterCriteria::default()).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.options.applied_range, None);
    }
}
