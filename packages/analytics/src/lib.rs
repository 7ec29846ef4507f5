#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregates over a filtered incident set.
//!
//! Every function takes the records produced by the filter engine and
//! returns plain result types; nothing here reads files or holds state.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Timelike;
use incident_panel_analytics_models::{
    CameraRollupRow, CategoryCount, DashboardReport, HourlyCount, Summary, TOP_PROBLEMS_LIMIT,
};
use incident_panel_incident_models::EnrichedIncident;

/// Total and distinct-camera counts.
#[must_use]
pub fn summarize(records: &[&EnrichedIncident]) -> Summary {
    let distinct_cameras = records
        .iter()
        .map(|r| r.canonical_camera_id())
        .filter(|id| !id.is_empty())
        .collect::<BTreeSet<_>>()
        .len();

    Summary {
        total: records.len() as u64,
        distinct_cameras: distinct_cameras as u64,
        is_empty: records.is_empty(),
    }
}

/// Per-camera incident counts, busiest first (ties by code).
///
/// Incidents are grouped by canonical camera id, so the counts always sum
/// to the number of records. Catalog fields are taken from the first
/// incident seen for each camera.
#[must_use]
pub fn camera_rollup(records: &[&EnrichedIncident]) -> Vec<CameraRollupRow> {
    let mut rows: HashMap<&str, CameraRollupRow> = HashMap::new();

    for record in records {
        rows.entry(record.canonical_camera_id())
            .or_insert_with(|| CameraRollupRow {
                code: record.canonical_camera_id().to_owned(),
                display_name: record.display_name.clone(),
                region: record.region.clone(),
                neighborhood: record.neighborhood.clone(),
                count: 0,
            })
            .count += 1;
    }

    let mut rows: Vec<CameraRollupRow> = rows.into_values().collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));
    rows
}

/// Counts by (hour of day, incident type), sorted by hour then type.
/// Incidents with no type are left out.
#[must_use]
pub fn hourly_by_type(records: &[&EnrichedIncident]) -> Vec<HourlyCount> {
    let mut counts: BTreeMap<(u32, &str), u64> = BTreeMap::new();
    for record in records {
        if let Some(kind) = record.incident.incident_type.as_deref() {
            *counts.entry((record.occurred_at().hour(), kind)).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|((hour, kind), count)| HourlyCount {
            hour,
            incident_type: kind.to_owned(),
            count,
        })
        .collect()
}

/// Counts per incident type, most frequent first.
#[must_use]
pub fn incident_type_distribution(records: &[&EnrichedIncident]) -> Vec<CategoryCount> {
    ranked_counts(records.iter().filter_map(|r| r.incident.incident_type.as_deref()))
}

/// The `limit` most frequent problem categories. Missing categories are
/// dropped before ranking.
#[must_use]
pub fn problem_ranking(records: &[&EnrichedIncident], limit: usize) -> Vec<CategoryCount> {
    let mut ranked =
        ranked_counts(records.iter().filter_map(|r| r.incident.problem_category.as_deref()));
    ranked.truncate(limit);
    ranked
}

/// Builds every aggregate for one filtered set.
#[must_use]
pub fn build_report(records: &[&EnrichedIncident]) -> DashboardReport {
    DashboardReport {
        summary: summarize(records),
        cameras: camera_rollup(records),
        hourly: hourly_by_type(records),
        incident_types: incident_type_distribution(records),
        top_problems: problem_ranking(records, TOP_PROBLEMS_LIMIT),
    }
}

fn ranked_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut ranked: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_owned(),
            count,
        })
        .collect();
    // Stable sort keeps the alphabetical order from the map for ties.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}
