#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate result types computed over a filtered incident set.

use serde::{Deserialize, Serialize};

/// Number of problem categories kept in the ranking.
pub const TOP_PROBLEMS_LIMIT: usize = 15;

/// Headline metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Filtered incident count.
    pub total: u64,
    /// Distinct non-empty canonical camera identifiers.
    pub distinct_cameras: u64,
    /// Whether the filters left nothing to show.
    pub is_empty: bool,
}

/// Count of incidents for one categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category value as it appears in the data.
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

/// Count of incidents for one (hour of day, incident type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyCount {
    /// Hour of day, `0..=23`.
    pub hour: u32,
    /// Incident type.
    pub incident_type: String,
    /// Number of incidents.
    pub count: u64,
}

/// One row of the per-camera table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraRollupRow {
    /// Canonical camera identifier. Empty for incidents without a camera.
    pub code: String,
    /// Camera display name from the catalog.
    pub display_name: Option<String>,
    /// Camera region from the catalog.
    pub region: Option<String>,
    /// Camera neighborhood from the catalog.
    pub neighborhood: Option<String>,
    /// Number of incidents.
    pub count: u64,
}

/// Every aggregate shown for one filter evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    /// Headline metrics.
    pub summary: Summary,
    /// Per-camera counts, busiest first.
    pub cameras: Vec<CameraRollupRow>,
    /// Counts by hour of day and incident type.
    pub hourly: Vec<HourlyCount>,
    /// Counts per incident type, most frequent first.
    pub incident_types: Vec<CategoryCount>,
    /// The most frequent problem categories.
    pub top_problems: Vec<CategoryCount>,
}
