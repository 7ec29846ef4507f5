#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the incident panel server.
//!
//! These types define the JSON contract between the server and its
//! clients. Filter criteria travel in request bodies so every request
//! carries its own selection and no per-user state lives on the server.

use chrono::NaiveDateTime;
use incident_panel_analytics_models::DashboardReport;
use incident_panel_filter_models::{
    CascadeOptions, DateBounds, DateRange, FilterCriteria, FilterStage, StageOptions,
};
use incident_panel_incident_models::{CameraType, EnrichedIncident, Secretariat};
use serde::{Deserialize, Serialize};

/// Default page size for `POST /api/incidents`.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Largest page size accepted by `POST /api/incidents`.
pub const MAX_PAGE_LIMIT: usize = 1000;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Whether the dataset cache currently holds a dataset.
    pub dataset_loaded: bool,
}

/// A single incident as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncident {
    /// Occurrence date and time (local, no offset).
    pub occurred_at: NaiveDateTime,
    /// Camera identifier as exported.
    pub raw_camera_identifier: Option<String>,
    /// Canonical camera identifier (join and filter key).
    pub canonical_camera_id: String,
    /// Secretariat label.
    pub secretariat: Secretariat,
    /// Incident type.
    pub incident_type: Option<String>,
    /// Consolidated problem category.
    pub problem_category: Option<String>,
    /// Camera region.
    pub region: Option<String>,
    /// Camera neighborhood.
    pub neighborhood: Option<String>,
    /// Camera display name.
    pub display_name: Option<String>,
    /// Camera kind.
    pub camera_type: CameraType,
}

impl From<&EnrichedIncident> for ApiIncident {
    fn from(row: &EnrichedIncident) -> Self {
        Self {
            occurred_at: row.incident.occurred_at,
            raw_camera_identifier: row.incident.raw_camera_identifier.clone(),
            canonical_camera_id: row.incident.canonical_camera_id.clone(),
            secretariat: row.incident.secretariat,
            incident_type: row.incident.incident_type.clone(),
            problem_category: row.incident.problem_category.clone(),
            region: row.region.clone(),
            neighborhood: row.neighborhood.clone(),
            display_name: row.display_name.clone(),
            camera_type: row.camera_type,
        }
    }
}

/// One stage's choices as presented to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStageOptions {
    /// Stage identifier.
    pub stage: FilterStage,
    /// Human-readable stage name.
    pub label: String,
    /// `false` when the camera catalog is missing for this stage.
    pub available: bool,
    /// Choices in display order (`"Todas"` first for the secretariat).
    pub choices: Vec<String>,
}

impl From<&StageOptions> for ApiStageOptions {
    fn from(options: &StageOptions) -> Self {
        Self {
            stage: options.stage,
            label: options.stage.label().to_string(),
            available: options.available,
            choices: options.choices(),
        }
    }
}

/// Response of `POST /api/options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    /// Earliest and latest dates of the whole dataset.
    pub date_bounds: Option<DateBounds>,
    /// Date range in effect after defaults.
    pub applied_range: Option<DateRange>,
    /// Choices for the categorical stages, in evaluation order.
    pub stages: Vec<ApiStageOptions>,
}

impl From<&CascadeOptions> for OptionsResponse {
    fn from(options: &CascadeOptions) -> Self {
        Self {
            date_bounds: options.date_bounds,
            applied_range: options.applied_range,
            stages: options.stages.iter().map(ApiStageOptions::from).collect(),
        }
    }
}

/// Response of `POST /api/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// Date range in effect after defaults.
    pub applied_range: Option<DateRange>,
    /// Whether camera catalog fields are present.
    pub enriched: bool,
    /// Aggregates for the filtered set.
    #[serde(flatten)]
    pub report: DashboardReport,
}

/// Body of `POST /api/incidents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncidentsRequest {
    /// Filter selection.
    pub criteria: FilterCriteria,
    /// Maximum rows to return (default 100, capped at 1000).
    pub limit: Option<usize>,
    /// Rows to skip.
    pub offset: Option<usize>,
}

impl IncidentsRequest {
    /// Page size after applying the default and the cap.
    #[must_use]
    pub fn page_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT)
    }
}

/// Response of `POST /api/incidents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentsResponse {
    /// Filtered count before pagination.
    pub total: usize,
    /// Page size used.
    pub limit: usize,
    /// Rows skipped.
    pub offset: usize,
    /// Whether the filters matched nothing.
    pub is_empty: bool,
    /// The requested page.
    pub incidents: Vec<ApiIncident>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_limit_defaults_and_caps() {
        assert_eq!(IncidentsRequest::default().page_limit(), DEFAULT_PAGE_LIMIT);
        let request = IncidentsRequest {
            limit: Some(50_000),
            ..IncidentsRequest::default()
        };
        assert_eq!(request.page_limit(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn incidents_request_parses_nested_criteria() {
        let request: IncidentsRequest = serde_json::from_str(
            r#"{"criteria":{"secretariat":"SG","cameras":["SG014"]},"offset":20}"#,
        )
        .unwrap();
        assert_eq!(request.criteria.secretariat, Some(Secretariat::Sg));
        assert_eq!(request.criteria.cameras, vec!["SG014"]);
        assert_eq!(request.offset, Some(20));
        assert_eq!(request.limit, None);
    }

    #[test]
    fn secretariat_choices_start_with_todas() {
        let options = StageOptions {
            stage: FilterStage::Secretariat,
            values: vec!["SCSP".to_string()],
            available: true,
        };
        let api = ApiStageOptions::from(&options);
        assert_eq!(api.choices, vec!["Todas", "SCSP"]);
        assert_eq!(api.label, "Secretariat");
    }
}
