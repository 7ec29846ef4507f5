#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Criteria and option types for the cascading incident filter.
//!
//! A [`FilterCriteria`] value carries one selection per [`FilterStage`].
//! Stages run in a fixed order and each stage's option set is computed from
//! the records that survived the stages before it.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use incident_panel_incident_models::Secretariat;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Label of the secretariat choice that disables the secretariat stage.
pub const ALL_SECRETARIATS_LABEL: &str = "Todas";

/// One step of the cascading filter, in evaluation order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FilterStage {
    /// Occurrence date range.
    DateRange,
    /// Single secretariat, or all.
    Secretariat,
    /// Camera regions.
    Region,
    /// Camera neighborhoods.
    Neighborhood,
    /// Canonical camera identifiers.
    Camera,
    /// Incident types.
    IncidentType,
    /// Problem categories.
    ProblemCategory,
}

impl FilterStage {
    /// Every stage in evaluation order.
    pub const ALL: [Self; 7] = [
        Self::DateRange,
        Self::Secretariat,
        Self::Region,
        Self::Neighborhood,
        Self::Camera,
        Self::IncidentType,
        Self::ProblemCategory,
    ];

    /// Human-readable stage name for prompts and tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DateRange => "Date range",
            Self::Secretariat => "Secretariat",
            Self::Region => "Region",
            Self::Neighborhood => "Neighborhood",
            Self::Camera => "Camera",
            Self::IncidentType => "Incident type",
            Self::ProblemCategory => "Problem category",
        }
    }

    /// Whether this stage reads a camera catalog column.
    #[must_use]
    pub const fn requires_enrichment(self) -> bool {
        matches!(self, Self::Region | Self::Neighborhood)
    }

    /// Whether this stage takes a list of values (empty = no-op).
    #[must_use]
    pub const fn is_multi_select(self) -> bool {
        !matches!(self, Self::DateRange | Self::Secretariat)
    }
}

/// Earliest and latest occurrence dates in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBounds {
    /// Date of the earliest occurrence.
    pub min: NaiveDate,
    /// Date of the latest occurrence.
    pub max: NaiveDate,
}

/// Date range applied by the first stage. Both ends are whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included, up to 23:59:59.
    pub end: NaiveDate,
}

impl DateRange {
    /// Inclusive lower timestamp bound (`start` at midnight).
    #[must_use]
    pub fn lower_bound(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Exclusive upper timestamp bound (midnight after `end`).
    #[must_use]
    pub fn upper_bound(&self) -> NaiveDateTime {
        self.end
            .succ_opt()
            .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN))
    }

    /// Whether `ts` falls in `[start 00:00, end + 1 day 00:00)`.
    #[must_use]
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.lower_bound() && ts < self.upper_bound()
    }
}

/// One selection per filter stage.
///
/// Every field defaults to "no restriction": absent dates fall back to the
/// dataset's bounds and empty lists leave their stage as a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// First day of the date range.
    pub start_date: Option<NaiveDate>,
    /// Last day of the date range (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Selected secretariat. `None` (or `"Todas"` on the wire) selects all.
    #[serde(deserialize_with = "deserialize_secretariat_choice")]
    pub secretariat: Option<Secretariat>,
    /// Selected regions.
    pub regions: Vec<String>,
    /// Selected neighborhoods.
    pub neighborhoods: Vec<String>,
    /// Selected canonical camera identifiers.
    pub cameras: Vec<String>,
    /// Selected incident types.
    pub incident_types: Vec<String>,
    /// Selected problem categories.
    pub problem_categories: Vec<String>,
}

impl FilterCriteria {
    /// Values selected for a multi-select stage. Empty for the date and
    /// secretariat stages.
    #[must_use]
    pub fn selected(&self, stage: FilterStage) -> &[String] {
        match stage {
            FilterStage::DateRange | FilterStage::Secretariat => &[],
            FilterStage::Region => &self.regions,
            FilterStage::Neighborhood => &self.neighborhoods,
            FilterStage::Camera => &self.cameras,
            FilterStage::IncidentType => &self.incident_types,
            FilterStage::ProblemCategory => &self.problem_categories,
        }
    }

    /// Mutable access to a multi-select stage's values, or `None` for the
    /// date and secretariat stages.
    pub fn selected_mut(&mut self, stage: FilterStage) -> Option<&mut Vec<String>> {
        match stage {
            FilterStage::DateRange | FilterStage::Secretariat => None,
            FilterStage::Region => Some(&mut self.regions),
            FilterStage::Neighborhood => Some(&mut self.neighborhoods),
            FilterStage::Camera => Some(&mut self.cameras),
            FilterStage::IncidentType => Some(&mut self.incident_types),
            FilterStage::ProblemCategory => Some(&mut self.problem_categories),
        }
    }
}

/// Parses a secretariat choice label. `"Todas"` means no restriction.
///
/// # Errors
///
/// Returns [`strum::ParseError`] for labels other than `Todas`, `SG`,
/// `SCSP` and `Outros`.
pub fn parse_secretariat_choice(label: &str) -> Result<Option<Secretariat>, strum::ParseError> {
    let label = label.trim();
    if label.eq_ignore_ascii_case(ALL_SECRETARIATS_LABEL) {
        return Ok(None);
    }
    label.parse().map(Some)
}

/// Error text for a label [`parse_secretariat_choice`] rejects, listing the
/// accepted choices.
#[must_use]
pub fn unknown_secretariat_message(label: &str) -> String {
    let mut choices = vec![ALL_SECRETARIATS_LABEL.to_string()];
    choices.extend(Secretariat::all().iter().map(ToString::to_string));
    let last = choices.pop().unwrap_or_default();
    format!(
        "unknown secretariat '{label}': expected {} or {last}",
        choices.join(", ")
    )
}

fn deserialize_secretariat_choice<'de, D>(deserializer: D) -> Result<Option<Secretariat>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    match label {
        None => Ok(None),
        Some(label) => parse_secretariat_choice(&label)
            .map_err(|_| serde::de::Error::custom(unknown_secretariat_message(&label))),
    }
}

/// Option set offered by one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOptions {
    /// The stage these options belong to.
    pub stage: FilterStage,
    /// Sorted distinct non-null values among the records that reached this
    /// stage.
    pub values: Vec<String>,
    /// `false` when the stage cannot run (catalog columns missing).
    pub available: bool,
}

impl StageOptions {
    /// Choices to present to a user. The secretariat stage leads with the
    /// `"Todas"` sentinel.
    #[must_use]
    pub fn choices(&self) -> Vec<String> {
        if self.stage == FilterStage::Secretariat {
            std::iter::once(ALL_SECRETARIATS_LABEL.to_string())
                .chain(self.values.iter().cloned())
                .collect()
        } else {
            self.values.clone()
        }
    }
}

/// Option sets for every stage of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeOptions {
    /// Bounds of the full dataset, offered by the date-range stage.
    pub date_bounds: Option<DateBounds>,
    /// Date range actually applied (criteria with defaults filled in).
    pub applied_range: Option<DateRange>,
    /// Options for stages two through seven, in order.
    pub stages: Vec<StageOptions>,
}

impl CascadeOptions {
    /// Options for a given list or secretariat stage.
    #[must_use]
    pub fn for_stage(&self, stage: FilterStage) -> Option<&StageOptions> {
        self.stages.iter().find(|o| o.stage == stage)
    }
}
