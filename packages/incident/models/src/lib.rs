#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident, camera and enriched record types.
//!
//! Every crate in the incident panel speaks in terms of these types: the
//! source crate produces [`IncidentRecord`] and [`CameraReference`] values,
//! the dataset crate joins them into [`EnrichedIncident`] rows, and the
//! filter and analytics crates read the resulting [`EnrichedDataset`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Administrative department a camera belongs to, derived from the prefix
/// of its canonical identifier.
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
pub enum Secretariat {
    /// Cameras whose identifier starts with `SG`.
    #[serde(rename = "SG")]
    #[strum(serialize = "SG")]
    Sg,
    /// Cameras whose identifier starts with `SCSP`.
    #[serde(rename = "SCSP")]
    #[strum(serialize = "SCSP")]
    Scsp,
    /// Everything else, including incidents without a camera identifier.
    #[serde(rename = "Outros")]
    #[strum(serialize = "Outros")]
    Other,
}

impl Secretariat {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Sg, Self::Scsp, Self::Other]
    }
}

/// Physical kind of a camera as recorded in the camera catalog.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CameraType {
    /// Pan-tilt-zoom camera.
    #[serde(rename = "PTZ")]
    #[strum(serialize = "PTZ")]
    Ptz,
    /// Fixed-angle camera.
    #[serde(rename = "FIXA")]
    #[strum(serialize = "FIXA")]
    Fixed,
    /// Unknown kind: no catalog match, or neither indicator set.
    #[default]
    #[serde(rename = "Indefinido")]
    #[strum(serialize = "Indefinido")]
    Undefined,
}

/// A normalized incident with a valid occurrence timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Date and time of the occurrence (local municipal time, no offset).
    pub occurred_at: NaiveDateTime,
    /// Camera identifier as it appeared in the source row, trimmed. `None`
    /// when the cell was blank.
    pub raw_camera_identifier: Option<String>,
    /// Whitespace-free identifier after the last colon. Empty when the raw
    /// identifier was missing or blank.
    pub canonical_camera_id: String,
    /// Department derived from the canonical identifier prefix.
    pub secretariat: Secretariat,
    /// Type of occurrence, used as-is.
    pub incident_type: Option<String>,
    /// First non-missing value among the problem columns.
    pub problem_category: Option<String>,
}

impl IncidentRecord {
    /// Whether this incident carries a usable camera identifier.
    #[must_use]
    pub fn has_camera(&self) -> bool {
        !self.canonical_camera_id.is_empty()
    }
}

/// One deduplicated row of the camera catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraReference {
    /// Camera code, the join key against [`IncidentRecord::canonical_camera_id`].
    pub code: String,
    /// Number of fixed cameras at this point (indicator, normally 0 or 1).
    pub fixed_count: Option<u32>,
    /// Number of PTZ cameras at this point (indicator, normally 0 or 1).
    pub ptz_count: Option<u32>,
    /// Administrative region.
    pub region: Option<String>,
    /// Neighborhood.
    pub neighborhood: Option<String>,
    /// Human-readable camera name.
    pub display_name: Option<String>,
}

/// An incident joined with its camera's catalog metadata.
///
/// The reference fields are `None` when the incident's camera is not in the
/// catalog, or when the catalog could not be loaded at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedIncident {
    /// The normalized incident.
    #[serde(flatten)]
    pub incident: IncidentRecord,
    /// Administrative region of the matched camera.
    pub region: Option<String>,
    /// Neighborhood of the matched camera.
    pub neighborhood: Option<String>,
    /// Display name of the matched camera.
    pub display_name: Option<String>,
    /// Camera kind derived from the catalog indicators.
    pub camera_type: CameraType,
}

impl EnrichedIncident {
    /// Wraps an incident with no catalog match.
    #[must_use]
    pub const fn unmatched(incident: IncidentRecord) -> Self {
        Self {
            incident,
            region: None,
            neighborhood: None,
            display_name: None,
            camera_type: CameraType::Undefined,
        }
    }

    /// Shorthand for the incident's occurrence timestamp.
    #[must_use]
    pub const fn occurred_at(&self) -> NaiveDateTime {
        self.incident.occurred_at
    }

    /// Shorthand for the incident's canonical camera identifier.
    #[must_use]
    pub fn canonical_camera_id(&self) -> &str {
        &self.incident.canonical_camera_id
    }
}

/// Whether the dataset carries camera catalog columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enrichment {
    /// The catalog loaded; region, neighborhood and display name exist
    /// (possibly `None` for unmatched rows).
    Enriched,
    /// The catalog was unavailable; region, neighborhood and display name
    /// are absent for the whole dataset.
    Unenriched,
}

/// The immutable working dataset shared by every filter evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedDataset {
    /// One row per surviving incident, in source order.
    pub incidents: Vec<EnrichedIncident>,
    /// Whether catalog columns are present.
    pub enrichment: Enrichment,
}

impl EnrichedDataset {
    /// Number of incidents in the dataset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether the dataset has no incidents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Whether region, neighborhood and display name columns exist.
    #[must_use]
    pub fn is_enriched(&self) -> bool {
        self.enrichment == Enrichment::Enriched
    }

    /// Earliest and latest occurrence timestamps, or `None` when empty.
    #[must_use]
    pub fn timestamp_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut iter = self.incidents.iter().map(EnrichedIncident::occurred_at);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), ts| (min.min(ts), max.max(ts))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(ts: &str) -> EnrichedIncident {
        EnrichedIncident::unmatched(IncidentRecord {
            occurred_at: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            raw_camera_identifier: None,
            canonical_camera_id: String::new(),
            secretariat: Secretariat::Other,
            incident_type: None,
            problem_category: None,
        })
    }

    #[test]
    fn labels_match_source_vocabulary() {
        assert_eq!(Secretariat::Sg.to_string(), "SG");
        assert_eq!(Secretariat::Scsp.to_string(), "SCSP");
        assert_eq!(Secretariat::Other.to_string(), "Outros");
        assert_eq!(CameraType::Ptz.to_string(), "PTZ");
        assert_eq!(CameraType::Fixed.to_string(), "FIXA");
        assert_eq!(CameraType::Undefined.to_string(), "Indefinido");
    }

    #[test]
    fn parses_labels_back() {
        for s in Secretariat::all() {
            assert_eq!(s.as_ref().parse::<Secretariat>().unwrap(), *s);
        }
        assert!("Todas".parse::<Secretariat>().is_err());
    }

    #[test]
    fn serializes_labels() {
        assert_eq!(
            serde_json::to_string(&Secretariat::Other).unwrap(),
            "\"Outros\""
        );
        assert_eq!(
            serde_json::to_string(&CameraType::Fixed).unwrap(),
            "\"FIXA\""
        );
    }

    #[test]
    fn timestamp_range_spans_dataset() {
        let dataset = EnrichedDataset {
            incidents: vec![
                incident("2024-01-10 08:00:00"),
                incident("2024-01-02 23:59:59"),
                incident("2024-01-31 00:00:00"),
            ],
            enrichment: Enrichment::Unenriched,
        };
        let (min, max) = dataset.timestamp_range().unwrap();
        assert_eq!(min.to_string(), "2024-01-02 23:59:59");
        assert_eq!(max.to_string(), "2024-01-31 00:00:00");
    }

    #[test]
    fn empty_dataset_has_no_range() {
        let dataset = EnrichedDataset {
            incidents: Vec::new(),
            enrichment: Enrichment::Enriched,
        };
        assert!(dataset.timestamp_range().is_none());
        assert!(dataset.is_empty());
    }
}
