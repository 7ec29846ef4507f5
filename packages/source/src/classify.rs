//! Rule tables for derived categorical fields.
//!
//! Each classification is an ordered list of `(predicate, label)` rules
//! evaluated first-match-wins, with a fallback label when nothing matches.

use incident_panel_incident_models::{CameraType, Secretariat};

/// A single classification rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule<T: ?Sized, L> {
    /// Label assigned when the predicate holds.
    pub label: L,
    /// Predicate over the classified value.
    pub matches: fn(&T) -> bool,
}

/// Returns the label of the first matching rule, or `fallback`.
#[must_use]
pub fn first_match<T: ?Sized, L: Copy>(rules: &[Rule<T, L>], value: &T, fallback: L) -> L {
    rules
        .iter()
        .find(|rule| (rule.matches)(value))
        .map_or(fallback, |rule| rule.label)
}

// ── Secretariat ──────────────────────────────────────────────────────

fn starts_with_sg(id: &str) -> bool {
    id.starts_with("SG")
}

fn starts_with_scsp(id: &str) -> bool {
    id.starts_with("SCSP")
}

/// Secretariat rules over the canonical camera id.
pub const SECRETARIAT_RULES: &[Rule<str, Secretariat>] = &[
    Rule {
        label: Secretariat::Sg,
        matches: starts_with_sg,
    },
    Rule {
        label: Secretariat::Scsp,
        matches: starts_with_scsp,
    },
];

/// Classifies a canonical camera id into its secretariat.
#[must_use]
pub fn classify_secretariat(canonical_id: &str) -> Secretariat {
    first_match(SECRETARIAT_RULES, canonical_id, Secretariat::Other)
}

// ── Camera type ──────────────────────────────────────────────────────

/// The two catalog indicators a camera type is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraCounts {
    /// Fixed camera indicator.
    pub fixed: Option<u32>,
    /// PTZ camera indicator.
    pub ptz: Option<u32>,
}

fn has_single_ptz(counts: &CameraCounts) -> bool {
    counts.ptz == Some(1)
}

fn has_single_fixed(counts: &CameraCounts) -> bool {
    counts.fixed == Some(1)
}

/// Camera type rules. PTZ is checked before fixed.
pub const CAMERA_TYPE_RULES: &[Rule<CameraCounts, CameraType>] = &[
    Rule {
        label: CameraType::Ptz,
        matches: has_single_ptz,
    },
    Rule {
        label: CameraType::Fixed,
        matches: has_single_fixed,
    },
];

/// Classifies catalog indicators into a camera type.
#[must_use]
pub fn classify_camera_type(counts: CameraCounts) -> CameraType {
    first_match(CAMERA_TYPE_RULES, &counts, CameraType::Undefined)
}
