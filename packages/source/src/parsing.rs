//! Field-level parsing shared by the incident normalizer and the camera
//! resolver.

use chrono::NaiveDateTime;

/// Format of the combined `date + " " + time` occurrence string.
pub const OCCURRENCE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Parses an occurrence date (`DD/MM/YYYY`) and time (`HH:MM:SS`) into a
/// timestamp. Returns `None` if either part is missing or unparseable.
#[must_use]
pub fn parse_occurrence_timestamp(date: Option<&str>, time: Option<&str>) -> Option<NaiveDateTime> {
    let combined = format!("{} {}", date?.trim(), time?.trim());
    NaiveDateTime::parse_from_str(&combined, OCCURRENCE_FORMAT).ok()
}

/// Derives the canonical camera id: all whitespace removed, then the part
/// after the last colon. Blank input yields an empty id.
#[must_use]
pub fn canonical_camera_id(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.rsplit_once(':') {
        Some((_, tail)) => tail.to_owned(),
        None => compact,
    }
}

/// Parses a camera count indicator such as `"1"`, `"0"` or `"1.0"`.
///
/// Spreadsheet exports often write integers as floats, so any finite,
/// non-negative whole number is accepted.
#[must_use]
pub fn parse_indicator(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let value = s.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(value as u32)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike as _};

    use super::*;

    #[test]
    fn parses_occurrence_timestamp() {
        let ts = parse_occurrence_timestamp(Some("05/02/2024"), Some("14:30:09")).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 2, 5)
            .unwrap()
            .and_hms_opt(14, 30, 9)
            .unwrap();
        assert_eq!(ts, expected);
        assert_eq!(ts.second(), 9);
    }

    #[test]
    fn day_comes_before_month() {
        let ts = parse_occurrence_timestamp(Some("13/01/2024"), Some("00:00:00")).unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
        assert!(parse_occurrence_timestamp(Some("01/13/2024"), Some("00:00:00")).is_none());
    }

    #[test]
    fn rejects_missing_or_malformed_parts() {
        assert!(parse_occurrence_timestamp(None, Some("10:00:00")).is_none());
        assert!(parse_occurrence_timestamp(Some("01/01/2024"), None).is_none());
        assert!(parse_occurrence_timestamp(Some("2024-01-01"), Some("10:00:00")).is_none());
        assert!(parse_occurrence_timestamp(Some("01/01/2024"), Some("10:00")).is_none());
        assert!(parse_occurrence_timestamp(Some("31/02/2024"), Some("10:00:00")).is_none());
        assert!(parse_occurrence_timestamp(Some("01/01/2024"), Some("25:00:00")).is_none());
    }

    #[test]
    fn canonical_id_takes_tail_after_last_colon() {
        assert_eq!(canonical_camera_id("Bairro X: SCSP001"), "SCSP001");
        assert_eq!(canonical_camera_id("A:B:SG 014"), "SG014");
        assert_eq!(canonical_camera_id("SG-014"), "SG-014");
        assert_eq!(canonical_camera_id(" ABC 123 "), "ABC123");
    }

    #[test]
    fn canonical_id_of_blank_is_empty() {
        assert_eq!(canonical_camera_id(""), "");
        assert_eq!(canonical_camera_id("  \t "), "");
        assert_eq!(canonical_camera_id("Centro:"), "");
    }

    #[test]
    fn canonical_id_is_idempotent() {
        for raw in [
            "Bairro X: SCSP001",
            "A : B : C 9",
            "SG-014",
            "",
            " : ",
            "x:y:",
        ] {
            let once = canonical_camera_id(raw);
            assert_eq!(canonical_camera_id(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn parses_indicators() {
        assert_eq!(parse_indicator("1"), Some(1));
        assert_eq!(parse_indicator(" 0 "), Some(0));
        assert_eq!(parse_indicator("1.0"), Some(1));
        assert_eq!(parse_indicator("1.5"), None);
        assert_eq!(parse_indicator("-1"), None);
        assert_eq!(parse_indicator("nan"), None);
        assert_eq!(parse_indicator("x"), None);
    }
}
