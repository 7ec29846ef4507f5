//! Incident row normalization.
//!
//! Turns raw incident rows into [`IncidentRecord`] values. Rows whose
//! occurrence date and time do not parse are excluded and counted, so the
//! caller can report how much of the export was unusable.

use incident_panel_incident_models::IncidentRecord;

use crate::SourceError;
use crate::classify::classify_secretariat;
use crate::config::IncidentColumns;
use crate::parsing::{canonical_camera_id, parse_occurrence_timestamp};
use crate::table::{RawRow, RawTable};

/// Result of normalizing an incident table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOutcome {
    /// Incidents with a valid timestamp, in source order.
    pub records: Vec<IncidentRecord>,
    /// Number of rows read from the table.
    pub rows_read: usize,
    /// Number of rows dropped because their timestamp did not parse.
    pub excluded: usize,
}

/// Resolved column positions for one incident table.
struct ColumnIndices {
    date: usize,
    time: usize,
    camera_id: usize,
    incident_type: usize,
    problem: Vec<Option<usize>>,
}

impl ColumnIndices {
    fn resolve(table: &RawTable, columns: &IncidentColumns) -> Result<Self, SourceError> {
        let problem = columns
            .problem
            .iter()
            .map(|name| {
                let index = table.column_index(name);
                if index.is_none() {
                    log::debug!(
                        "[{}] problem column '{name}' absent, treating as empty",
                        table.label()
                    );
                }
                index
            })
            .collect();

        Ok(Self {
            date: table.require_column(&columns.date)?,
            time: table.require_column(&columns.time)?,
            camera_id: table.require_column(&columns.camera_id)?,
            incident_type: table.require_column(&columns.incident_type)?,
            problem,
        })
    }
}

/// Normalizes every row of an incident table.
///
/// # Errors
///
/// Returns [`SourceError::MissingColumn`] if the date, time, camera id or
/// incident type column is absent. Missing problem columns are not errors.
pub fn normalize_incidents(
    table: &RawTable,
    columns: &IncidentColumns,
) -> Result<NormalizeOutcome, SourceError> {
    let indices = ColumnIndices::resolve(table, columns)?;

    let mut records = Vec::with_capacity(table.len());
    let mut excluded = 0;

    for (line, row) in table.rows().enumerate() {
        match normalize_row(row, &indices) {
            Some(record) => records.push(record),
            None => {
                excluded += 1;
                log::trace!(
                    "[{}] row {}: unparseable occurrence date/time ({:?} {:?})",
                    table.label(),
                    line + 2,
                    row.get(indices.date),
                    row.get(indices.time)
                );
            }
        }
    }

    if excluded > 0 {
        log::warn!(
            "[{}] excluded {excluded} of {} rows with missing or malformed occurrence timestamps",
            table.label(),
            table.len()
        );
    }

    Ok(NormalizeOutcome {
        records,
        rows_read: table.len(),
        excluded,
    })
}

/// Normalizes a single row; `None` when the timestamp does not parse.
fn normalize_row(row: RawRow<'_>, indices: &ColumnIndices) -> Option<IncidentRecord> {
    let occurred_at = parse_occurrence_timestamp(row.get(indices.date), row.get(indices.time))?;

    let raw_camera_identifier = row.get(indices.camera_id).map(String::from);
    let canonical_camera_id = raw_camera_identifier
        .as_deref()
        .map(canonical_camera_id)
        .unwrap_or_default();
    let secretariat = classify_secretariat(&canonical_camera_id);

    let problem_category = indices
        .problem
        .iter()
        .find_map(|index| row.get_opt(*index))
        .map(String::from);

    Some(IncidentRecord {
        occurred_at,
        raw_camera_identifier,
        canonical_camera_id,
        secretariat,
        incident_type: row.get(indices.incident_type).map(String::from),
        problem_category,
    })
}

#[cfg(test)]
mod tests {
    use incident_panel_incident_models::Secretariat;

    use super::*;
    use crate::config::DatasetConfig;

    fn columns() -> IncidentColumns {
        DatasetConfig::embedded_default().unwrap().incidents.columns
    }

    const HEADER: &str = "Data da Ocorrência;Hora da ocorrência;Identificador_da_camera_mesclado;Tipo da ocorrência;Definição do problema;Tipo do descarte;tipo_do_problema_Mesclado";

    fn table(rows: &[&str]) -> RawTable {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        RawTable::from_str_with(&csv, b';', "incident file").unwrap()
    }

    #[test]
    fn normalizes_valid_row() {
        let t = table(&["05/01/2024;08:15:00;Centro: SG 014;Descarte;;Entulho;Outro"]);
        let outcome = normalize_incidents(&t, &columns()).unwrap();
        assert_eq!(outcome.records.len(), 1);
        let r = &outcome.records[0];
        assert_eq!(r.occurred_at.to_string(), "2024-01-05 08:15:00");
        assert_eq!(r.raw_camera_identifier.as_deref(), Some("Centro: SG 014"));
        assert_eq!(r.canonical_camera_id, "SG014");
        assert_eq!(r.secretariat, Secretariat::Sg);
        assert_eq!(r.incident_type.as_deref(), Some("Descarte"));
        assert_eq!(r.problem_category.as_deref(), Some("Entulho"));
    }

    #[test]
    fn excludes_unparseable_rows_and_counts_them() {
        let t = table(&[
            "05/01/2024;08:15:00;SG1;A;;;",
            "not a date;08:15:00;SG2;A;;;",
            ";08:15:00;SG3;A;;;",
            "06/01/2024;;SG4;A;;;",
            "07/01/2024;23:59:59;SG5;A;;;",
        ]);
        let outcome = normalize_incidents(&t, &columns()).unwrap();
        assert_eq!(outcome.rows_read, 5);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.excluded, 3);
        assert_eq!(outcome.rows_read, outcome.records.len() + outcome.excluded);
    }

    #[test]
    fn problem_category_follows_column_priority() {
        let t = table(&[
            "01/01/2024;00:00:00;X;A;Primeiro;Segundo;Terceiro",
            "01/01/2024;00:00:00;X;A;;Segundo;Terceiro",
            "01/01/2024;00:00:00;X;A;;;Terceiro",
            "01/01/2024;00:00:00;X;A;;;",
        ]);
        let outcome = normalize_incidents(&t, &columns()).unwrap();
        let problems: Vec<_> = outcome
            .records
            .iter()
            .map(|r| r.problem_category.as_deref())
            .collect();
        assert_eq!(
            problems,
            vec![Some("Primeiro"), Some("Segundo"), Some("Terceiro"), None]
        );
    }

    #[test]
    fn absent_problem_columns_read_as_null() {
        let csv = "Data da Ocorrência;Hora da ocorrência;Identificador_da_camera_mesclado;Tipo da ocorrência;Tipo do descarte\n01/01/2024;10:00:00;SCSP7;A;Móveis\n01/01/2024;11:00:00;SCSP7;A;\n";
        let t = RawTable::from_str_with(csv, b';', "incident file").unwrap();
        let outcome = normalize_incidents(&t, &columns()).unwrap();
        assert_eq!(
            outcome.records[0].problem_category.as_deref(),
            Some("Móveis")
        );
        assert_eq!(outcome.records[1].problem_category, None);
    }

    #[test]
    fn missing_camera_identifier_is_empty_and_other() {
        let t = table(&["01/01/2024;10:00:00;;A;;;", "01/01/2024;10:00:00;   ;A;;;"]);
        let outcome = normalize_incidents(&t, &columns()).unwrap();
        for r in &outcome.records {
            assert_eq!(r.raw_camera_identifier, None);
            assert_eq!(r.canonical_camera_id, "");
            assert_eq!(r.secretariat, Secretariat::Other);
            assert!(!r.has_camera());
        }
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let t = RawTable::from_str_with("Data da Ocorrência;x\n01/01/2024;1\n", b';', "incident file")
            .unwrap();
        assert!(matches!(
            normalize_incidents(&t, &columns()),
            Err(SourceError::MissingColumn { .. })
        ));
    }
}
