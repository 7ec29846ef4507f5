//! Header-addressed CSV tables.
//!
//! Parses a delimited file into its header row plus raw records. Values are
//! trimmed on access and empty cells read as missing, so the normalizer and
//! the camera resolver only ever see `Option<&str>`.

use std::io::Read;

use crate::SourceError;

/// A parsed CSV file: header row plus raw records.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Human-readable label for log and error messages.
    label: String,
    /// Trimmed header names.
    headers: Vec<String>,
    /// Raw records, possibly ragged.
    records: Vec<csv::StringRecord>,
}

impl RawTable {
    /// Parses a delimited file whose first row is the header.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Csv`] if the input is not valid delimited text.
    pub fn read<R: Read>(reader: R, delimiter: u8, label: &str) -> Result<Self, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
            .collect();

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "[{label}] parsed {} columns, {} records",
            headers.len(),
            records.len()
        );

        Ok(Self {
            label: label.to_owned(),
            headers,
            records,
        })
    }

    /// Parses an in-memory string. Convenient for fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Csv`] if the input is not valid delimited text.
    pub fn from_str_with(contents: &str, delimiter: u8, label: &str) -> Result<Self, SourceError> {
        Self::read(contents.as_bytes(), delimiter, label)
    }

    /// The table's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of records (header excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a column that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if no header matches `name`.
    pub fn require_column(&self, name: &str) -> Result<usize, SourceError> {
        self.column_index(name)
            .ok_or_else(|| SourceError::MissingColumn {
                column: name.to_owned(),
                table: self.label.clone(),
            })
    }

    /// Iterates over the records.
    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.records.iter().map(|record| RawRow { record })
    }
}

/// One record of a [`RawTable`].
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    record: &'a csv::StringRecord,
}

impl<'a> RawRow<'a> {
    /// Trimmed value at `index`, or `None` if the column is absent, the row
    /// is short, or the cell is blank.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.record
            .get(index)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Like [`Self::get`] but tolerates an absent column.
    #[must_use]
    pub fn get_opt(&self, index: Option<usize>) -> Option<&'a str> {
        index.and_then(|i| self.get(i))
    }
}
