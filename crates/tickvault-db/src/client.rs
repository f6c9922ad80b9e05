use tickvault_core::UtcTimestamp;

use crate::error::{MappingError, StoreError};

/// Seam to the external time-series database.
///
/// The concrete engine is out of scope for this crate's logic: everything
/// above this trait works the same against the HTTP implementation in
/// [`crate::InfluxClient`] or a scripted stub in tests.
pub trait TsdbClient: Send + Sync {
    /// Writes a batch of line-protocol points into `bucket`.
    fn write_lines(&self, bucket: &str, lines: &str) -> Result<(), StoreError>;

    /// Runs a Flux query and returns the tabular result.
    fn query(&self, flux: &str) -> Result<QueryTable, StoreError>;

    /// Deletes all points matching `predicate` within `[start, stop]`.
    fn delete_range(
        &self,
        bucket: &str,
        start: &str,
        stop: &str,
        predicate: &str,
    ) -> Result<(), StoreError>;
}

/// Tabular query result with named columns.
///
/// Column order is a property of the query engine and is never relied on:
/// all access goes through [`RowView`] lookups by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl QueryTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(move |values| RowView {
            columns: &self.columns,
            values,
        })
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Reads the single scalar produced by a `count()` query.
    ///
    /// An empty table means the series holds no rows and counts as zero; a
    /// present table must expose a numeric `_value` column.
    pub fn count_value(&self) -> Result<u64, StoreError> {
        if self.is_empty() {
            return Ok(0);
        }
        let index = self
            .column_index("_value")
            .ok_or_else(|| MappingError::MissingColumn {
                column: "_value".to_string(),
            })?;

        let mut count = 0u64;
        for row in &self.rows {
            let value = row.get(index).map(String::as_str).unwrap_or_default();
            count = value
                .parse::<u64>()
                .or_else(|_| value.parse::<f64>().map(|value| value as u64))
                .map_err(|_| MappingError::InvalidNumber {
                    column: "_value".to_string(),
                    value: value.to_string(),
                })?;
        }
        Ok(count)
    }
}

/// One result row, resolved by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl<'a> RowView<'a> {
    /// Raw cell lookup. Absent columns and empty cells both read as `None`,
    /// since the engine emits an empty cell for a field missing at that
    /// timestamp.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.columns.iter().position(|name| name == column)?;
        match self.values.get(index).map(String::as_str) {
            Some("") | None => None,
            Some(value) => Some(value),
        }
    }

    pub fn f64(&self, column: &str) -> Result<f64, MappingError> {
        let value = self.get(column).ok_or_else(|| MappingError::MissingColumn {
            column: column.to_string(),
        })?;
        value.parse::<f64>().map_err(|_| MappingError::InvalidNumber {
            column: column.to_string(),
            value: value.to_string(),
        })
    }

    pub fn text(&self, column: &str) -> Result<&'a str, MappingError> {
        self.get(column).ok_or_else(|| MappingError::MissingColumn {
            column: column.to_string(),
        })
    }

    pub fn timestamp(&self, column: &str) -> Result<UtcTimestamp, MappingError> {
        let value = self.text(column)?;
        UtcTimestamp::parse(value).map_err(|_| MappingError::InvalidTimestamp {
            column: column.to_string(),
            value: value.to_string(),
        })
    }
}
