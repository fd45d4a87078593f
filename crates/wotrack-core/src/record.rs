use crate::error::{Result, WotrackError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_KEY_COLUMN: &str = "WO Number";

/// A single spreadsheet cell. `None` is a cell the store reported as empty
/// or missing.
pub type Cell = Option<String>;

// ---------------------------------------------------------------------------
// Key normalization
// ---------------------------------------------------------------------------

/// Canonical comparison form of a work order number.
///
/// Trims, drops any trailing `.0` left behind when a numeric cell was
/// stringified (`1200.0`), and uppercases. Only used for matching; the
/// stored text is never rewritten.
pub fn normalize_key(raw: &str) -> String {
    let mut key = raw.trim();
    while let Some(stripped) = key.strip_suffix(".0") {
        key = stripped.trim_end();
    }
    key.to_uppercase()
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Cell>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs; every value is present.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }

    /// Text of `column`, or `None` when the column is absent or the cell empty.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(|c| c.as_deref())
    }

    pub fn cell(&self, column: &str) -> Option<&Cell> {
        self.fields.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: Cell) {
        self.fields.insert(column.into(), value);
    }

    pub fn fields(&self) -> &BTreeMap<String, Cell> {
        &self.fields
    }
}

// ---------------------------------------------------------------------------
// RecordSet
// ---------------------------------------------------------------------------

/// An ordered sheet of records with trimmed headers.
///
/// The normalized form of each record's key column is computed when the set
/// is built and kept in step with edits to that column.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    sheet: String,
    columns: Vec<String>,
    records: Vec<Record>,
    key_column: String,
    keys: Vec<String>,
}

impl RecordSet {
    pub fn new(sheet: impl Into<String>, columns: Vec<String>, records: Vec<Record>) -> Self {
        let mut set = Self {
            sheet: sheet.into(),
            columns: columns.into_iter().map(|c| c.trim().to_string()).collect(),
            records,
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            keys: Vec::new(),
        };
        set.reindex();
        set
    }

    /// Build from a header row and positional rows, as a spreadsheet returns
    /// them. Short rows are padded with empty cells; cells past the header
    /// are dropped.
    pub fn from_grid(sheet: impl Into<String>, header: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let columns: Vec<String> = header.into_iter().map(|c| c.trim().to_string()).collect();
        let records = rows
            .into_iter()
            .map(|row| {
                let mut cells = row.into_iter();
                let mut record = Record::new();
                for column in &columns {
                    record.set(column.clone(), cells.next().flatten());
                }
                record
            })
            .collect();
        Self::new(sheet, columns, records)
    }

    /// Header row plus positional rows in column order.
    pub fn to_grid(&self) -> (Vec<String>, Vec<Vec<Cell>>) {
        let rows = self
            .records
            .iter()
            .map(|r| {
                self.columns
                    .iter()
                    .map(|c| r.cell(c).cloned().flatten())
                    .collect()
            })
            .collect();
        (self.columns.clone(), rows)
    }

    /// Re-key the set on a different column.
    pub fn with_key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = column.into();
        self.reindex();
        self
    }

    fn reindex(&mut self) {
        self.keys = self
            .records
            .iter()
            .map(|r| normalize_key(r.get(&self.key_column).unwrap_or("")))
            .collect();
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Normalized keys, one per record, in record order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(WotrackError::MissingColumn {
                sheet: self.sheet.clone(),
                column: column.to_string(),
            })
        }
    }

    /// Fail on the first header that appears twice. Records are keyed by
    /// column name, so repeated headers cannot be told apart.
    pub fn require_unique_columns(&self) -> Result<()> {
        let mut seen = HashSet::new();
        match self.columns.iter().find(|c| !seen.insert(c.as_str())) {
            Some(column) => Err(WotrackError::DuplicateColumn {
                sheet: self.sheet.clone(),
                column: column.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Overwrite one cell. The column must already exist.
    pub fn set_field(&mut self, index: usize, column: &str, value: Cell) -> Result<()> {
        self.require_column(column)?;
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(WotrackError::RowOutOfRange { index, len })?;
        record.set(column, value);
        if column == self.key_column {
            self.keys[index] = normalize_key(record.get(column).unwrap_or(""));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
