//! Row and progress types shared across the import pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date::canonical;

/// One decoded spreadsheet row: `[id, name, date]` exactly as the cells read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub id: String,
    pub name: String,
    pub date: String,
}

impl RawRow {
    pub fn new(id: impl Into<String>, name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date: date.into(),
        }
    }

    /// Build a row from decoded cells. Missing cells read as empty strings,
    /// anything past the third column is ignored.
    pub fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        let id = cells.next().unwrap_or_default();
        let name = cells.next().unwrap_or_default();
        let date = cells.next().unwrap_or_default();
        Self::new(id, name, date)
    }
}

/// A row that went through validation, carrying the normalized date if one parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    pub id: String,
    pub name: String,
    pub date: Option<NaiveDate>,
}

impl ValidatedRow {
    pub fn new(raw: &RawRow, date: Option<NaiveDate>) -> Self {
        Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            date,
        }
    }
}

/// A persisted row. `id` is unique across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRow {
    pub id: String,
    pub name: String,
    pub date: Option<NaiveDate>,
}

impl StoredRow {
    /// Canonical `Y-m-d` text of the date, empty when the row has none
    pub fn date_key(&self) -> String {
        self.date.map(canonical).unwrap_or_default()
    }
}

impl From<&ValidatedRow> for StoredRow {
    fn from(row: &ValidatedRow) -> Self {
        Self {
            id: row.id.clone(),
            name: row.name.clone(),
            date: row.date,
        }
    }
}

/// Progress counters published after every row of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobProgress {
    pub processed: usize,
    pub total: usize,
}

impl JobProgress {
    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }
}
