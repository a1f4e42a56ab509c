//! Workbook fixtures and in-memory stores for tests

use async_trait::async_trait;
use rust_xlsxwriter::Workbook;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

use super::error::StoreError;
use super::models::StoredRow;
use super::progress::ProgressStore;
use super::store::{InsertOutcome, RowStore};

/// Write `rows` as string cells into the first sheet of a new workbook
pub fn write_workbook(dir: &Path, file_name: &str, rows: &[&[&str]]) -> PathBuf {
    let cells: Vec<(u32, u16, &str)> = rows
        .iter()
        .enumerate()
        .flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (r as u32, c as u16, *cell))
        })
        .collect();
    write_cells(dir, file_name, &cells)
}

/// Write string cells at explicit `(row, column)` positions, leaving the rest blank
pub fn write_cells(dir: &Path, file_name: &str, cells: &[(u32, u16, &str)]) -> PathBuf {
    let path = dir.join(file_name);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for &(row, col, text) in cells {
        worksheet
            .write_string(row, col, text)
            .expect("write fixture cell");
    }

    workbook.save(&path).expect("save fixture workbook");
    path
}

/// Header plus `count` valid rows with ids starting at `first_id`
pub fn numbered_rows(first_id: usize, count: usize) -> Vec<[String; 3]> {
    (first_id..first_id + count)
        .map(|id| {
            [
                id.to_string(),
                "Generated Person".to_string(),
                format!("{:02}.{:02}.2021", id % 28 + 1, id % 12 + 1),
            ]
        })
        .collect()
}

/// Same as [`write_workbook`] but for owned rows, header included
pub fn write_generated(dir: &Path, file_name: &str, rows: &[[String; 3]]) -> PathBuf {
    let header: &[&str] = &["id", "name", "date"];
    let mut borrowed: Vec<Vec<&str>> = vec![header.to_vec()];
    borrowed.extend(rows.iter().map(|r| r.iter().map(String::as_str).collect()));
    let slices: Vec<&[&str]> = borrowed.iter().map(Vec::as_slice).collect();
    write_workbook(dir, file_name, &slices)
}

/// In-process row store
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    rows: Mutex<Vec<StoredRow>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<StoredRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.rows.lock().await.iter().any(|r| r.id == id))
    }

    async fn create(&self, row: &StoredRow) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|r| r.id == row.id) {
            return Err(StoreError::Conflict { id: row.id.clone() });
        }
        rows.push(row.clone());
        Ok(())
    }

    async fn insert_if_absent(&self, row: &StoredRow) -> Result<InsertOutcome, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|r| r.id == row.id) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        rows.push(row.clone());
        Ok(InsertOutcome::Created)
    }

    async fn list(&self) -> Result<Vec<StoredRow>, StoreError> {
        Ok(self.rows.lock().await.clone())
    }
}

/// In-process progress store
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }
}
