//! Row persistence and the create-or-duplicate decision

use async_trait::async_trait;

use super::error::StoreError;
use super::models::{StoredRow, ValidatedRow};

/// Result of a conditional insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    AlreadyExists,
}

/// Storage for imported rows, keyed by a unique id
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn exists(&self, id: &str) -> Result<bool, StoreError>;

    /// Insert a row. An id that is already stored is a [`StoreError::Conflict`],
    /// never an overwrite.
    async fn create(&self, row: &StoredRow) -> Result<(), StoreError>;

    /// Insert a row unless its id is taken, as one atomic step
    async fn insert_if_absent(&self, row: &StoredRow) -> Result<InsertOutcome, StoreError>;

    /// All rows in insertion order
    async fn list(&self) -> Result<Vec<StoredRow>, StoreError>;
}

/// What happened to a row that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Created,
    Duplicate,
}

/// Store a validated row.
///
/// A create is attempted when the id is new *or* the row carries a parsed
/// date, so a known id with a date goes to the store and fails there on the
/// unique key. Only a known id without a date is reported as a duplicate.
pub async fn dispose(store: &dyn RowStore, row: &ValidatedRow) -> Result<Disposition, StoreError> {
    let stored = StoredRow::from(row);

    if row.date.is_some() {
        store.create(&stored).await?;
        return Ok(Disposition::Created);
    }

    match store.insert_if_absent(&stored).await? {
        InsertOutcome::Created => Ok(Disposition::Created),
        InsertOutcome::AlreadyExists => Ok(Disposition::Duplicate),
    }
}
