//! Spreadsheet row import: decoding, validation, persistence and reporting

pub mod date;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod sink;
pub mod store;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ImportError, StoreError};
pub use models::StoredRow;
pub use pipeline::{DEFAULT_CHUNK_SIZE, ImportPipeline, JobSummary};
pub use progress::{ProgressReporter, ProgressStore};
pub use sink::ResultLocation;
pub use store::{InsertOutcome, RowStore};
