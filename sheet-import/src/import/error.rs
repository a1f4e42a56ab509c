//! Error types for reading, storing and running import jobs

use std::path::PathBuf;

/// Failure while turning a spreadsheet file into rows
#[derive(Debug)]
pub enum ReadError {
    /// The path does not resolve to a readable file
    FileNotFound(PathBuf),
    /// The file exists but could not be decoded as a workbook
    Decode { path: PathBuf, message: String },
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::FileNotFound(path) => {
                write!(f, "File does not exist: {}", path.display())
            }
            ReadError::Decode { path, message } => {
                write!(f, "Failed to decode spreadsheet {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ReadError {}

/// Failure raised by a row or progress store
#[derive(Debug)]
pub enum StoreError {
    /// A row with this id already exists
    Conflict { id: String },
    Database(sqlx::Error),
    Serialization(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict { id } => {
                write!(f, "UNIQUE constraint failed: a row with id '{}' already exists", id)
            }
            StoreError::Database(err) => write!(f, "database error: {}", err),
            StoreError::Serialization(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Conflict { .. } => None,
            StoreError::Database(err) => Some(err),
            StoreError::Serialization(err) => Some(err),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err)
    }
}

/// Fatal job failure. Any of these aborts the job without writing the result file.
#[derive(Debug)]
pub enum ImportError {
    Read(ReadError),
    /// Creating a row failed; rows created before it stay in the store
    Store { id: String, source: StoreError },
    Progress(StoreError),
    ResultWrite { path: PathBuf, source: std::io::Error },
    /// The blocking decode task panicked or was cancelled
    Worker(tokio::task::JoinError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Read(err) => write!(f, "{}", err),
            ImportError::Store { id, source } => {
                write!(f, "Failed to save row with id '{}': {}", id, source)
            }
            ImportError::Progress(err) => write!(f, "Failed to publish progress: {}", err),
            ImportError::ResultWrite { path, source } => {
                write!(f, "Failed to write result file {}: {}", path.display(), source)
            }
            ImportError::Worker(err) => write!(f, "Spreadsheet decode task failed: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Read(err) => Some(err),
            ImportError::Store { source, .. } => Some(source),
            ImportError::Progress(err) => Some(err),
            ImportError::ResultWrite { source, .. } => Some(source),
            ImportError::Worker(err) => Some(err),
        }
    }
}

impl From<ReadError> for ImportError {
    fn from(err: ReadError) -> Self {
        ImportError::Read(err)
    }
}

impl ImportError {
    /// True when the job failed because its input file is missing
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, ImportError::Read(ReadError::FileNotFound(_)))
    }
}
