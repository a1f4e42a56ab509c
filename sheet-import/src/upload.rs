//! Upload boundary: accept one spreadsheet, store it, hand back its path
//!
//! Only `.xlsx` workbooks are accepted. A declared MIME type, when given,
//! must be the xlsx one, and the content must at least look like a zip
//! container.

use serde_json::{Value, json};
use std::path::{Path, PathBuf};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

#[derive(Debug)]
pub enum UploadError {
    /// No file at the given path
    Missing(PathBuf),
    /// The file is not an xlsx workbook
    UnsupportedType { file: PathBuf, detail: String },
    Io { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::Missing(path) => write!(f, "The file field is required ({} not found)", path.display()),
            UploadError::UnsupportedType { file, detail } => {
                write!(f, "The file must be a file of type: xlsx ({}: {})", file.display(), detail)
            }
            UploadError::Io { path, source } => {
                write!(f, "Failed to store upload {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UploadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl UploadError {
    /// Status code an HTTP front end would answer with
    pub fn status(&self) -> u16 {
        match self {
            UploadError::Missing(_) | UploadError::UnsupportedType { .. } => 400,
            UploadError::Io { .. } => 500,
        }
    }

    /// Structured body: `{"errors": {"file": [...]}}`
    pub fn to_json(&self) -> Value {
        let message = match self {
            UploadError::Missing(_) => "The file field is required.".to_string(),
            UploadError::UnsupportedType { .. } => "The file must be a file of type: xlsx.".to_string(),
            UploadError::Io { .. } => self.to_string(),
        };
        json!({ "errors": { "file": [message] } })
    }
}

/// Check `source`, copy it into `upload_dir` under a fresh name and return the
/// stored file's absolute path
pub async fn accept_upload(
    source: &Path,
    declared_mime: Option<&str>,
    upload_dir: &Path,
) -> Result<PathBuf, UploadError> {
    if !source.is_file() {
        return Err(UploadError::Missing(source.to_path_buf()));
    }

    let unsupported = |detail: String| UploadError::UnsupportedType {
        file: source.to_path_buf(),
        detail,
    };

    let has_xlsx_extension = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
    if !has_xlsx_extension {
        return Err(unsupported("extension is not .xlsx".to_string()));
    }

    if let Some(mime) = declared_mime {
        if mime != XLSX_MIME {
            return Err(unsupported(format!("declared type {}", mime)));
        }
    }

    let io_error = |path: &Path, source: std::io::Error| UploadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let content = tokio::fs::read(source).await.map_err(|e| io_error(source, e))?;
    if !content.starts_with(ZIP_MAGIC) {
        return Err(unsupported("content is not an xlsx container".to_string()));
    }

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| io_error(upload_dir, e))?;

    let stored = upload_dir.join(format!("{}.xlsx", uuid::Uuid::new_v4()));
    tokio::fs::write(&stored, &content)
        .await
        .map_err(|e| io_error(stored.as_path(), e))?;

    tokio::fs::canonicalize(&stored)
        .await
        .map_err(|e| io_error(stored.as_path(), e))
}
