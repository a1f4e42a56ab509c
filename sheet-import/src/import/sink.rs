//! Accumulates per-row error lines and writes the result file

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Where a finished job writes its error report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultLocation {
    /// One file for every job. Jobs finishing at the same time overwrite each
    /// other's report; there is no locking.
    Shared(PathBuf),
    /// One file per job inside `dir`, named from the job identifier
    PerJob { dir: PathBuf },
}

impl ResultLocation {
    pub fn path_for(&self, job_id: &str) -> PathBuf {
        match self {
            ResultLocation::Shared(path) => path.clone(),
            ResultLocation::PerJob { dir } => dir.join(result_file_name(job_id)),
        }
    }
}

/// File name for a job's report: the identifier with every character outside
/// `[A-Za-z0-9_-]` replaced by `_`, followed by the first 12 hex digits of its
/// SHA-256 so identifiers that sanitize alike still get their own file
pub fn result_file_name(job_id: &str) -> String {
    let stem: String = job_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = match stem.trim_matches('_') {
        "" => "result",
        trimmed => trimmed,
    };
    let digest = format!("{:x}", Sha256::digest(job_id.as_bytes()));
    format!("{}-{}.txt", stem, &digest[..12])
}

/// Error lines gathered over one job
#[derive(Debug, Default, Clone)]
pub struct ErrorSink {
    lines: Vec<String>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{row} - {message, message, ...}` for a row that failed validation
    pub fn record_row(&mut self, row_index: usize, errors: &[String]) {
        self.lines.push(format!("{} - {}", row_index, errors.join(", ")));
    }

    /// `{id} - Duplicate ID`
    pub fn record_duplicate(&mut self, id: &str) {
        self.lines.push(format!("{} - Duplicate ID", id));
    }

    /// Write all lines, newline separated, replacing whatever `path` held
    pub async fn flush(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, self.lines.join("\n")).await
    }
}
