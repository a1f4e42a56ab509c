//! The import job: read, validate, store, report
//!
//! A job walks `Started → Reading → Processing → Finalizing → Completed`, or
//! ends in `Failed` from any of them. Rows are handled one at a time in file
//! order; chunking only groups the iteration.

use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::ImportError;
use super::models::{JobProgress, ValidatedRow};
use super::progress::ProgressReporter;
use super::reader::read_rows;
use super::sink::{ErrorSink, ResultLocation};
use super::store::{Disposition, RowStore, dispose};
use super::validate::validate_row;

/// Rows per iteration batch
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Started,
    Reading,
    Processing,
    Finalizing,
    Completed,
    Failed,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Started => write!(f, "Started"),
            JobState::Reading => write!(f, "Reading"),
            JobState::Processing => write!(f, "Processing"),
            JobState::Finalizing => write!(f, "Finalizing"),
            JobState::Completed => write!(f, "Completed"),
            JobState::Failed => write!(f, "Failed"),
        }
    }
}

/// Counts for a job that completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub total: usize,
    pub processed: usize,
    pub created: usize,
    /// Rows that failed validation
    pub rejected: usize,
    pub duplicates: usize,
    pub result_path: PathBuf,
}

/// Runs import jobs against injected stores
pub struct ImportPipeline {
    rows: Arc<dyn RowStore>,
    progress: ProgressReporter,
    results: ResultLocation,
    chunk_size: usize,
}

impl ImportPipeline {
    pub fn new(rows: Arc<dyn RowStore>, progress: ProgressReporter, results: ResultLocation) -> Self {
        Self {
            rows,
            progress,
            results,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Run one job over the spreadsheet at `path`. The path, as given, is the
    /// job identifier used for progress keys and per-job result files.
    pub async fn run(&self, path: &Path) -> Result<JobSummary, ImportError> {
        let job = Job::new(path);
        info!("Processing file: {}", job.id);

        match self.execute(job).await {
            Ok(summary) => {
                info!(
                    "Processing completed for file: {} ({} rows, {} created, {} rejected, {} duplicates)",
                    path.display(),
                    summary.processed,
                    summary.created,
                    summary.rejected,
                    summary.duplicates
                );
                Ok(summary)
            }
            Err((state, err)) => {
                debug!("Job {}: {} -> {}", path.display(), state, JobState::Failed);
                error!("Error processing file: {} - {}", path.display(), err);
                Err(err)
            }
        }
    }

    async fn execute(&self, mut job: Job) -> Result<JobSummary, (JobState, ImportError)> {
        job.advance(JobState::Reading);
        let source = job.path.clone();
        let rows = tokio::task::spawn_blocking(move || read_rows(&source))
            .await
            .map_err(|e| job.fail(ImportError::Worker(e)))?
            .map_err(|e| job.fail(e.into()))?;

        job.advance(JobState::Processing);
        let total = rows.len();
        let mut sink = ErrorSink::new();
        let mut summary = JobSummary {
            total,
            processed: 0,
            created: 0,
            rejected: 0,
            duplicates: 0,
            result_path: self.results.path_for(&job.id),
        };

        for (chunk_idx, chunk) in rows.chunks(self.chunk_size).enumerate() {
            debug!("Job {} - chunk {} ({} rows)", job.id, chunk_idx + 1, chunk.len());

            for raw in chunk {
                summary.processed += 1;
                let validation = validate_row(raw);

                if validation.is_valid() {
                    let row = ValidatedRow::new(raw, validation.date);
                    match dispose(self.rows.as_ref(), &row).await {
                        Ok(Disposition::Created) => {
                            summary.created += 1;
                            info!("Row saved: {:?}", raw);
                        }
                        Ok(Disposition::Duplicate) => {
                            summary.duplicates += 1;
                            sink.record_duplicate(&row.id);
                            warn!("Duplicate ID: {} or invalid date", row.id);
                        }
                        Err(source) => {
                            error!("Error saving row: {:?} - {}", raw, source);
                            return Err(job.fail(ImportError::Store {
                                id: row.id,
                                source,
                            }));
                        }
                    }
                } else {
                    summary.rejected += 1;
                    sink.record_row(summary.processed, &validation.errors);
                }

                let progress = JobProgress {
                    processed: summary.processed,
                    total,
                };
                self.progress
                    .publish(&job.id, progress)
                    .await
                    .map_err(|e| job.fail(ImportError::Progress(e)))?;
            }
        }

        job.advance(JobState::Finalizing);
        sink.flush(&summary.result_path).await.map_err(|source| {
            job.fail(ImportError::ResultWrite {
                path: summary.result_path.clone(),
                source,
            })
        })?;

        job.advance(JobState::Completed);
        Ok(summary)
    }
}

/// Per-run state, never shared between jobs
struct Job {
    id: String,
    path: PathBuf,
    state: JobState,
}

impl Job {
    fn new(path: &Path) -> Self {
        Self {
            id: path.display().to_string(),
            path: path.to_path_buf(),
            state: JobState::Started,
        }
    }

    fn advance(&mut self, next: JobState) {
        debug!("Job {}: {} -> {}", self.id, self.state, next);
        self.state = next;
    }

    /// Record the state the job failed in and hand the error back
    fn fail(&self, err: ImportError) -> (JobState, ImportError) {
        (self.state, err)
    }
}
