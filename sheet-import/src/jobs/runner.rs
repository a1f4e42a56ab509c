//! Asynchronous job runner
//!
//! Each dispatched import runs on its own tokio task, waits for a slot from
//! the [`JobLimiter`] and is cut off after the configured time budget. There
//! is no retry; a failed job is logged and reported through its handle.

use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::limiter::{JobLimiter, LimiterStats};
use crate::import::{ImportError, ImportPipeline, JobSummary};

/// How a dispatched job ended
#[derive(Debug)]
pub enum JobOutcome {
    Completed(JobSummary),
    Failed(ImportError),
    /// The job ran past its time budget and was dropped mid-run
    TimedOut(Duration),
    /// The runner was shut down before the job got a slot
    Aborted,
}

impl JobOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, JobOutcome::Completed(_))
    }
}

#[derive(Clone)]
pub struct JobRunner {
    pipeline: Arc<ImportPipeline>,
    limiter: JobLimiter,
    timeout: Duration,
}

impl JobRunner {
    pub fn new(pipeline: Arc<ImportPipeline>, max_jobs: usize, timeout: Duration) -> Self {
        Self {
            pipeline,
            limiter: JobLimiter::new(max_jobs),
            timeout,
        }
    }

    /// Schedule an import of `path`. The caller may await the handle or drop it.
    pub fn dispatch(&self, path: PathBuf) -> JoinHandle<JobOutcome> {
        let pipeline = self.pipeline.clone();
        let limiter = self.limiter.clone();
        let timeout = self.timeout;

        info!("Dispatching import job for {}", path.display());

        tokio::spawn(async move {
            let Some(_permit) = limiter.acquire().await else {
                warn!("Import job for {} aborted: runner shut down", path.display());
                return JobOutcome::Aborted;
            };

            match tokio::time::timeout(timeout, pipeline.run(&path)).await {
                Ok(Ok(summary)) => JobOutcome::Completed(summary),
                // The pipeline has already logged the failure
                Ok(Err(err)) => JobOutcome::Failed(err),
                Err(_) => {
                    error!(
                        "Import job for {} exceeded its time budget of {:?}",
                        path.display(),
                        timeout
                    );
                    JobOutcome::TimedOut(timeout)
                }
            }
        })
    }

    /// Refuse jobs that have not started yet
    pub fn shutdown(&self) {
        self.limiter.close();
    }

    pub fn stats(&self) -> LimiterStats {
        self.limiter.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::test_support::{
        MemoryProgressStore, MemoryRowStore, numbered_rows, write_generated,
    };
    use crate::import::{InsertOutcome, ProgressReporter, ResultLocation, RowStore, StoreError, StoredRow};
    use async_trait::async_trait;

    /// Row store that sleeps before every write
    struct SlowRowStore {
        inner: MemoryRowStore,
        delay: Duration,
    }

    #[async_trait]
    impl RowStore for SlowRowStore {
        async fn exists(&self, id: &str) -> Result<bool, StoreError> {
            self.inner.exists(id).await
        }

        async fn create(&self, row: &StoredRow) -> Result<(), StoreError> {
            tokio::time::sleep(self.delay).await;
            self.inner.create(row).await
        }

        async fn insert_if_absent(&self, row: &StoredRow) -> Result<InsertOutcome, StoreError> {
            tokio::time::sleep(self.delay).await;
            self.inner.insert_if_absent(row).await
        }

        async fn list(&self) -> Result<Vec<StoredRow>, StoreError> {
            self.inner.list().await
        }
    }

    fn runner_with(
        dir: &std::path::Path,
        rows: Arc<dyn RowStore>,
        progress: Arc<MemoryProgressStore>,
        max_jobs: usize,
        timeout: Duration,
    ) -> JobRunner {
        let pipeline = ImportPipeline::new(
            rows,
            ProgressReporter::new(progress),
            ResultLocation::PerJob {
                dir: dir.join("results"),
            },
        );
        JobRunner::new(Arc::new(pipeline), max_jobs, timeout)
    }

    fn runner(dir: &std::path::Path, rows: Arc<MemoryRowStore>, max_jobs: usize) -> JobRunner {
        runner_with(
            dir,
            rows,
            Arc::new(MemoryProgressStore::new()),
            max_jobs,
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn test_dispatch_completes() {
        let dir = tempfile::tempdir().unwrap();
        let rows = Arc::new(MemoryRowStore::new());
        let runner = runner(dir.path(), rows.clone(), 2);
        let path = write_generated(dir.path(), "a.xlsx", &numbered_rows(1, 5));

        let outcome = runner.dispatch(path).await.unwrap();

        assert!(outcome.is_completed());
        assert_eq!(rows.list().await.unwrap().len(), 5);
        assert_eq!(runner.stats().jobs_started, 1);
    }

    #[tokio::test]
    async fn test_dispatch_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner(dir.path(), Arc::new(MemoryRowStore::new()), 1);

        let outcome = runner.dispatch(dir.path().join("gone.xlsx")).await.unwrap();

        match outcome {
            JobOutcome::Failed(err) => assert!(err.is_file_not_found()),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_job_past_time_budget_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let rows = Arc::new(SlowRowStore {
            inner: MemoryRowStore::new(),
            delay: Duration::from_millis(200),
        });
        let progress = Arc::new(MemoryProgressStore::new());
        let budget = Duration::from_millis(50);
        let runner = runner_with(dir.path(), rows.clone(), progress.clone(), 1, budget);
        let path = write_generated(dir.path(), "slow.xlsx", &numbered_rows(1, 5));

        let outcome = runner.dispatch(path.clone()).await.unwrap();

        match outcome {
            JobOutcome::TimedOut(limit) => assert_eq!(limit, budget),
            other => panic!("expected timeout, got {:?}", other),
        }

        // The pending write was dropped with the job and nothing resumes it
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rows.list().await.unwrap().is_empty());
        let reporter = ProgressReporter::new(progress);
        assert_eq!(reporter.fetch(&path.display().to_string()).await.unwrap(), None);
        let results = ResultLocation::PerJob {
            dir: dir.path().join("results"),
        };
        assert!(!results.path_for(&path.display().to_string()).exists());

        // The slot is given back
        assert_eq!(runner.stats().available, 1);
    }

    #[tokio::test]
    async fn test_concurrent_jobs_share_store() {
        let dir = tempfile::tempdir().unwrap();
        let rows = Arc::new(MemoryRowStore::new());
        let runner = runner(dir.path(), rows.clone(), 1);
        let a = write_generated(dir.path(), "a.xlsx", &numbered_rows(1, 10));
        let b = write_generated(dir.path(), "b.xlsx", &numbered_rows(11, 10));

        let ha = runner.dispatch(a);
        let hb = runner.dispatch(b);

        assert!(ha.await.unwrap().is_completed());
        assert!(hb.await.unwrap().is_completed());
        assert_eq!(rows.list().await.unwrap().len(), 20);
        assert_eq!(runner.stats().jobs_started, 2);
    }

    #[tokio::test]
    async fn test_shutdown_aborts_pending() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner(dir.path(), Arc::new(MemoryRowStore::new()), 1);
        runner.shutdown();

        let outcome = runner.dispatch(dir.path().join("never.xlsx")).await.unwrap();
        assert!(matches!(outcome, JobOutcome::Aborted));
    }
}
