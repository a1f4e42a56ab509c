//! Job concurrency limiter
//!
//! Semaphore-based limiter bounding how many import jobs run at once.
//! Closing it turns away every job still waiting for a permit.

use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub struct JobLimiter {
    semaphore: Arc<Semaphore>,
    max_jobs: usize,
    jobs_started: Arc<AtomicU64>,
    jobs_waited: Arc<AtomicU64>,
}

impl JobLimiter {
    pub fn new(max_jobs: usize) -> Self {
        let max_jobs = max_jobs.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_jobs)),
            max_jobs,
            jobs_started: Arc::new(AtomicU64::new(0)),
            jobs_waited: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait for a job slot. Returns `None` once the limiter has been closed.
    /// The slot is released when the permit is dropped.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        if self.semaphore.available_permits() == 0 {
            self.jobs_waited.fetch_add(1, Ordering::Relaxed);
            debug!("Job limiter: waiting for a slot ({} running)", self.max_jobs);
        }

        let permit = self.semaphore.clone().acquire_owned().await.ok()?;
        self.jobs_started.fetch_add(1, Ordering::Relaxed);

        debug!(
            "Job limiter: slot acquired ({}/{} running)",
            self.in_use(),
            self.max_jobs
        );

        Some(permit)
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn in_use(&self) -> usize {
        self.max_jobs.saturating_sub(self.semaphore.available_permits())
    }

    /// Stop handing out slots. Running jobs keep theirs.
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn stats(&self) -> LimiterStats {
        LimiterStats {
            available: self.available(),
            max_jobs: self.max_jobs,
            jobs_started: self.jobs_started.load(Ordering::Relaxed),
            jobs_waited: self.jobs_waited.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimiterStats {
    pub available: usize,
    pub max_jobs: usize,
    /// Slots handed out since creation
    pub jobs_started: u64,
    /// Times a job had to wait for a slot
    pub jobs_waited: u64,
}

impl LimiterStats {
    pub fn wait_rate(&self) -> f64 {
        if self.jobs_started == 0 {
            0.0
        } else {
            self.jobs_waited as f64 / self.jobs_started as f64
        }
    }
}
