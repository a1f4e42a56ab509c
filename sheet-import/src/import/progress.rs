//! Job progress published to a shared key/value store

use async_trait::async_trait;
use std::sync::Arc;

use super::error::StoreError;
use super::models::JobProgress;

/// Key a job's progress is stored under
pub fn progress_key(job_id: &str) -> String {
    format!("progress:{}", job_id)
}

/// Minimal key/value surface progress is written to and read from
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Publishes and reads [`JobProgress`] as JSON under per-job keys
#[derive(Clone)]
pub struct ProgressReporter {
    store: Arc<dyn ProgressStore>,
}

impl ProgressReporter {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    pub async fn publish(&self, job_id: &str, progress: JobProgress) -> Result<(), StoreError> {
        let value = serde_json::to_string(&progress)?;
        self.store.set(&progress_key(job_id), &value).await
    }

    /// `None` means no job has reported progress for this identifier yet
    pub async fn fetch(&self, job_id: &str) -> Result<Option<JobProgress>, StoreError> {
        match self.store.get(&progress_key(job_id)).await? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::test_support::MemoryProgressStore;

    #[tokio::test]
    async fn test_publish_and_fetch() {
        let store = Arc::new(MemoryProgressStore::new());
        let reporter = ProgressReporter::new(store.clone());

        assert_eq!(reporter.fetch("/tmp/a.xlsx").await.unwrap(), None);

        reporter
            .publish("/tmp/a.xlsx", JobProgress { processed: 1, total: 2 })
            .await
            .unwrap();

        assert_eq!(
            store.get("progress:/tmp/a.xlsx").await.unwrap().as_deref(),
            Some(r#"{"processed":1,"total":2}"#)
        );
        assert_eq!(
            reporter.fetch("/tmp/a.xlsx").await.unwrap(),
            Some(JobProgress { processed: 1, total: 2 })
        );
    }

    #[tokio::test]
    async fn test_jobs_do_not_share_keys() {
        let reporter = ProgressReporter::new(Arc::new(MemoryProgressStore::new()));
        reporter
            .publish("a.xlsx", JobProgress { processed: 5, total: 5 })
            .await
            .unwrap();
        reporter
            .publish("b.xlsx", JobProgress { processed: 1, total: 9 })
            .await
            .unwrap();

        assert_eq!(reporter.fetch("a.xlsx").await.unwrap().unwrap().processed, 5);
        assert_eq!(reporter.fetch("b.xlsx").await.unwrap().unwrap().total, 9);
    }

    #[tokio::test]
    async fn test_fetch_rejects_garbage() {
        let store = Arc::new(MemoryProgressStore::new());
        store.set("progress:x", "not json").await.unwrap();

        let reporter = ProgressReporter::new(store);
        assert!(matches!(
            reporter.fetch("x").await,
            Err(StoreError::Serialization(_))
        ));
    }
}
