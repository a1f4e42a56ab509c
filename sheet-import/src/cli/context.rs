//! Shared handles built once per CLI invocation

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::config::repository::{SqliteProgressStore, SqliteRowStore, open_pool};
use crate::import::{ImportPipeline, ProgressReporter, RowStore};
use crate::jobs::JobRunner;

pub struct AppContext {
    pub config: Config,
    pub rows: Arc<dyn RowStore>,
    pub progress: ProgressReporter,
    pub runner: JobRunner,
}

impl AppContext {
    pub async fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path)?;
        config.ensure_database_dir()?;
        let pool = open_pool(&config.database.url).await?;

        let rows: Arc<dyn RowStore> = Arc::new(SqliteRowStore::new(pool.clone()));
        let progress = ProgressReporter::new(Arc::new(SqliteProgressStore::new(pool)));

        let pipeline = ImportPipeline::new(rows.clone(), progress.clone(), config.result_location())
            .with_chunk_size(config.import.chunk_size);
        let runner = JobRunner::new(
            Arc::new(pipeline),
            config.import.max_concurrent_jobs,
            Duration::from_secs(config.import.job_timeout_secs),
        );

        Ok(Self {
            config,
            rows,
            progress,
            runner,
        })
    }
}
