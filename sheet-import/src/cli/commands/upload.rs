//! `upload` command: the upload boundary
//!
//! Answers like the HTTP endpoint would: a 400-style JSON error for a bad
//! file, a success message as soon as the job is scheduled. The job's own
//! outcome only shows up in the logs, progress and result file.

use anyhow::{Context, Result};
use log::debug;
use serde_json::json;

use super::wait_for_job;
use crate::cli::UploadArgs;
use crate::cli::context::AppContext;
use crate::upload::accept_upload;

pub async fn handle_upload_command(ctx: &AppContext, args: UploadArgs) -> Result<()> {
    let stored = match accept_upload(&args.file, args.mime.as_deref(), &ctx.config.storage.upload_dir).await {
        Ok(path) => path,
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_json())?);
            let status = err.status();
            return Err(err).context(format!("Upload rejected with status {}", status));
        }
    };

    let handle = ctx.runner.dispatch(stored.clone());
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "message": "File uploaded successfully",
            "path": stored.display().to_string(),
        }))?
    );

    // Keep the process alive until the job is done; its result is only logged
    let outcome = wait_for_job(ctx, handle).await?;

    let stats = ctx.runner.stats();
    debug!(
        "Job for {} finished (completed: {}); runner: {} jobs started, {}/{} slots free, {:.0}% waited for a slot",
        stored.display(),
        outcome.is_completed(),
        stats.jobs_started,
        stats.available,
        stats.max_jobs,
        stats.wait_rate() * 100.0
    );
    Ok(())
}
