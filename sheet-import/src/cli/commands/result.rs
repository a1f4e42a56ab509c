//! `result` command: print a job's error report

use anyhow::{Context, Result};

use crate::cli::ResultArgs;
use crate::cli::context::AppContext;
use crate::import::ResultLocation;

pub async fn handle_result_command(ctx: &AppContext, args: ResultArgs) -> Result<()> {
    let location = ctx.config.result_location();
    let path = match (&location, &args.path) {
        (ResultLocation::Shared(path), _) => path.clone(),
        (ResultLocation::PerJob { .. }, Some(job)) => {
            let job = std::path::absolute(job)
                .with_context(|| format!("Failed to resolve path: {}", job.display()))?;
            location.path_for(&job.display().to_string())
        }
        (ResultLocation::PerJob { .. }, None) => {
            anyhow::bail!("Reports are kept per job; pass the job's file path")
        }
    };

    let report = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("No report at {}", path.display()))?;
    if !report.is_empty() {
        println!("{}", report);
    }
    Ok(())
}
