//! `progress` command

use anyhow::{Context, Result};
use colored::*;

use crate::cli::ProgressArgs;
use crate::cli::context::AppContext;

pub async fn handle_progress_command(ctx: &AppContext, args: ProgressArgs) -> Result<()> {
    let path = std::path::absolute(&args.path)
        .with_context(|| format!("Failed to resolve path: {}", args.path.display()))?;
    let job_id = path.display().to_string();

    match ctx.progress.fetch(&job_id).await? {
        Some(progress) => {
            println!("{}", serde_json::to_string(&progress)?);
            if progress.is_complete() {
                eprintln!("{}", "all rows processed".green());
            }
        }
        None => eprintln!("{} {}", "No progress recorded for".yellow(), job_id),
    }
    Ok(())
}
