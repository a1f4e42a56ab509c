//! `import` command: run one job in the foreground

use anyhow::{Context, Result};
use colored::*;

use super::wait_for_job;
use crate::cli::ImportArgs;
use crate::cli::context::AppContext;
use crate::jobs::JobOutcome;

pub async fn handle_import_command(ctx: &AppContext, args: ImportArgs) -> Result<()> {
    let path = std::path::absolute(&args.path)
        .with_context(|| format!("Failed to resolve path: {}", args.path.display()))?;

    let outcome = wait_for_job(ctx, ctx.runner.dispatch(path.clone())).await?;

    match outcome {
        JobOutcome::Completed(summary) => {
            println!(
                "{} {}/{} rows from {}",
                "Imported".green().bold(),
                summary.processed,
                summary.total,
                path.display().to_string().cyan()
            );
            println!("  created:    {}", summary.created);
            println!("  rejected:   {}", summary.rejected);
            println!("  duplicates: {}", summary.duplicates);
            println!("  report:     {}", summary.result_path.display());
            Ok(())
        }
        JobOutcome::Failed(err) if err.is_file_not_found() => {
            anyhow::bail!("No such file: {}", path.display())
        }
        JobOutcome::Failed(err) => Err(err).context(format!("Import of {} failed", path.display())),
        JobOutcome::TimedOut(budget) => {
            anyhow::bail!("Import of {} timed out after {:?}", path.display(), budget)
        }
        JobOutcome::Aborted => anyhow::bail!("Import of {} was aborted", path.display()),
    }
}
