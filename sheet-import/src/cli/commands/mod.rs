//! Subcommand handlers

use anyhow::{Context, Result};
use log::warn;
use tokio::task::JoinHandle;

use crate::cli::context::AppContext;
use crate::jobs::JobOutcome;

mod import;
mod progress;
mod result;
mod rows;
mod upload;

pub use import::handle_import_command;
pub use progress::handle_progress_command;
pub use result::handle_result_command;
pub use rows::handle_rows_command;
pub use upload::handle_upload_command;

/// Wait for a dispatched job. Ctrl-C shuts the runner down so no queued job
/// starts, and returns without waiting for the running one.
async fn wait_for_job(ctx: &AppContext, handle: JoinHandle<JobOutcome>) -> Result<JobOutcome> {
    tokio::select! {
        joined = handle => joined.context("Import task panicked"),
        _ = tokio::signal::ctrl_c() => {
            ctx.runner.shutdown();
            warn!("Interrupted: no further import jobs will start");
            anyhow::bail!("Interrupted while waiting for the import job")
        }
    }
}
