//! Command-line interface

pub mod commands;
pub mod context;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{
    handle_import_command, handle_progress_command, handle_result_command, handle_rows_command,
    handle_upload_command,
};
use context::AppContext;

#[derive(Parser, Debug)]
#[command(name = "sheet-import", version, about = "Validate spreadsheet rows and import them into a row store")]
pub struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an import job over a stored spreadsheet and wait for it
    Import(ImportArgs),
    /// Accept a spreadsheet upload, store it and run an import job for it
    Upload(UploadArgs),
    /// Show the progress recorded for a job
    Progress(ProgressArgs),
    /// List stored rows grouped by date
    Rows(RowsArgs),
    /// Print the error report of the last finished job
    Result(ResultArgs),
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Spreadsheet to import; its path is the job identifier
    pub path: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    /// Spreadsheet file to upload
    pub file: PathBuf,

    /// MIME type declared by the uploader
    #[arg(long)]
    pub mime: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ProgressArgs {
    /// Job identifier (the stored file path)
    pub path: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct RowsArgs {
    /// Print raw JSON instead of a table
    #[arg(long)]
    pub json: bool,
    /// Only report whether this id is stored
    #[arg(long, conflicts_with = "json")]
    pub id: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ResultArgs {
    /// Job identifier, needed when reports are kept per job
    pub path: Option<PathBuf>,
}

pub async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::open(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Import(args) => handle_import_command(&ctx, args).await,
        Commands::Upload(args) => handle_upload_command(&ctx, args).await,
        Commands::Progress(args) => handle_progress_command(&ctx, args).await,
        Commands::Rows(args) => handle_rows_command(&ctx, args).await,
        Commands::Result(args) => handle_result_command(&ctx, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from([
            "sheet-import",
            "--config",
            "/etc/sheet-import.toml",
            "upload",
            "people.xlsx",
            "--mime",
            "text/csv",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/etc/sheet-import.toml")));
        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.file, PathBuf::from("people.xlsx"));
                assert_eq!(args.mime.as_deref(), Some("text/csv"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rows_id_lookup() {
        let cli = Cli::try_parse_from(["sheet-import", "rows", "--id", "42"]).unwrap();
        match cli.command {
            Commands::Rows(args) => assert_eq!(args.id.as_deref(), Some("42")),
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["sheet-import", "rows", "--id", "42", "--json"]).is_err());
    }

    #[test]
    fn test_result_path_optional() {
        let cli = Cli::try_parse_from(["sheet-import", "result"]).unwrap();
        assert!(matches!(cli.command, Commands::Result(ResultArgs { path: None })));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
