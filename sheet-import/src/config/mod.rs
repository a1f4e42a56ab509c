//! Configuration loaded from `config.toml`
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! `SHEET_IMPORT_DATABASE_URL` overrides the database URL.

pub mod repository;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::import::{DEFAULT_CHUNK_SIZE, ResultLocation};

const APP_DIR: &str = "sheet-import";

/// Environment variable overriding [`DatabaseConfig::url`]
pub const DATABASE_URL_ENV: &str = "SHEET_IMPORT_DATABASE_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory accepted uploads are copied into
    pub upload_dir: PathBuf,
    /// Error report written at the end of every job
    pub result_path: PathBuf,
    /// Write one report per job next to `result_path` instead of sharing it
    pub result_per_job: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub chunk_size: usize,
    pub job_timeout_secs: u64,
    pub max_concurrent_jobs: usize,
}

/// `~/.local/share/sheet-import` or the platform equivalent
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: format!("sqlite://{}", data_dir().join("rows.db").display()),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data = data_dir();
        Self {
            upload_dir: data.join("uploads"),
            result_path: data.join("result.txt"),
            result_per_job: false,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            job_timeout_secs: 300,
            max_concurrent_jobs: 4,
        }
    }
}

impl Config {
    /// `~/.config/sheet-import/config.toml` or the platform equivalent
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Load from `path`, or from [`Config::default_path`] when none is given.
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            config.database.url = url;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Where finished jobs write their error report
    pub fn result_location(&self) -> ResultLocation {
        if self.storage.result_per_job {
            let dir = self
                .storage
                .result_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            ResultLocation::PerJob { dir }
        } else {
            ResultLocation::Shared(self.storage.result_path.clone())
        }
    }

    /// Make sure the SQLite file's directory exists before connecting
    pub fn ensure_database_dir(&self) -> Result<()> {
        let Some(file) = self.database.url.strip_prefix("sqlite://") else {
            return Ok(());
        };
        let file = file.split('?').next().unwrap_or(file);
        if let Some(parent) = Path::new(file).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.import.chunk_size, 1000);
        assert_eq!(config.import.job_timeout_secs, 300);
        assert!(!config.storage.result_per_job);
        assert!(config.database.url.starts_with("sqlite://"));
        assert!(matches!(config.result_location(), ResultLocation::Shared(_)));
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
            [storage]
            result_path = "/srv/import/result.txt"
            result_per_job = true

            [import]
            chunk_size = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.import.chunk_size, 250);
        assert_eq!(config.import.max_concurrent_jobs, 4);
        assert_eq!(
            config.result_location(),
            ResultLocation::PerJob {
                dir: PathBuf::from("/srv/import")
            }
        );
        assert_eq!(config.database, DatabaseConfig::default());
    }

    #[test]
    fn test_unknown_types_rejected() {
        assert!(Config::from_toml("[import]\nchunk_size = \"lots\"").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_ensure_database_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db_dir = dir.path().join("nested").join("db");
        let config = Config {
            database: DatabaseConfig {
                url: format!("sqlite://{}?mode=rwc", db_dir.join("rows.db").display()),
            },
            ..Config::default()
        };

        config.ensure_database_dir().unwrap();
        assert!(db_dir.is_dir());
    }
}
