//! Data directory
//!
//! The root is `STOREFRONT_DATA_DIR` when set, else the platform data
//! directory (for example `~/.local/share/storefront` on Linux), else
//! `./.storefront`. The database file lives under `<root>/sqlite/`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::constants::{APP_DOT_FOLDER, APP_NAME, ENV_DATA_DIR, SQLITE_DB_FILENAME};
use crate::utils::file::expand_path;

const DATABASE_DIR: &str = "sqlite";

/// Resolved on-disk locations
#[derive(Debug, Clone)]
pub struct AppStorage {
    data_dir: PathBuf,
}

impl AppStorage {
    /// Create the data directory at its configured or default location
    pub async fn init() -> Result<Self> {
        Self::init_at(default_data_dir()).await
    }

    /// Create the data directory at `root`
    pub async fn init_at(root: PathBuf) -> Result<Self> {
        let database_dir = root.join(DATABASE_DIR);
        tokio::fs::create_dir_all(&database_dir)
            .await
            .with_context(|| format!("Failed to create {}", database_dir.display()))?;

        let data_dir = tokio::fs::canonicalize(&root).await.unwrap_or(root);
        tracing::debug!(data_dir = %data_dir.display(), "Data directory ready");
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// SQLite database file (may not exist yet)
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_DIR).join(SQLITE_DB_FILENAME)
    }
}

fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return expand_path(&dir);
    }

    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DOT_FOLDER))
}
