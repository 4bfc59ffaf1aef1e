//! File-based check-in storage.
//!
//! Reads a JSON array of check-in documents. The file is re-read on every
//! query so each insight call sees the current snapshot; nothing is cached.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::default_store_path;
use crate::core::CheckIn;
use crate::error::{AnnieError, Result};
use crate::storage::CheckInStore;

/// File-based check-in store.
#[derive(Debug, Clone)]
pub struct FileCheckInStore {
    path: PathBuf,
}

impl FileCheckInStore {
    /// Open the store at the default location (`~/.annie/checkins.json` or
    /// `$ANNIE_HOME/checkins.json`).
    pub fn new() -> Result<Self> {
        let path = default_store_path().ok_or_else(|| {
            AnnieError::config("Could not determine store path (no home directory)")
        })?;
        Self::open(path)
    }

    /// Open the store at a specific path. The file must exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(AnnieError::storage(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "check-in file not found"),
            ));
        }
        Ok(Self { path })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse every check-in in the file.
    async fn load(&self) -> Result<Vec<CheckIn>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AnnieError::storage(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            AnnieError::serde(format!("{}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl CheckInStore for FileCheckInStore {
    async fn find_by_user_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CheckIn>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|c| c.user_id == user_id && c.timestamp >= since)
            .collect())
    }

    async fn find_by_user_all(&self, user_id: &str) -> Result<Vec<DateTime<Utc>>> {
        let mut timestamps: Vec<DateTime<Utc>> = self
            .load()
            .await?
            .into_iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.timestamp)
            .collect();
        timestamps.sort_by(|a, b| b.cmp(a));
        Ok(timestamps)
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64> {
        let check_ins = self.load().await?;
        Ok(check_ins.iter().filter(|c| c.user_id == user_id).count() as u64)
    }

    async fn find_by_id(&self, check_in_id: &str) -> Result<Option<CheckIn>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|c| c.id == check_in_id))
    }
}
