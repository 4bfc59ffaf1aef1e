//! In-memory check-in storage.
//!
//! Thread-safe implementation of [`CheckInStore`], used by tests and by
//! embedders that already hold check-ins in memory.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::CheckIn;
use crate::error::{AnnieError, Result};
use crate::storage::CheckInStore;

/// In-memory check-in store.
///
/// Check-ins are keyed by ID and lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryCheckInStore {
    check_ins: RwLock<HashMap<String, CheckIn>>,
}

impl MemoryCheckInStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given check-ins.
    pub fn with_check_ins(check_ins: impl IntoIterator<Item = CheckIn>) -> Self {
        let map = check_ins.into_iter().map(|c| (c.id.clone(), c)).collect();
        Self {
            check_ins: RwLock::new(map),
        }
    }

    /// Insert or replace a check-in.
    pub fn insert(&self, check_in: CheckIn) -> Result<()> {
        let mut check_ins = self
            .check_ins
            .write()
            .map_err(|_| AnnieError::store("check-in store lock poisoned"))?;
        check_ins.insert(check_in.id.clone(), check_in);
        Ok(())
    }

    /// Get the number of check-ins in the store.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, CheckIn>>> {
        self.check_ins
            .read()
            .map_err(|_| AnnieError::store("check-in store lock poisoned"))
    }
}

#[async_trait]
impl CheckInStore for MemoryCheckInStore {
    async fn find_by_user_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CheckIn>> {
        let check_ins = self.read()?;
        Ok(check_ins
            .values()
            .filter(|c| c.user_id == user_id && c.timestamp >= since)
            .cloned()
            .collect())
    }

    async fn find_by_user_all(&self, user_id: &str) -> Result<Vec<DateTime<Utc>>> {
        let check_ins = self.read()?;
        let mut timestamps: Vec<DateTime<Utc>> = check_ins
            .values()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.timestamp)
            .collect();
        timestamps.sort_by(|a, b| b.cmp(a));
        Ok(timestamps)
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64> {
        let check_ins = self.read()?;
        Ok(check_ins.values().filter(|c| c.user_id == user_id).count() as u64)
    }

    async fn find_by_id(&self, check_in_id: &str) -> Result<Option<CheckIn>> {
        let check_ins = self.read()?;
        Ok(check_ins.get(check_in_id).cloned())
    }
}
