//! Check-in store trait.
//!
//! The store is owned by the submission flow; the insight engine only reads.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::CheckIn;
use crate::error::Result;

/// Read access to persisted check-ins.
///
/// Every call may suspend. Implementations report I/O failures as errors;
/// an empty result is never an error.
#[async_trait]
pub trait CheckInStore: Send + Sync {
    /// Check-ins for `user_id` with `timestamp >= since`.
    async fn find_by_user_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CheckIn>>;

    /// Timestamps of every check-in for `user_id`, most recent first.
    async fn find_by_user_all(&self, user_id: &str) -> Result<Vec<DateTime<Utc>>>;

    /// Total number of check-ins for `user_id`.
    async fn count_by_user(&self, user_id: &str) -> Result<u64>;

    /// Retrieve a check-in by ID.
    ///
    /// Returns `Ok(None)` if it doesn't exist.
    async fn find_by_id(&self, check_in_id: &str) -> Result<Option<CheckIn>>;
}

/// Lets `Arc<T>` be used wherever a store is expected, so tests can keep a
/// handle while the engine owns another.
#[async_trait]
impl<T: CheckInStore + ?Sized> CheckInStore for Arc<T> {
    async fn find_by_user_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CheckIn>> {
        (**self).find_by_user_since(user_id, since).await
    }

    async fn find_by_user_all(&self, user_id: &str) -> Result<Vec<DateTime<Utc>>> {
        (**self).find_by_user_all(user_id).await
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64> {
        (**self).count_by_user(user_id).await
    }

    async fn find_by_id(&self, check_in_id: &str) -> Result<Option<CheckIn>> {
        (**self).find_by_id(check_in_id).await
    }
}
