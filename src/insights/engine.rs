//! Post-check-in insight orchestration.
//!
//! `find check-in → [pattern] → data-context → validation`. Validation always
//! produces a card, so the only failure the engine itself introduces is a
//! missing check-in.

use chrono::{DateTime, Utc};

use crate::config::InsightConfig;
use crate::core::{CheckIn, InsightCard};
use crate::error::{AnnieError, FailOpen, Result};
use crate::insights::{generate_data_context_card, generate_validation_card};
use crate::stats::{calculate_symptom_average, get_check_in_milestones, CheckInMilestones};
use crate::storage::CheckInStore;

/// Stateless insight engine over a check-in store.
#[derive(Debug)]
pub struct InsightEngine<S: CheckInStore> {
    store: S,
    config: InsightConfig,
}

impl<S: CheckInStore> InsightEngine<S> {
    /// Create an engine with the given store and thresholds.
    pub fn new(store: S, config: InsightConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Pick the single insight card for a freshly submitted check-in.
    ///
    /// Fails with [`AnnieError::CheckInNotFound`] when `check_in_id` does not
    /// exist for `user_id`. Store errors propagate.
    pub async fn generate_post_check_in_insight(
        &self,
        user_id: &str,
        check_in_id: &str,
    ) -> Result<InsightCard> {
        self.generate_post_check_in_insight_at(user_id, check_in_id, Utc::now())
            .await
    }

    /// Same as [`Self::generate_post_check_in_insight`] with an explicit clock.
    pub async fn generate_post_check_in_insight_at(
        &self,
        user_id: &str,
        check_in_id: &str,
        now: DateTime<Utc>,
    ) -> Result<InsightCard> {
        let check_in = self
            .store
            .find_by_id(check_in_id)
            .await?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| AnnieError::check_in_not_found(check_in_id))?;

        if let Some(card) = self.pattern_card(user_id, &check_in).await? {
            return Ok(card);
        }

        if let Some(card) =
            generate_data_context_card(&self.store, user_id, &check_in, &self.config, now).await?
        {
            tracing::debug!(user_id, check_in_id, kind = card.kind.as_str(), title = %card.title, "insight generated");
            return Ok(card);
        }

        let card =
            generate_validation_card(&self.store, user_id, &check_in, &self.config, now).await?;
        tracing::debug!(user_id, check_in_id, kind = card.kind.as_str(), title = %card.title, "insight generated");
        Ok(card)
    }

    /// Advisory variant for callers that have already persisted the check-in.
    ///
    /// Any failure is logged and turned into `None`.
    pub async fn post_check_in_insight_or_none(
        &self,
        user_id: &str,
        check_in_id: &str,
    ) -> Option<InsightCard> {
        self.generate_post_check_in_insight(user_id, check_in_id)
            .await
            .map(Some)
            .fail_open_default("generating post-check-in insight")
    }

    /// Rolling average for one symptom using the configured window.
    pub async fn symptom_average(&self, user_id: &str, symptom_name: &str) -> Result<Option<f64>> {
        calculate_symptom_average(
            &self.store,
            user_id,
            symptom_name,
            self.config.average_window_days,
            Utc::now(),
        )
        .await
    }

    /// Totals, streak and milestone status for a user.
    pub async fn milestones(&self, user_id: &str) -> Result<CheckInMilestones> {
        get_check_in_milestones(&self.store, user_id, &self.config, Utc::now()).await
    }

    /// Pattern detection tier, ranked above data-context. Not implemented yet.
    async fn pattern_card(&self, _user_id: &str, _check_in: &CheckIn) -> Result<Option<InsightCard>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InsightType;
    use crate::storage::MemoryCheckInStore;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Arc;

    fn engine(store: Arc<MemoryCheckInStore>) -> InsightEngine<Arc<MemoryCheckInStore>> {
        InsightEngine::new(store, InsightConfig::default())
    }

    #[tokio::test]
    async fn test_missing_check_in() {
        let engine = engine(Arc::new(MemoryCheckInStore::new()));

        let err = engine
            .generate_post_check_in_insight("u1", "nope")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Check-in not found");
    }

    #[tokio::test]
    async fn test_other_users_check_in_is_not_found() {
        let store = Arc::new(MemoryCheckInStore::new());
        store
            .insert(CheckIn::new("c1", "u2", Utc::now()).with_symptom("headache", 3))
            .unwrap();

        let err = engine(store)
            .generate_post_check_in_insight("u1", "c1")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_data_context_preferred() {
        let store = Arc::new(MemoryCheckInStore::new());
        let now = Utc::now();
        for i in 1..=3 {
            store
                .insert(
                    CheckIn::new(format!("h{}", i), "u1", now - Duration::days(i * 3))
                        .with_symptom("headache", 9),
                )
                .unwrap();
        }
        store
            .insert(CheckIn::new("today", "u1", now).with_symptom("headache", 4))
            .unwrap();

        let card = engine(store)
            .generate_post_check_in_insight_at("u1", "today", now)
            .await
            .unwrap();
        assert_eq!(card.kind, InsightType::DataContext);
        assert!(card.message.contains("below"));
        assert!(card.message.contains("trending better"));
    }

    #[tokio::test]
    async fn test_falls_back_to_validation() {
        let store = Arc::new(MemoryCheckInStore::new());
        let now = Utc::now();
        store
            .insert(CheckIn::new("today", "u1", now).with_symptom("headache", 8))
            .unwrap();

        let card = engine(store)
            .generate_post_check_in_insight_at("u1", "today", now)
            .await
            .unwrap();
        // Only check-in: its own average equals its value, so no comparison
        assert_eq!(card.kind, InsightType::Validation);
        assert_eq!(card.title, "You Showed Up");
        assert!(card.message.contains("8/10"));
    }

    #[tokio::test]
    async fn test_empty_check_in_still_gets_card() {
        let store = Arc::new(MemoryCheckInStore::new());
        let now = Utc::now();
        store.insert(CheckIn::new("today", "u1", now)).unwrap();

        let card = engine(store)
            .generate_post_check_in_insight_at("u1", "today", now)
            .await
            .unwrap();
        assert_eq!(card.kind, InsightType::Validation);
        assert_eq!(card.title, "Effort Recognized");
        assert_eq!(card.metadata["checkInCount"], 1);
    }

    #[tokio::test]
    async fn test_milestone_on_fifth_check_in() {
        let store = Arc::new(MemoryCheckInStore::new());
        let now = Utc::now();
        for i in 1..=4 {
            store
                .insert(CheckIn::new(format!("c{}", i), "u1", now - Duration::days(i * 5)))
                .unwrap();
        }
        store
            .insert(CheckIn::new("today", "u1", now).with_symptom("headache", 2))
            .unwrap();

        let card = engine(store)
            .generate_post_check_in_insight_at("u1", "today", now)
            .await
            .unwrap();
        assert_eq!(card.title, "Milestone Reached");
        assert!(card.message.contains("5th check-in"));
    }

    #[tokio::test]
    async fn test_convenience_accessors() {
        let store = Arc::new(MemoryCheckInStore::new());
        let now = Utc::now();
        store
            .insert(CheckIn::new("a", "u1", now - Duration::days(1)).with_symptom("headache", 4))
            .unwrap();
        store
            .insert(CheckIn::new("b", "u1", now - Duration::days(2)).with_symptom("headache", 6))
            .unwrap();

        let engine = engine(store);
        assert_eq!(engine.symptom_average("u1", "headache").await.unwrap(), Some(5.0));
        assert_eq!(engine.symptom_average("u1", "nausea").await.unwrap(), None);

        let m = engine.milestones("u1").await.unwrap();
        assert_eq!(m.total_check_ins, 2);
        assert_eq!(m.current_streak, 2);
        assert_eq!(engine.store().len().unwrap(), 2);
        assert_eq!(engine.config().average_window_days, 14);
    }

    /// Store whose queries always fail.
    struct FailingStore;

    #[async_trait]
    impl CheckInStore for FailingStore {
        async fn find_by_user_since(
            &self,
            _user_id: &str,
            _since: DateTime<Utc>,
        ) -> Result<Vec<CheckIn>> {
            Err(AnnieError::store("connection reset"))
        }

        async fn find_by_user_all(&self, _user_id: &str) -> Result<Vec<DateTime<Utc>>> {
            Err(AnnieError::store("connection reset"))
        }

        async fn count_by_user(&self, _user_id: &str) -> Result<u64> {
            Err(AnnieError::store("connection reset"))
        }

        async fn find_by_id(&self, _check_in_id: &str) -> Result<Option<CheckIn>> {
            Ok(Some(
                CheckIn::new("c1", "u1", Utc::now()).with_symptom("headache", 5),
            ))
        }
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let engine = InsightEngine::new(FailingStore, InsightConfig::default());

        let err = engine
            .generate_post_check_in_insight("u1", "c1")
            .await
            .unwrap_err();
        assert!(matches!(err, AnnieError::Store { .. }));
    }

    #[tokio::test]
    async fn test_fail_open_returns_none() {
        let engine = InsightEngine::new(FailingStore, InsightConfig::default());
        assert!(engine.post_check_in_insight_or_none("u1", "c1").await.is_none());

        let engine = engine_with_missing();
        assert!(engine.post_check_in_insight_or_none("u1", "nope").await.is_none());
    }

    fn engine_with_missing() -> InsightEngine<Arc<MemoryCheckInStore>> {
        engine(Arc::new(MemoryCheckInStore::new()))
    }
}
