//! Check-in totals, consecutive-day streaks and milestone detection.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::InsightConfig;
use crate::error::Result;
use crate::storage::CheckInStore;

/// Milestone bookkeeping for a user, recomputed on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInMilestones {
    /// Total check-ins ever recorded.
    pub total_check_ins: u64,
    /// Consecutive calendar days with a check-in, as of the grace cursor.
    pub current_streak: u32,
    /// Whether `total_check_ins` is exactly a milestone count.
    pub is_milestone: bool,
    /// The milestone reached, when `is_milestone`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_number: Option<u64>,
}

/// Compute totals, streak and milestone status for `user_id`.
pub async fn get_check_in_milestones<S: CheckInStore + ?Sized>(
    store: &S,
    user_id: &str,
    config: &InsightConfig,
    now: DateTime<Utc>,
) -> Result<CheckInMilestones> {
    let total_check_ins = store.count_by_user(user_id).await?;
    let timestamps = store.find_by_user_all(user_id).await?;

    let current_streak = compute_streak(&timestamps, now.date_naive(), config.streak_grace_days);
    let is_milestone = config.is_milestone(total_check_ins);

    let milestones = CheckInMilestones {
        total_check_ins,
        current_streak,
        is_milestone,
        milestone_number: is_milestone.then_some(total_check_ins),
    };
    tracing::debug!(user_id, ?milestones, "check-in milestones");
    Ok(milestones)
}

/// Count consecutive check-in days walking back from `today - grace_days`.
///
/// Timestamps collapse to distinct UTC dates. Dates after the cursor (today,
/// within the grace period) neither extend nor break the streak; the first
/// date earlier than the cursor ends it.
pub fn compute_streak(timestamps: &[DateTime<Utc>], today: NaiveDate, grace_days: u32) -> u32 {
    let dates: BTreeSet<NaiveDate> = timestamps.iter().map(|t| t.date_naive()).collect();

    let Some(mut expected) = today.checked_sub_signed(Duration::days(i64::from(grace_days)))
    else {
        return 0;
    };

    let mut streak = 0;
    for date in dates.iter().rev() {
        if *date == expected {
            streak += 1;
            match expected.pred_opt() {
                Some(prev) => expected = prev,
                None => break,
            }
        } else if *date < expected {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CheckIn;
    use crate::storage::MemoryCheckInStore;
    use chrono::TimeZone;

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn days_before(now: DateTime<Utc>, days: &[i64]) -> Vec<DateTime<Utc>> {
        days.iter().map(|d| now - Duration::days(*d)).collect()
    }

    #[test]
    fn test_streak_empty_history() {
        let now = noon(2026, 3, 10);
        assert_eq!(compute_streak(&[], now.date_naive(), 1), 0);
    }

    #[test]
    fn test_streak_through_yesterday() {
        let now = noon(2026, 3, 10);
        let ts = days_before(now, &[1, 2, 3]);
        assert_eq!(compute_streak(&ts, now.date_naive(), 1), 3);
    }

    #[test]
    fn test_today_alone_does_not_count() {
        let now = noon(2026, 3, 10);
        let ts = days_before(now, &[0]);
        assert_eq!(compute_streak(&ts, now.date_naive(), 1), 0);
    }

    #[test]
    fn test_today_preserves_streak_without_extending() {
        let now = noon(2026, 3, 10);
        let ts = days_before(now, &[0, 1, 2]);
        assert_eq!(compute_streak(&ts, now.date_naive(), 1), 2);
    }

    #[test]
    fn test_missing_yesterday_breaks_streak() {
        let now = noon(2026, 3, 10);
        let ts = days_before(now, &[0, 2, 3, 4]);
        assert_eq!(compute_streak(&ts, now.date_naive(), 1), 0);
    }

    #[test]
    fn test_gap_stops_counting() {
        let now = noon(2026, 3, 10);
        let ts = days_before(now, &[1, 2, 4, 5, 6]);
        assert_eq!(compute_streak(&ts, now.date_naive(), 1), 2);
    }

    #[test]
    fn test_multiple_check_ins_per_day_count_once() {
        let now = noon(2026, 3, 10);
        let mut ts = days_before(now, &[1, 2]);
        ts.push(Utc.with_ymd_and_hms(2026, 3, 9, 6, 0, 0).unwrap());
        ts.push(Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 59).unwrap());
        assert_eq!(compute_streak(&ts, now.date_naive(), 1), 2);
    }

    #[test]
    fn test_zero_grace_counts_today() {
        let now = noon(2026, 3, 10);
        let ts = days_before(now, &[0, 1]);
        assert_eq!(compute_streak(&ts, now.date_naive(), 0), 2);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let now = noon(2026, 3, 2);
        let ts = vec![noon(2026, 3, 1), noon(2026, 2, 28), noon(2026, 2, 27)];
        assert_eq!(compute_streak(&ts, now.date_naive(), 1), 3);
    }

    #[tokio::test]
    async fn test_milestones_from_store() {
        let now = noon(2026, 3, 10);
        let store = MemoryCheckInStore::new();
        for (i, days_ago) in [0, 1, 2, 3, 3, 4, 5, 9, 10, 11].iter().enumerate() {
            store
                .insert(CheckIn::new(
                    format!("c{}", i),
                    "u1",
                    now - Duration::days(*days_ago),
                ))
                .unwrap();
        }

        let m = get_check_in_milestones(&store, "u1", &InsightConfig::default(), now)
            .await
            .unwrap();
        assert_eq!(m.total_check_ins, 10);
        assert_eq!(m.current_streak, 5);
        assert!(m.is_milestone);
        assert_eq!(m.milestone_number, Some(10));
    }

    #[tokio::test]
    async fn test_eleven_is_not_a_milestone() {
        let now = noon(2026, 3, 10);
        let store = MemoryCheckInStore::new();
        for i in 0..11 {
            store
                .insert(CheckIn::new(format!("c{}", i), "u1", now - Duration::days(40)))
                .unwrap();
        }

        let m = get_check_in_milestones(&store, "u1", &InsightConfig::default(), now)
            .await
            .unwrap();
        assert_eq!(m.total_check_ins, 11);
        assert_eq!(m.current_streak, 0);
        assert!(!m.is_milestone);
        assert_eq!(m.milestone_number, None);
    }

    #[tokio::test]
    async fn test_new_user_has_zero_everything() {
        let store = MemoryCheckInStore::new();
        let m = get_check_in_milestones(&store, "u1", &InsightConfig::default(), Utc::now())
            .await
            .unwrap();
        assert_eq!(m, CheckInMilestones::default());
    }

    #[test]
    fn test_milestones_serialize_camel_case() {
        let m = CheckInMilestones {
            total_check_ins: 5,
            current_streak: 2,
            is_milestone: true,
            milestone_number: Some(5),
        };
        let value = serde_json::to_value(m).unwrap();
        assert_eq!(value["totalCheckIns"], 5);
        assert_eq!(value["currentStreak"], 2);
        assert_eq!(value["isMilestone"], true);
        assert_eq!(value["milestoneNumber"], 5);
    }

    // =========================================================================
    // Property-based tests
    // =========================================================================

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Property: a run of n days ending yesterday yields a streak of n
            #[test]
            fn prop_consecutive_run_counts_fully(n in 0i64..60, with_today in any::<bool>()) {
                let now = noon(2026, 6, 15);
                let mut days: Vec<i64> = (1..=n).collect();
                if with_today {
                    days.push(0);
                }
                let ts = days_before(now, &days);
                prop_assert_eq!(compute_streak(&ts, now.date_naive(), 1), n as u32);
            }

            // Property: extending the run by one earlier day never decreases the streak
            #[test]
            fn prop_streak_non_decreasing(n in 0i64..60) {
                let now = noon(2026, 6, 15);
                let before = days_before(now, &(1..=n).collect::<Vec<_>>());
                let after = days_before(now, &(1..=n + 1).collect::<Vec<_>>());
                let a = compute_streak(&before, now.date_naive(), 1);
                let b = compute_streak(&after, now.date_naive(), 1);
                prop_assert!(b >= a);
                prop_assert_eq!(b, a + 1);
            }

            // Property: nothing past a gap is counted
            #[test]
            fn prop_gap_resets(run in 0i64..30, gap in 1i64..10, tail in 1i64..30) {
                let now = noon(2026, 6, 15);
                let mut days: Vec<i64> = (1..=run).collect();
                let tail_start = run + gap + 1;
                days.extend(tail_start..tail_start + tail);
                let ts = days_before(now, &days);
                prop_assert_eq!(compute_streak(&ts, now.date_naive(), 1), run as u32);
            }

            // Property: milestone membership is exact
            #[test]
            fn prop_milestone_exact(total in 0u64..200) {
                let config = InsightConfig::default();
                let expected = [5u64, 10, 20, 30, 50, 100].contains(&total);
                prop_assert_eq!(config.is_milestone(total), expected);
            }
        }
    }
}
