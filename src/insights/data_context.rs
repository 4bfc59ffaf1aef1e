//! Data-context cards: today's severities against the user's own baseline.
//!
//! The first symptom whose deviation from its rolling average reaches the
//! significance threshold wins; the scan does not look for the largest
//! deviation. When no symptom qualifies, a long enough streak produces a
//! consistency card instead.

use chrono::{DateTime, Utc};

use crate::config::InsightConfig;
use crate::core::insight::{format_number, json_number, round1};
use crate::core::{CheckIn, InsightCard, InsightType};
use crate::error::Result;
use crate::stats::{calculate_symptom_average, get_check_in_milestones};
use crate::storage::CheckInStore;

/// Slack for float error when a deviation lands exactly on the threshold.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Generate a data-context card for `check_in`, or `None` if nothing stands out.
pub async fn generate_data_context_card<S: CheckInStore + ?Sized>(
    store: &S,
    user_id: &str,
    check_in: &CheckIn,
    config: &InsightConfig,
    now: DateTime<Utc>,
) -> Result<Option<InsightCard>> {
    let current: Vec<(&str, f64)> = check_in.structured.symptoms.severities().collect();
    if current.is_empty() {
        return Ok(None);
    }

    // Sequential on purpose: stop querying at the first significant symptom.
    for (name, value) in current {
        let Some(average) =
            calculate_symptom_average(store, user_id, name, config.average_window_days, now)
                .await?
        else {
            continue;
        };
        if average <= 0.0 {
            continue;
        }

        let percent_diff = (value - average).abs() / average;
        if percent_diff + THRESHOLD_EPSILON >= config.significance_threshold {
            tracing::debug!(user_id, symptom = name, percent_diff, "significant change");
            return Ok(Some(comparison_card(
                name,
                value,
                average,
                percent_diff,
                config.average_window_days,
            )));
        }
    }

    let milestones = get_check_in_milestones(store, user_id, config, now).await?;
    if milestones.current_streak >= config.min_streak_for_insight {
        return Ok(Some(streak_card(
            milestones.current_streak,
            milestones.total_check_ins,
        )));
    }

    Ok(None)
}

/// Card comparing one symptom with its rolling average.
pub fn comparison_card(
    symptom: &str,
    current: f64,
    average: f64,
    percent_diff: f64,
    window_days: u32,
) -> InsightCard {
    let is_better = current < average;
    let direction = if is_better { "below" } else { "above" };
    let sentiment = if is_better {
        "Nice work, you're trending better than usual."
    } else {
        "Take it easy today, that's higher than usual."
    };

    let message = format!(
        "Your {} is {}/10 today, {} your {}-day average of {}.\n\n{}",
        symptom,
        format_number(current),
        direction,
        window_days,
        format_number(round1(average)),
        sentiment
    );

    InsightCard::new(InsightType::DataContext, "Today's Context", message, "📊")
        .with_meta("symptomName", symptom)
        .with_meta("currentValue", json_number(current))
        .with_meta("averageValue", json_number(round1(average)))
        .with_meta("percentDifference", (percent_diff * 100.0).round() as i64)
        .with_meta("isBetter", is_better)
}

/// Card celebrating a run of consecutive check-in days.
pub fn streak_card(streak: u32, total_check_ins: u64) -> InsightCard {
    let message = format!(
        "You've checked in {} days in a row.\n\nSteady tracking is how patterns start to show.",
        streak
    );

    InsightCard::new(InsightType::DataContext, "Consistency Win", message, "🔥")
        .with_meta("streakLength", streak)
        .with_meta("checkInCount", total_check_ins)
}
