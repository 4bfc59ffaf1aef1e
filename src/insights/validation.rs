//! Validation cards: encouragement that is always available.
//!
//! Priority order: milestone, then high-severity acknowledgment, then a
//! default message picked by `total_check_ins % 3`.

use chrono::{DateTime, Utc};

use crate::config::InsightConfig;
use crate::core::insight::{format_number, json_number};
use crate::core::{ordinal, CheckIn, InsightCard, InsightType};
use crate::error::Result;
use crate::stats::get_check_in_milestones;
use crate::storage::CheckInStore;

/// Default messages as `(title, message, icon)`, addressed by
/// `total_check_ins % 3`. Order matters.
pub const DEFAULT_MESSAGES: [(&str, &str, &str); 3] = [
    (
        "You Showed Up",
        "Taking a moment to check in with yourself matters.\n\nThank you for showing up today.",
        "🌱",
    ),
    (
        "Effort Recognized",
        "Tracking how you feel takes effort.\n\nEvery entry is an act of taking care of yourself.",
        "✨",
    ),
    (
        "Progress Recognition",
        "Each check-in adds to your story.\n\nYou're building a clearer picture of your health.",
        "📈",
    ),
];

/// Generate a validation card. Never absent.
pub async fn generate_validation_card<S: CheckInStore + ?Sized>(
    store: &S,
    user_id: &str,
    check_in: &CheckIn,
    config: &InsightConfig,
    now: DateTime<Utc>,
) -> Result<InsightCard> {
    let milestones = get_check_in_milestones(store, user_id, config, now).await?;
    let count = milestones.total_check_ins;

    if let Some(milestone) = milestones.milestone_number {
        return Ok(milestone_card(milestone, count));
    }

    let max_severity = check_in.structured.symptoms.max_severity();
    if max_severity >= config.high_severity_threshold {
        return Ok(hard_day_card(max_severity, count));
    }

    Ok(default_card(count))
}

/// Card for reaching an exact milestone count.
pub fn milestone_card(milestone: u64, total_check_ins: u64) -> InsightCard {
    let message = format!(
        "This is your {} check-in!\n\nEvery entry builds a clearer picture of your health.",
        ordinal(milestone)
    );

    InsightCard::new(InsightType::Validation, "Milestone Reached", message, "🎉")
        .with_meta("milestone", milestone)
        .with_meta("checkInCount", total_check_ins)
}

/// Card acknowledging a check-in on a bad day.
pub fn hard_day_card(max_severity: f64, total_check_ins: u64) -> InsightCard {
    let message = format!(
        "Checking in on a hard day ({}/10) takes real strength.\n\n\
         This record will help you and your doctor understand what you're going through.",
        format_number(max_severity)
    );

    InsightCard::new(InsightType::Validation, "You Showed Up", message, "💪")
        .with_meta("maxSeverity", json_number(max_severity))
        .with_meta("checkInCount", total_check_ins)
}

/// Rotating default card.
pub fn default_card(total_check_ins: u64) -> InsightCard {
    let (title, message, icon) = DEFAULT_MESSAGES[rotation_index(total_check_ins)];
    InsightCard::new(InsightType::Validation, title, message, icon)
        .with_meta("checkInCount", total_check_ins)
}

/// Index into [`DEFAULT_MESSAGES`] for a total.
pub fn rotation_index(total_check_ins: u64) -> usize {
    (total_check_ins % DEFAULT_MESSAGES.len() as u64) as usize
}
