//! Rolling symptom averages.

use chrono::{DateTime, Duration, Utc};

use crate::core::CheckIn;
use crate::error::Result;
use crate::storage::CheckInStore;

/// Mean severity of `symptom_name` over the user's check-ins in the trailing
/// `window_days` before `now`.
///
/// Returns `Ok(None)` when no check-in in the window carries a numeric
/// severity for the symptom. Store errors propagate.
pub async fn calculate_symptom_average<S: CheckInStore + ?Sized>(
    store: &S,
    user_id: &str,
    symptom_name: &str,
    window_days: u32,
    now: DateTime<Utc>,
) -> Result<Option<f64>> {
    let since = now - Duration::days(i64::from(window_days));
    let check_ins = store.find_by_user_since(user_id, since).await?;

    let average = mean_severity(&check_ins, symptom_name);
    tracing::debug!(
        user_id,
        symptom = symptom_name,
        window_days,
        samples = check_ins.len(),
        ?average,
        "symptom average"
    );
    Ok(average)
}

/// Arithmetic mean of the numeric severities recorded for `symptom_name`.
pub fn mean_severity(check_ins: &[CheckIn], symptom_name: &str) -> Option<f64> {
    let (sum, count) = check_ins
        .iter()
        .filter_map(|c| c.structured.symptoms.get(symptom_name))
        .filter_map(|record| record.severity())
        .fold((0.0, 0u32), |(sum, count), s| (sum + s, count + 1));

    (count > 0).then(|| sum / f64::from(count))
}
