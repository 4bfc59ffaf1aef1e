//! Average command for Annie.
//!
//! Shows the rolling average severity of one symptom.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::insights::InsightEngine;
use crate::stats::calculate_symptom_average;
use crate::storage::CheckInStore;

/// Output format for the average command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AverageOutput {
    /// Whether the command was successful.
    pub success: bool,
    pub symptom: String,
    pub window_days: u32,
    /// `None` means no data in the window, not zero.
    pub average: Option<f64>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AverageOutput {
    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if let Some(error) = &self.error {
            return format!("Average failed: {}", error);
        }
        match self.average {
            Some(avg) => format!(
                "{} averaged {:.1}/10 over the last {} days.",
                self.symptom, avg, self.window_days
            ),
            None => format!(
                "No {} data in the last {} days.",
                self.symptom, self.window_days
            ),
        }
    }
}

/// The average command implementation.
pub struct AverageCommand<S: CheckInStore> {
    engine: InsightEngine<S>,
}

impl<S: CheckInStore> AverageCommand<S> {
    /// Create a new average command.
    pub fn new(engine: InsightEngine<S>) -> Self {
        Self { engine }
    }

    /// Run the average command. `days` defaults to the configured window.
    pub async fn run(&self, user_id: &str, symptom: &str, days: Option<u32>) -> AverageOutput {
        let window_days = days.unwrap_or(self.engine.config().average_window_days);
        let result =
            calculate_symptom_average(self.engine.store(), user_id, symptom, window_days, Utc::now())
                .await;

        let (average, error) = match result {
            Ok(average) => (average, None),
            Err(e) => (None, Some(format!("Failed to read check-ins: {}", e))),
        };
        AverageOutput {
            success: error.is_none(),
            symptom: symptom.to_string(),
            window_days,
            average,
            error,
        }
    }
}
