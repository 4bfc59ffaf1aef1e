//! Milestones command for Annie.
//!
//! Shows a user's check-in total, current streak and milestone status.

use serde::{Deserialize, Serialize};

use crate::insights::InsightEngine;
use crate::stats::CheckInMilestones;
use crate::storage::CheckInStore;

/// Output format for the milestones command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestonesOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// The user queried.
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestones: Option<CheckInMilestones>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MilestonesOutput {
    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        let Some(m) = &self.milestones else {
            return format!(
                "Milestones failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        };

        let mut lines = vec![
            format!("Check-ins for {}:", self.user_id),
            format!("  Total:          {}", m.total_check_ins),
            format!("  Current streak: {} day(s)", m.current_streak),
        ];
        if let Some(n) = m.milestone_number {
            lines.push(format!("  Milestone:      {} reached", n));
        }
        lines.join("\n")
    }
}

/// The milestones command implementation.
pub struct MilestonesCommand<S: CheckInStore> {
    engine: InsightEngine<S>,
}

impl<S: CheckInStore> MilestonesCommand<S> {
    /// Create a new milestones command.
    pub fn new(engine: InsightEngine<S>) -> Self {
        Self { engine }
    }

    /// Run the milestones command.
    pub async fn run(&self, user_id: &str) -> MilestonesOutput {
        match self.engine.milestones(user_id).await {
            Ok(milestones) => MilestonesOutput {
                success: true,
                user_id: user_id.to_string(),
                milestones: Some(milestones),
                error: None,
            },
            Err(e) => MilestonesOutput {
                success: false,
                user_id: user_id.to_string(),
                milestones: None,
                error: Some(format!("Failed to read check-ins: {}", e)),
            },
        }
    }
}
