//! Insight command for Annie.
//!
//! Generates the post-check-in insight card for an existing check-in, as the
//! HTTP layer would after a submission.

use serde::{Deserialize, Serialize};

use crate::core::InsightCard;
use crate::insights::InsightEngine;
use crate::storage::CheckInStore;

/// Output format for the insight command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightOutput {
    /// Whether an insight was generated.
    pub success: bool,
    /// The generated card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<InsightCard>,
    /// Error message if generation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InsightOutput {
    /// Create a successful output.
    pub fn success(insight: InsightCard) -> Self {
        Self {
            success: true,
            insight: Some(insight),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            insight: None,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        match (&self.insight, &self.error) {
            (Some(card), _) => format!("{} {}\n\n{}", card.icon, card.title, card.message),
            (None, error) => format!(
                "Insight unavailable: {}",
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

/// The insight command implementation.
pub struct InsightCommand<S: CheckInStore> {
    engine: InsightEngine<S>,
}

impl<S: CheckInStore> InsightCommand<S> {
    /// Create a new insight command.
    pub fn new(engine: InsightEngine<S>) -> Self {
        Self { engine }
    }

    /// Run the insight command.
    pub async fn run(&self, user_id: &str, check_in_id: &str) -> InsightOutput {
        match self
            .engine
            .generate_post_check_in_insight(user_id, check_in_id)
            .await
        {
            Ok(card) => InsightOutput::success(card),
            Err(e) => InsightOutput::failure(e.to_string()),
        }
    }
}
