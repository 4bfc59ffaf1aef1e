//! Post-check-in insight generation.
//!
//! Cards are computed on demand from the check-in store and never persisted.
//!
//! Tiers, highest priority first:
//! - Pattern: reserved, always empty
//! - DataContext: first symptom that deviates significantly from its rolling
//!   average, else a consistency streak
//! - Validation: milestone, hard-day acknowledgment, or a rotating default

pub mod data_context;
pub mod engine;
pub mod validation;

pub use data_context::{comparison_card, generate_data_context_card, streak_card};
pub use engine::InsightEngine;
pub use validation::{
    default_card, generate_validation_card, hard_day_card, milestone_card, rotation_index,
    DEFAULT_MESSAGES,
};
