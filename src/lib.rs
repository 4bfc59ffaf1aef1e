//! Annie - post-check-in insight engine for the Ask Annie symptom tracker
//!
//! After a user submits a check-in, Annie reads their history from a
//! check-in store and returns one short insight card: a comparison with
//! their rolling symptom averages, a consistency streak, a milestone, or
//! plain encouragement.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod insights;
pub mod stats;
pub mod storage;

pub use config::{Config, InsightConfig};
pub use crate::core::{CheckIn, InsightCard, InsightType, StructuredData, SymptomMap, SymptomRecord};
pub use error::{AnnieError, Result};
pub use insights::InsightEngine;
pub use stats::{calculate_symptom_average, get_check_in_milestones, CheckInMilestones};
pub use storage::{CheckInStore, FileCheckInStore, MemoryCheckInStore};

pub use cli::{AverageCommand, InsightCommand, MilestonesCommand};
