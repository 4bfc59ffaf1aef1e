//! Statistics over a user's check-in history.
//!
//! Everything here is a pure read + reduce over the store: rolling symptom
//! averages and streak/milestone bookkeeping.

pub mod average;
pub mod milestones;

pub use average::{calculate_symptom_average, mean_severity};
pub use milestones::{compute_streak, get_check_in_milestones, CheckInMilestones};
