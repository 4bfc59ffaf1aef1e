//! CLI commands for Annie.
//!
//! Each command wraps the insight engine over a check-in store and produces
//! an output struct that renders as text or JSON.

pub mod average;
pub mod insight;
pub mod milestones;

pub use average::AverageCommand;
pub use insight::InsightCommand;
pub use milestones::MilestonesCommand;
