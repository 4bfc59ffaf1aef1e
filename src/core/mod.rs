//! Core types for Annie.
//!
//! Check-in records as read from the store and the insight cards produced
//! from them.

pub mod checkin;
pub mod insight;

pub use checkin::{coerce_severity, CheckIn, StructuredData, SymptomMap, SymptomRecord};
pub use insight::{ordinal, InsightCard, InsightType};
