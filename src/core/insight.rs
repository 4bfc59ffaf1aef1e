//! Insight cards returned after a check-in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Types of insight cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Today's values compared with the user's own history.
    DataContext,
    /// Encouragement for showing up.
    Validation,
    /// Reserved; not generated.
    Pattern,
    /// Reserved; not generated.
    Community,
}

impl InsightType {
    /// Get the wire name for this insight type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataContext => "data_context",
            Self::Validation => "validation",
            Self::Pattern => "pattern",
            Self::Community => "community",
        }
    }
}

/// A short, typed piece of feedback shown after a check-in.
///
/// Serializes directly as the response body: `type`, `title`, `message`,
/// `icon`, `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightCard {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: String,
    /// May contain `\n` as a presentation hint.
    pub message: String,
    pub icon: String,
    /// Diagnostic values. Informational only.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl InsightCard {
    /// Create a card with empty metadata.
    pub fn new(
        kind: InsightType,
        title: impl Into<String>,
        message: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            icon: icon.into(),
            metadata: Map::new(),
        }
    }

    /// Add a metadata entry.
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Format a number without a trailing `.0` when it is integral.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{:.1}", n)
    }
}

/// Round to one decimal place.
pub(crate) fn round1(n: f64) -> f64 {
    (n * 10.0).round() / 10.0
}

/// A JSON number for metadata, integral when possible.
pub(crate) fn json_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

/// English ordinal for a count: 1st, 2nd, 3rd, 4th, 11th, 22nd, 113th.
pub fn ordinal(n: u64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
