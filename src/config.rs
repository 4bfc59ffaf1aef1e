//! Configuration loading for Annie.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.annie/config.toml`)
//! 3. User config (`~/.annie/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The engine runs with the product defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnnieError, FailOpen, Result};

/// Main configuration struct for Annie.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Insight engine thresholds.
    pub insights: InsightConfig,
    /// Check-in store location for the CLI.
    pub store: StoreConfig,
}

/// Thresholds and tables used by the insight engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InsightConfig {
    /// Total check-in counts that trigger a milestone card. Exact match only.
    pub milestones: Vec<u64>,
    /// Minimum relative deviation from the average to surface a comparison.
    pub significance_threshold: f64,
    /// Maximum severity at or above which a hard day is acknowledged.
    pub high_severity_threshold: f64,
    /// Minimum streak for a consistency card.
    pub min_streak_for_insight: u32,
    /// Trailing window for symptom averages, in days.
    pub average_window_days: u32,
    /// Days before today where the streak cursor starts.
    pub streak_grace_days: u32,
}

/// Default milestone counts.
pub const DEFAULT_MILESTONES: &[u64] = &[5, 10, 20, 30, 50, 100];

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            milestones: DEFAULT_MILESTONES.to_vec(),
            significance_threshold: 0.20,
            high_severity_threshold: 7.0,
            min_streak_for_insight: 3,
            average_window_days: 14,
            streak_grace_days: 1,
        }
    }
}

impl InsightConfig {
    /// Check if a significance threshold is valid (strictly positive, finite).
    pub fn is_valid_significance_threshold(value: f64) -> bool {
        value.is_finite() && value > 0.0
    }

    /// Check if a severity threshold is within the [1, 10] scale.
    pub fn is_valid_severity_threshold(value: f64) -> bool {
        (1.0..=10.0).contains(&value)
    }

    /// Check if an averaging window is valid.
    pub fn is_valid_window_days(value: u32) -> bool {
        value >= 1
    }

    /// Whether `total` is exactly one of the milestone counts.
    pub fn is_milestone(&self, total: u64) -> bool {
        self.milestones.contains(&total)
    }
}

/// Where the CLI reads check-ins from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to a JSON file holding an array of check-in documents.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration with full precedence chain.
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.annie/config.toml`.
    fn load_user_config() -> Option<Config> {
        let path = annie_home()?.join("config.toml");
        if !path.exists() {
            return None;
        }
        Self::load_from_file(&path)
            .map(Some)
            .fail_open_default("loading user config")
    }

    /// Load project config from `.annie/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        let path = cwd.join(".annie").join("config.toml");
        if !path.exists() {
            return None;
        }
        Self::load_from_file(&path)
            .map(Some)
            .fail_open_default("loading project config")
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| AnnieError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| AnnieError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        let insights = &mut self.insights;

        if let Ok(val) = env::var("ANNIE_SIGNIFICANCE_THRESHOLD") {
            match val.parse::<f64>() {
                Ok(n) if InsightConfig::is_valid_significance_threshold(n) => {
                    insights.significance_threshold = n;
                }
                _ => tracing::warn!(
                    value = %val,
                    default = insights.significance_threshold,
                    "invalid ANNIE_SIGNIFICANCE_THRESHOLD, expected a positive decimal"
                ),
            }
        }

        if let Ok(val) = env::var("ANNIE_HIGH_SEVERITY_THRESHOLD") {
            match val.parse::<f64>() {
                Ok(n) if InsightConfig::is_valid_severity_threshold(n) => {
                    insights.high_severity_threshold = n;
                }
                _ => tracing::warn!(
                    value = %val,
                    default = insights.high_severity_threshold,
                    "invalid ANNIE_HIGH_SEVERITY_THRESHOLD, expected a number in [1, 10]"
                ),
            }
        }

        if let Ok(val) = env::var("ANNIE_MIN_STREAK_FOR_INSIGHT") {
            match val.parse::<u32>() {
                Ok(n) => insights.min_streak_for_insight = n,
                Err(_) => tracing::warn!(
                    value = %val,
                    default = insights.min_streak_for_insight,
                    "invalid ANNIE_MIN_STREAK_FOR_INSIGHT, expected a positive integer"
                ),
            }
        }

        if let Ok(val) = env::var("ANNIE_AVERAGE_WINDOW_DAYS") {
            match val.parse::<u32>() {
                Ok(n) if InsightConfig::is_valid_window_days(n) => {
                    insights.average_window_days = n;
                }
                _ => tracing::warn!(
                    value = %val,
                    default = insights.average_window_days,
                    "invalid ANNIE_AVERAGE_WINDOW_DAYS, expected an integer >= 1"
                ),
            }
        }

        if let Ok(val) = env::var("ANNIE_STORE_PATH") {
            if val.is_empty() {
                tracing::warn!("ANNIE_STORE_PATH is empty, ignoring");
            } else {
                self.store.path = Some(PathBuf::from(val));
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Field by field: every value in `other` that differs from the default
    /// wins. A layer cannot reset a value back to its default.
    fn merge(mut self, other: Config) -> Self {
        let defaults = InsightConfig::default();
        let theirs = other.insights;

        if theirs.milestones != defaults.milestones {
            self.insights.milestones = theirs.milestones;
        }
        if theirs.significance_threshold != defaults.significance_threshold {
            self.insights.significance_threshold = theirs.significance_threshold;
        }
        if theirs.high_severity_threshold != defaults.high_severity_threshold {
            self.insights.high_severity_threshold = theirs.high_severity_threshold;
        }
        if theirs.min_streak_for_insight != defaults.min_streak_for_insight {
            self.insights.min_streak_for_insight = theirs.min_streak_for_insight;
        }
        if theirs.average_window_days != defaults.average_window_days {
            self.insights.average_window_days = theirs.average_window_days;
        }
        if theirs.streak_grace_days != defaults.streak_grace_days {
            self.insights.streak_grace_days = theirs.streak_grace_days;
        }

        if other.store.path.is_some() {
            self.store.path = other.store.path;
        }

        self
    }
}

/// Get the Annie home directory.
///
/// `ANNIE_HOME` wins when set and non-empty; otherwise `~/.annie`.
pub fn annie_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("ANNIE_HOME") {
        if home.is_empty() {
            tracing::warn!("ANNIE_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    dirs::home_dir().map(|home| home.join(".annie"))
}

/// Default store file: `<annie home>/checkins.json`.
pub fn default_store_path() -> Option<PathBuf> {
    annie_home().map(|home| home.join("checkins.json"))
}

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "annie=info"
}
