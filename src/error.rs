//! Unified error types for Annie with a fail-open boundary.
//!
//! Insights are advisory. Inside the engine errors propagate with `?`; at the
//! boundary where a check-in has already been persisted, callers use
//! [`FailOpen`] to log the failure and carry on without an insight.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Annie operations.
#[derive(Error, Debug)]
pub enum AnnieError {
    /// The referenced check-in does not exist (or belongs to another user).
    #[error("Check-in not found")]
    CheckInNotFound { check_in_id: String },

    /// I/O errors from file-backed stores and config files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Check-in store query failures.
    #[error("store error: {message}")]
    Store { message: String },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },
}

/// A specialized Result type for Annie operations.
pub type Result<T> = std::result::Result<T, AnnieError>;

impl AnnieError {
    /// Create a check-in not found error.
    pub fn check_in_not_found(check_in_id: impl Into<String>) -> Self {
        Self::CheckInNotFound {
            check_in_id: check_in_id.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error means the requested check-in is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CheckInNotFound { .. })
    }
}

impl From<io::Error> for AnnieError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AnnieError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Log the error and return a safe default instead of propagating it.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the Annie CLI.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// The command failed (missing check-in, unreadable store, bad config).
    pub const ERROR: i32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_in_not_found_message() {
        let err = AnnieError::check_in_not_found("abc-123");
        assert_eq!(err.to_string(), "Check-in not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_storage_error_display() {
        let err = AnnieError::storage(
            "/tmp/checkins.json",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/checkins.json"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_store_error_display() {
        let err = AnnieError::store("connection reset");
        assert_eq!(err.to_string(), "store error: connection reset");
    }

    #[test]
    fn test_config_error_display() {
        let err = AnnieError::config("invalid TOML");
        assert_eq!(err.to_string(), "config error: invalid TOML");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: AnnieError = io_err.into();
        assert!(matches!(err, AnnieError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: AnnieError = json_err.into();
        assert!(matches!(err, AnnieError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Option<u32>> = Err(AnnieError::store("down"));
        assert_eq!(result.fail_open_default("test context"), None);
    }

    #[test]
    fn test_fail_open_success() {
        let result: Result<i32> = Ok(100);
        assert_eq!(result.fail_open_default("test context"), 100);
    }
}
