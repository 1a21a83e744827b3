//! Unified error hierarchy for CutTracker
//!
//! Missing data is never an error in this crate: engines model it with
//! `Option` and empty collections. The types here cover the persistence
//! boundary, configuration, and input validation.

use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;

/// Top-level error type for all CutTracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Persistence store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Rejected user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid profile or configuration file
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors raised by a `DataStore` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Store IO failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted payload could not be decoded
    #[error("Corrupt payload at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The dataset could not be encoded
    #[error("Serialization failed: {0}")]
    Serialize(String),
}

/// Result type alias for CutTracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrackerError::Validation(_) => ErrorSeverity::Warning,
            TrackerError::Store(StoreError::Corrupt { .. }) => ErrorSeverity::Warning,
            TrackerError::Store(_) => ErrorSeverity::Error,
            TrackerError::Configuration(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TrackerError::Store(StoreError::Corrupt { path, .. }) => {
                format!(
                    "Saved data at {} could not be read and was ignored",
                    path.display()
                )
            }
            TrackerError::Store(StoreError::Io { path, .. }) => {
                format!("Could not access saved data at {}", path.display())
            }
            TrackerError::Store(StoreError::Serialize(_)) => {
                "Data could not be encoded for saving".to_string()
            }
            TrackerError::Validation(reason) => format!("Not saved: {}", reason),
            TrackerError::Configuration(reason) => {
                format!("Profile settings are invalid: {}", reason)
            }
        }
    }

    /// Emit the error as a tracing event at its severity
    pub fn log(&self, action: &str) {
        let message = self.user_message();
        let level = self.severity().to_tracing_level();
        if level == Level::ERROR {
            tracing::error!(error = %self, %message, "{}", action);
        } else {
            tracing::warn!(error = %self, %message, "{}", action);
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents an operation but the session can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> Level {
        match self {
            ErrorSeverity::Error => Level::ERROR,
            ErrorSeverity::Warning => Level::WARN,
        }
    }
}
