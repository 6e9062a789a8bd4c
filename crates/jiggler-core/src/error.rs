//! Core error types for jiggler-core.
//!
//! The engine itself is total: range violations are clamped and injection
//! failures are only observed. The errors below cover the edges of the core,
//! i.e. the settings store and the timer requests issued to the presenter.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::TimerKind;

/// Core error type for jiggler-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Key is not part of the settings record
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// A timer request the presenter could not honor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{kind} timer could not be armed: {reason}")]
    Rejected { kind: TimerKind, reason: String },
}

impl ScheduleError {
    pub fn rejected(kind: TimerKind, reason: impl Into<String>) -> Self {
        ScheduleError::Rejected {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
