//! Core error types for studytimer-core.
//!
//! Timer errors are local precondition failures: the engine is left exactly
//! as it was and the caller decides how to report them. Storage errors belong
//! to the settings collaborator and never touch engine state.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::RunState;

/// Core error type for studytimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer state machine errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the timer engine and session configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A duration outside its documented range.
    #[error("{field} must be within {min_secs}..={max_secs} seconds, got {value_secs}")]
    InvalidConfig {
        field: &'static str,
        value_secs: u64,
        min_secs: u64,
        max_secs: u64,
    },

    /// A control operation that the current run state does not support.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: RunState,
    },
}

/// Settings-storage errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid settings value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key not present in the settings schema
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse settings: {0}")]
    ParseFailed(String),

    /// No usable data directory
    #[error("Cannot determine data directory: {0}")]
    NoDataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
