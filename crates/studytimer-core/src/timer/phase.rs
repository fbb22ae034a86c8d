use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::TimerError;

/// Shortest allowed study session (1 minute).
pub const MIN_STUDY_SECS: u64 = 60;
/// Longest allowed study session (180 minutes).
pub const MAX_STUDY_SECS: u64 = 180 * 60;
/// Shortest allowed break (1 minute).
pub const MIN_BREAK_SECS: u64 = 60;
/// Longest allowed break (60 minutes).
pub const MAX_BREAK_SECS: u64 = 60 * 60;

pub const DEFAULT_STUDY_MIN: u64 = 30;
pub const DEFAULT_BREAK_MIN: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Study,
    Break,
}

impl Phase {
    /// The phase that follows this one.
    pub fn other(self) -> Self {
        match self {
            Phase::Study => Phase::Break,
            Phase::Break => Phase::Study,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Study => "study",
            Phase::Break => "break",
        }
    }

    /// Whether time spent running in this phase counts toward the study total.
    pub fn counts_toward_total(self) -> bool {
        self == Phase::Study
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated study/break durations.
///
/// The only way to build one is through [`SessionConfig::new`] (or the
/// minute-based helper), so a value of this type always satisfies the
/// documented ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
    study_duration_secs: u64,
    break_duration_secs: u64,
}

impl SessionConfig {
    /// Validate and build a configuration from durations in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidConfig`] naming the first field that is
    /// outside its range.
    pub fn new(study_duration_secs: u64, break_duration_secs: u64) -> Result<Self, TimerError> {
        check_range(
            "study_duration_secs",
            study_duration_secs,
            MIN_STUDY_SECS,
            MAX_STUDY_SECS,
        )?;
        check_range(
            "break_duration_secs",
            break_duration_secs,
            MIN_BREAK_SECS,
            MAX_BREAK_SECS,
        )?;
        Ok(Self {
            study_duration_secs,
            break_duration_secs,
        })
    }

    /// Same as [`SessionConfig::new`] but with durations in minutes.
    ///
    /// Uses saturating arithmetic so huge inputs are rejected by range
    /// validation rather than wrapping.
    pub fn from_minutes(study_min: u64, break_min: u64) -> Result<Self, TimerError> {
        Self::new(study_min.saturating_mul(60), break_min.saturating_mul(60))
    }

    pub fn study_duration_secs(&self) -> u64 {
        self.study_duration_secs
    }

    pub fn break_duration_secs(&self) -> u64 {
        self.break_duration_secs
    }

    pub fn duration_secs(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Study => self.study_duration_secs,
            Phase::Break => self.break_duration_secs,
        }
    }

    pub fn duration_for(&self, phase: Phase) -> Duration {
        Duration::from_secs(self.duration_secs(phase))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            study_duration_secs: DEFAULT_STUDY_MIN * 60,
            break_duration_secs: DEFAULT_BREAK_MIN * 60,
        }
    }
}

fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), TimerError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TimerError::InvalidConfig {
            field,
            value_secs: value,
            min_secs: min,
            max_secs: max,
        })
    }
}
