use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change of the timer engine produces an Event.
///
/// The engine queues events; the front-end drains them after each call and
/// reacts (bell on `PhaseCompleted`, persistence, logging). `at` is wall-clock
/// time for display and logs only; durations are always measured on the
/// monotonic clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        phase: Phase,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        phase: Phase,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    /// The active session was restarted at full duration.
    SessionReset {
        phase: Phase,
        at: DateTime<Utc>,
    },
    Stopped {
        phase: Phase,
        at: DateTime<Utc>,
    },
    /// `phase` ran its full length; the engine has already switched to the
    /// other phase and keeps running.
    PhaseCompleted {
        phase: Phase,
        at: DateTime<Utc>,
    },
    /// The cumulative study counter was cleared.
    TotalReset {
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The completed phase, if this is a phase-completion event.
    pub fn completed_phase(&self) -> Option<Phase> {
        match self {
            Event::PhaseCompleted { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}
