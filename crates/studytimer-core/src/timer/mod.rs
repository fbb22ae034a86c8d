mod clock;
mod display;
mod engine;
mod phase;

pub use clock::SessionClock;
pub use display::{format_clock, format_hms, format_hours, UNCONFIGURED_LABEL};
pub use engine::{RunState, Snapshot, TimerEngine};
pub use phase::{
    Phase, SessionConfig, DEFAULT_BREAK_MIN, DEFAULT_STUDY_MIN, MAX_BREAK_SECS, MAX_STUDY_SECS,
    MIN_BREAK_SECS, MIN_STUDY_SECS,
};
