//! Monotonic session clock.
//!
//! Measures how long the current session has been running, reading only
//! [`Instant`] values so wall-clock adjustments (NTP, timezone changes, manual
//! edits) cannot move it. Every operation takes `now` from the caller, which
//! keeps the clock deterministic under test.

use std::time::{Duration, Instant};

use super::engine::RunState;
use crate::error::TimerError;

#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    /// Baseline of the current run segment. `None` while paused or idle.
    start_instant: Option<Instant>,
    /// Time elapsed in earlier run segments of this session.
    accumulated_before_pause: Duration,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new session at `now` with zero elapsed time.
    pub fn start(&mut self, now: Instant) {
        self.start_instant = Some(now);
        self.accumulated_before_pause = Duration::ZERO;
    }

    /// Fold the running segment into the accumulated total and stop.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidState`] if the clock is not running.
    pub fn pause(&mut self, now: Instant) -> Result<(), TimerError> {
        let start = self.start_instant.take().ok_or(TimerError::InvalidState {
            operation: "pause clock",
            state: RunState::Paused,
        })?;
        self.accumulated_before_pause += now.saturating_duration_since(start);
        Ok(())
    }

    /// Start a new run segment at `now`, keeping earlier accumulation.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidState`] if the clock is already running.
    pub fn resume(&mut self, now: Instant) -> Result<(), TimerError> {
        if self.start_instant.is_some() {
            return Err(TimerError::InvalidState {
                operation: "resume clock",
                state: RunState::Running,
            });
        }
        self.start_instant = Some(now);
        Ok(())
    }

    /// Elapsed time of the session as of `now`.
    ///
    /// A `now` earlier than the segment baseline counts as zero for that
    /// segment, so the result is never negative.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.start_instant {
            Some(start) => self.accumulated_before_pause + now.saturating_duration_since(start),
            None => self.accumulated_before_pause,
        }
    }

    /// Restart the session from zero at `now`.
    pub fn reset(&mut self, now: Instant) {
        self.start(now);
    }

    /// Zero the accumulation and leave the clock stopped.
    pub fn clear(&mut self) {
        self.start_instant = None;
        self.accumulated_before_pause = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.start_instant.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn elapsed_tracks_running_segment() {
        let t0 = Instant::now();
        let mut clock = SessionClock::new();
        clock.start(t0);
        assert_eq!(clock.elapsed(t0), Duration::ZERO);
        assert_eq!(clock.elapsed(t0 + secs(42)), secs(42));
    }

    #[test]
    fn pause_freezes_elapsed() {
        let t0 = Instant::now();
        let mut clock = SessionClock::new();
        clock.start(t0);
        clock.pause(t0 + secs(10)).unwrap();

        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(t0 + secs(10)), secs(10));
        assert_eq!(clock.elapsed(t0 + secs(500)), secs(10));
    }

    #[test]
    fn resume_keeps_accumulation() {
        let t0 = Instant::now();
        let mut clock = SessionClock::new();
        clock.start(t0);
        clock.pause(t0 + secs(10)).unwrap();
        clock.resume(t0 + secs(100)).unwrap();
        assert_eq!(clock.elapsed(t0 + secs(105)), secs(15));
    }

    #[test]
    fn double_pause_and_double_resume_are_rejected() {
        let t0 = Instant::now();
        let mut clock = SessionClock::new();
        clock.start(t0);
        assert!(clock.resume(t0).is_err());
        clock.pause(t0 + secs(1)).unwrap();
        assert!(clock.pause(t0 + secs(2)).is_err());
        assert_eq!(clock.elapsed(t0 + secs(3)), secs(1));
    }

    #[test]
    fn earlier_timestamp_is_not_negative() {
        let t0 = Instant::now();
        let mut clock = SessionClock::new();
        clock.start(t0 + secs(5));
        assert_eq!(clock.elapsed(t0), Duration::ZERO);
    }

    #[test]
    fn reset_and_clear_zero_the_session() {
        let t0 = Instant::now();
        let mut clock = SessionClock::new();
        clock.start(t0);
        clock.reset(t0 + secs(30));
        assert_eq!(clock.elapsed(t0 + secs(31)), secs(1));

        clock.clear();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(t0 + secs(99)), Duration::ZERO);
    }
}
