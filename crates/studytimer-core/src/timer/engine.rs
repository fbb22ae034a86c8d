//! Timer engine implementation.
//!
//! The timer engine is a monotonic-clock state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()`
//! periodically and for draining the queued events.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |  ^
//!           +--+  (phase completes: Study <-> Break, stays Running)
//! Running | Paused -> Idle  (stop)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.configure(SessionConfig::from_minutes(25, 5)?)?;
//! engine.start(Instant::now())?;
//! // In a loop:
//! let snapshot = engine.tick(Instant::now());
//! for event in engine.drain_events() { /* ring a bell, persist, ... */ }
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clock::SessionClock;
use super::phase::{Phase, SessionConfig};
use crate::error::TimerError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
        })
    }
}

/// Immutable read of the engine at one instant, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub run_state: RunState,
    /// `false` until durations have been configured ("Set time").
    pub configured: bool,
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
    pub duration_ms: u64,
    pub total_study_ms: u64,
    /// 0.0 .. 1.0 progress within the current session.
    pub progress: f64,
}

impl Snapshot {
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms / 1000
    }

    pub fn total_study_secs(&self) -> u64 {
        self.total_study_ms / 1000
    }
}

/// Core timer engine.
///
/// Owns the phase, run state, configuration, session clock and the
/// cumulative study counter. Every call is synchronous and O(1); callers in a
/// multi-threaded host must serialize access (e.g. behind a `Mutex`).
#[derive(Debug, Clone)]
pub struct TimerEngine {
    phase: Phase,
    run_state: RunState,
    config: Option<SessionConfig>,
    clock: SessionClock,
    total_study: Duration,
    /// Study time of the current session already added to `total_study`.
    last_observed: Duration,
    /// Latest instant the engine has seen; `snapshot()` reads at this point.
    last_now: Option<Instant>,
    events: VecDeque<Event>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    /// Unconfigured engine in the `Idle` state with no study time recorded.
    pub fn new() -> Self {
        Self {
            phase: Phase::Study,
            run_state: RunState::Idle,
            config: None,
            clock: SessionClock::new(),
            total_study: Duration::ZERO,
            last_observed: Duration::ZERO,
            last_now: None,
            events: VecDeque::new(),
        }
    }

    /// Restore an engine from persisted configuration and study total.
    pub fn with_state(config: SessionConfig, total_study: Duration) -> Self {
        Self {
            config: Some(config),
            total_study,
            ..Self::new()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn config(&self) -> Option<SessionConfig> {
        self.config
    }

    pub fn total_study(&self) -> Duration {
        self.total_study
    }

    /// Configured length of `phase`, or zero while unconfigured.
    pub fn duration_for(&self, phase: Phase) -> Duration {
        self.config
            .map(|c| c.duration_for(phase))
            .unwrap_or(Duration::ZERO)
    }

    /// State at the latest observed instant. Never advances time.
    pub fn snapshot(&self) -> Snapshot {
        let elapsed = self
            .last_now
            .map(|now| self.clock.elapsed(now))
            .unwrap_or(Duration::ZERO);
        self.build_snapshot(elapsed)
    }

    /// Remove and return queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the session durations. Only allowed while idle.
    ///
    /// # Errors
    ///
    /// [`TimerError::InvalidState`] while running or paused. The prior
    /// configuration is left untouched.
    pub fn configure(&mut self, config: SessionConfig) -> Result<(), TimerError> {
        self.require(RunState::Idle, "configure")?;
        self.config = Some(config);
        self.phase = Phase::Study;
        self.clock.clear();
        self.last_observed = Duration::ZERO;
        tracing::debug!(
            study_secs = config.study_duration_secs(),
            break_secs = config.break_duration_secs(),
            "timer configured"
        );
        Ok(())
    }

    /// Validate raw durations (seconds) and [`configure`](Self::configure).
    ///
    /// # Errors
    ///
    /// [`TimerError::InvalidState`] while a session is active, otherwise
    /// [`TimerError::InvalidConfig`] for out-of-range values.
    pub fn configure_secs(
        &mut self,
        study_duration_secs: u64,
        break_duration_secs: u64,
    ) -> Result<(), TimerError> {
        self.require(RunState::Idle, "configure")?;
        let config = SessionConfig::new(study_duration_secs, break_duration_secs)?;
        self.configure(config)
    }

    pub fn start(&mut self, now: Instant) -> Result<(), TimerError> {
        self.require(RunState::Idle, "start")?;
        let config = self.config.ok_or(TimerError::InvalidState {
            operation: "start without configured durations",
            state: self.run_state,
        })?;
        let now = self.observe(now);
        self.clock.start(now);
        self.last_observed = Duration::ZERO;
        self.run_state = RunState::Running;
        tracing::debug!(phase = %self.phase, "session started");
        self.events.push_back(Event::SessionStarted {
            phase: self.phase,
            duration_secs: config.duration_secs(self.phase),
            at: Utc::now(),
        });
        Ok(())
    }

    pub fn pause(&mut self, now: Instant) -> Result<(), TimerError> {
        self.require(RunState::Running, "pause")?;
        let now = self.observe(now);
        self.accumulate(now);
        self.clock.pause(now)?;
        self.run_state = RunState::Paused;
        let elapsed_ms = self.capped_elapsed(self.clock.elapsed(now)).as_millis() as u64;
        tracing::debug!(phase = %self.phase, elapsed_ms, "session paused");
        self.events.push_back(Event::Paused {
            phase: self.phase,
            elapsed_ms,
            at: Utc::now(),
        });
        Ok(())
    }

    pub fn resume(&mut self, now: Instant) -> Result<(), TimerError> {
        self.require(RunState::Paused, "resume")?;
        let now = self.observe(now);
        self.clock.resume(now)?;
        self.run_state = RunState::Running;
        let elapsed_ms = self.capped_elapsed(self.clock.elapsed(now)).as_millis() as u64;
        tracing::debug!(phase = %self.phase, elapsed_ms, "session resumed");
        self.events.push_back(Event::Resumed {
            phase: self.phase,
            elapsed_ms,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Pause when running, resume when paused, start when idle.
    pub fn toggle_pause(&mut self, now: Instant) -> Result<(), TimerError> {
        match self.run_state {
            RunState::Idle => self.start(now),
            RunState::Running => self.pause(now),
            RunState::Paused => self.resume(now),
        }
    }

    /// Restart the active phase at full duration and keep running.
    ///
    /// Study time already counted for the discarded part of the session stays
    /// in the total.
    pub fn reset_current_session(&mut self, now: Instant) -> Result<(), TimerError> {
        if self.run_state == RunState::Idle {
            return Err(TimerError::InvalidState {
                operation: "reset session",
                state: self.run_state,
            });
        }
        let now = self.observe(now);
        self.accumulate(now);
        self.clock.reset(now);
        self.last_observed = Duration::ZERO;
        self.run_state = RunState::Running;
        tracing::debug!(phase = %self.phase, "session reset");
        self.events.push_back(Event::SessionReset {
            phase: self.phase,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Return to `Idle` at the start of the current phase.
    pub fn stop(&mut self, now: Instant) -> Result<(), TimerError> {
        if self.run_state == RunState::Idle {
            return Err(TimerError::InvalidState {
                operation: "stop",
                state: self.run_state,
            });
        }
        let now = self.observe(now);
        self.accumulate(now);
        self.clock.clear();
        self.last_observed = Duration::ZERO;
        self.run_state = RunState::Idle;
        tracing::debug!(phase = %self.phase, "timer stopped");
        self.events.push_back(Event::Stopped {
            phase: self.phase,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Zero the cumulative study counter.
    pub fn reset_total_study_time(&mut self) {
        self.total_study = Duration::ZERO;
        // Only time elapsed after this point may be counted again.
        if let Some(now) = self.last_now {
            self.last_observed = self.capped_elapsed(self.clock.elapsed(now));
        }
        tracing::info!("total study time reset");
        self.events.push_back(Event::TotalReset { at: Utc::now() });
    }

    /// Advance the engine to `now`.
    ///
    /// Adds new study time, and when the active session has run its full
    /// length queues [`Event::PhaseCompleted`], switches to the other phase
    /// and keeps running. At most one phase completes per call.
    pub fn tick(&mut self, now: Instant) -> Snapshot {
        if self.run_state != RunState::Running {
            return self.snapshot();
        }
        let now = self.observe(now);
        let elapsed = self.accumulate(now);

        let duration = self.duration_for(self.phase);
        if elapsed >= duration {
            let completed = self.phase;
            self.phase = completed.other();
            self.clock.reset(now);
            self.last_observed = Duration::ZERO;
            tracing::info!(
                completed = %completed,
                next = %self.phase,
                total_study_secs = self.total_study.as_secs(),
                "phase completed"
            );
            self.events.push_back(Event::PhaseCompleted {
                phase: completed,
                at: Utc::now(),
            });
        }

        self.build_snapshot(self.clock.elapsed(now))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require(&self, expected: RunState, operation: &'static str) -> Result<(), TimerError> {
        if self.run_state == expected {
            Ok(())
        } else {
            Err(TimerError::InvalidState {
                operation,
                state: self.run_state,
            })
        }
    }

    /// Record `now` and return the latest instant seen so far, so elapsed
    /// readings never go backwards when timestamps arrive out of order.
    fn observe(&mut self, now: Instant) -> Instant {
        let latest = match self.last_now {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        self.last_now = Some(latest);
        latest
    }

    /// Add study time up to `now` (capped at the phase length) and return the
    /// raw elapsed reading.
    fn accumulate(&mut self, now: Instant) -> Duration {
        let elapsed = self.clock.elapsed(now);
        if self.run_state == RunState::Running && self.phase.counts_toward_total() {
            let capped = self.capped_elapsed(elapsed);
            if capped > self.last_observed {
                self.total_study += capped - self.last_observed;
                self.last_observed = capped;
            }
        }
        elapsed
    }

    fn capped_elapsed(&self, elapsed: Duration) -> Duration {
        elapsed.min(self.duration_for(self.phase))
    }

    fn build_snapshot(&self, elapsed: Duration) -> Snapshot {
        let duration = self.duration_for(self.phase);
        let elapsed = elapsed.min(duration);
        let progress = if duration.is_zero() {
            0.0
        } else {
            (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        Snapshot {
            phase: self.phase,
            run_state: self.run_state,
            configured: self.config.is_some(),
            elapsed_ms: elapsed.as_millis() as u64,
            remaining_ms: (duration - elapsed).as_millis() as u64,
            duration_ms: duration.as_millis() as u64,
            total_study_ms: self.total_study.as_millis() as u64,
            progress,
        }
    }
}
