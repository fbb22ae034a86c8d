//! # studytimer Core Library
//!
//! Core logic for a study/break countdown timer that keeps a running total
//! of study time across restarts. Front-ends (the `studytimer` CLI, or any
//! GUI) are thin layers that drive the engine and render its snapshots.
//!
//! ## Architecture
//!
//! - **Session Clock**: monotonic elapsed-time measurement for one session,
//!   immune to wall-clock changes
//! - **Timer Engine**: the study/break state machine; the caller invokes
//!   `tick()` at a fixed cadence and drains queued events
//! - **Storage**: TOML-based settings (durations, study total, theme)
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SessionClock`]: Drift-free session clock
//! - [`Settings`]: Persisted settings

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, TimerError};
pub use events::Event;
pub use storage::{Settings, Theme};
pub use timer::{Phase, RunState, SessionClock, SessionConfig, Snapshot, TimerEngine};
