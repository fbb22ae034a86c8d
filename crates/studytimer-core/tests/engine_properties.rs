//! Property tests for the timer engine.
//!
//! Drives the engine with generated tick cadences and checks the
//! time-accounting guarantees: monotonic elapsed time, exact study
//! accumulation, and no study credit for break time.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use studytimer_core::{Event, Phase, RunState, SessionConfig, TimerEngine};

fn started(study_secs: u64, break_secs: u64, t0: Instant) -> TimerEngine {
    let mut engine = TimerEngine::new();
    engine
        .configure(SessionConfig::new(study_secs, break_secs).unwrap())
        .unwrap();
    engine.start(t0).unwrap();
    engine.drain_events();
    engine
}

fn completions(events: &[Event]) -> Vec<Phase> {
    events.iter().filter_map(Event::completed_phase).collect()
}

#[test]
fn one_second_ticks_accumulate_exactly_one_study_session() {
    let t0 = Instant::now();
    let mut engine = started(60, 300, t0);
    let mut events = Vec::new();

    for n in 1..=60 {
        engine.tick(t0 + Duration::from_secs(n));
        events.extend(engine.drain_events());
    }

    assert_eq!(engine.total_study(), Duration::from_secs(60));
    assert_eq!(completions(&events), vec![Phase::Study]);

    let snap = engine.snapshot();
    assert_eq!(snap.phase, Phase::Break);
    assert_eq!(snap.run_state, RunState::Running);
    assert_eq!(snap.elapsed_ms, 0);
}

#[test]
fn full_cycle_returns_to_study() {
    let t0 = Instant::now();
    let mut engine = started(60, 60, t0);
    let mut events = Vec::new();

    for n in 1..=120 {
        engine.tick(t0 + Duration::from_secs(n));
        events.extend(engine.drain_events());
    }

    assert_eq!(completions(&events), vec![Phase::Study, Phase::Break]);
    assert_eq!(engine.phase(), Phase::Study);
    assert_eq!(engine.total_study(), Duration::from_secs(60));
}

#[test]
fn pause_in_the_middle_is_not_counted() {
    let t0 = Instant::now();
    let mut engine = started(120, 60, t0);
    let at = |s: u64| t0 + Duration::from_secs(s);

    engine.tick(at(30));
    engine.pause(at(40)).unwrap();
    for s in 41..1_000 {
        engine.tick(at(s));
    }
    engine.resume(at(1_000)).unwrap();
    let snap = engine.tick(at(1_010));

    assert_eq!(snap.elapsed_ms, 50_000);
    assert_eq!(snap.total_study_ms, 50_000);
    assert_eq!(snap.phase, Phase::Study);
}

proptest! {
    #[test]
    fn elapsed_is_monotonic_within_a_session(
        steps in prop::collection::vec(0u64..2_000, 1..200),
    ) {
        let t0 = Instant::now();
        let mut engine = started(10_800, 3_600, t0);
        let mut now = t0;
        let mut last = 0;

        for step in steps {
            now += Duration::from_millis(step);
            let snap = engine.tick(now);
            prop_assert!(snap.elapsed_ms >= last);
            prop_assert!(snap.elapsed_ms <= snap.duration_ms);
            last = snap.elapsed_ms;
        }
    }

    #[test]
    fn study_total_matches_study_time_regardless_of_cadence(
        steps in prop::collection::vec(1u64..5_000, 1..400),
    ) {
        let t0 = Instant::now();
        let mut engine = started(60, 60, t0);
        let mut now = t0;
        let mut expected = Duration::ZERO;
        let mut phase = Phase::Study;
        let mut session = Duration::ZERO;

        for step in steps {
            let step = Duration::from_millis(step);
            now += step;
            session += step;
            let limit = Duration::from_secs(60);
            if phase == Phase::Study {
                expected += step.min(limit.saturating_sub(session - step));
            }
            engine.tick(now);
            if session >= limit {
                phase = phase.other();
                session = Duration::ZERO;
            }
            prop_assert_eq!(engine.phase(), phase);
        }

        prop_assert_eq!(engine.total_study(), expected);
    }

    #[test]
    fn total_never_decreases(
        ops in prop::collection::vec((0u8..5, 0u64..3_000), 1..200),
    ) {
        let t0 = Instant::now();
        let mut engine = started(60, 60, t0);
        let mut now = t0;
        let mut last_total = Duration::ZERO;

        for (op, step) in ops {
            now += Duration::from_millis(step);
            // Failures are precondition errors and leave state unchanged.
            let _ = match op {
                0 => engine.pause(now),
                1 => engine.resume(now),
                2 => engine.reset_current_session(now),
                3 => engine.stop(now).and_then(|_| engine.start(now)),
                _ => Ok(()),
            };
            engine.tick(now);
            prop_assert!(engine.total_study() >= last_total);
            last_total = engine.total_study();
        }
    }
}
