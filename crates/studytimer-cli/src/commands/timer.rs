use std::io::{IsTerminal, Write};
use std::time::{Duration, Instant};

use clap::Subcommand;
use studytimer_core::{Event, Settings, SessionConfig, Snapshot, TimerEngine, TimerError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground.
    ///
    /// Type `p` + Enter to pause/resume, `r` to restart the session,
    /// `s` to stop, `g` to start again, `q` to quit.
    Run {
        /// Tick interval in milliseconds
        #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u64).range(1..))]
        tick_ms: u64,
        /// Seconds between saves of the study total
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        save_every: u64,
    },
    /// Set study and break durations (minutes)
    SetTime {
        /// Study minutes (1-180)
        study_min: u64,
        /// Break minutes (1-60)
        break_min: u64,
    },
    /// Print the configured timer state as JSON
    Status,
}

/// What the loop should do after a stdin command.
#[derive(Debug, PartialEq, Eq)]
enum Control {
    Continue,
    Quit,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            tick_ms,
            save_every,
        } => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = rt.block_on(run_loop(
                Duration::from_millis(tick_ms),
                Duration::from_secs(save_every),
            ));
            // A pending stdin read would otherwise hold shutdown open.
            rt.shutdown_timeout(Duration::from_millis(100));
            result
        }
        TimerAction::SetTime {
            study_min,
            break_min,
        } => {
            let config = SessionConfig::from_minutes(study_min, break_min)?;
            let mut settings = Settings::load()?;
            settings.apply_config(config);
            settings.save()?;
            println!("ok");
            Ok(())
        }
        TimerAction::Status => {
            let settings = Settings::load()?;
            let engine = restore_engine(&settings)?;
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            Ok(())
        }
    }
}

async fn run_loop(
    tick_every: Duration,
    save_every: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = restore_engine(&Settings::load()?)?;
    engine.start(Instant::now())?;
    report_events(&mut engine);

    let mut interactive = std::io::stdout().is_terminal();

    let mut ticker = tokio::time::interval(tick_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut saver =
        tokio::time::interval_at(tokio::time::Instant::now() + save_every, save_every);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = engine.tick(Instant::now());
                report_events(&mut engine);
                if interactive {
                    if let Err(e) = render(&snapshot) {
                        tracing::debug!(error = %e, "stdout closed, status line disabled");
                        interactive = false;
                    }
                }
            }
            _ = saver.tick() => persist(&engine),
            line = lines.next_line(), if stdin_open => match line? {
                Some(command) => match apply_command(&mut engine, command.trim(), Instant::now()) {
                    Ok(Control::Continue) => report_events(&mut engine),
                    Ok(Control::Quit) => break,
                    Err(e) => eprintln!("\n{e}"),
                },
                None => stdin_open = false,
            },
            _ = &mut ctrl_c => break,
        }
    }

    if interactive {
        println!();
    }
    persist(&engine);
    Ok(())
}

/// Idle engine with the persisted durations and study total.
fn restore_engine(settings: &Settings) -> Result<TimerEngine, TimerError> {
    Ok(TimerEngine::with_state(
        settings.session_config()?,
        settings.total_study(),
    ))
}

fn apply_command(
    engine: &mut TimerEngine,
    command: &str,
    now: Instant,
) -> Result<Control, TimerError> {
    match command {
        "p" | "pause" | "resume" => engine.toggle_pause(now)?,
        "r" | "reset" => engine.reset_current_session(now)?,
        "s" | "stop" => engine.stop(now)?,
        "g" | "go" | "start" => engine.start(now)?,
        "q" | "quit" => return Ok(Control::Quit),
        "" => {}
        other => tracing::warn!(command = other, "unknown command"),
    }
    Ok(Control::Continue)
}

/// Print transitions; ring the terminal bell when a phase completes.
fn report_events(engine: &mut TimerEngine) {
    for event in engine.drain_events() {
        match event {
            Event::PhaseCompleted { phase, .. } => {
                println!("\x07\n{phase} complete, starting {}", phase.other());
            }
            Event::SessionStarted {
                phase,
                duration_secs,
                ..
            } => println!("{phase} started ({} min)", duration_secs / 60),
            Event::Stopped { phase, .. } => println!("\nstopped ({phase})"),
            other => tracing::debug!(event = ?other, "timer event"),
        }
    }
}

fn render(snapshot: &Snapshot) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "\r{:<60}", snapshot.status_line())?;
    stdout.flush()
}

/// Save the study total into the current settings file, leaving every other
/// field as another command may have changed it. Failures are logged and
/// never touch the engine.
fn persist(engine: &TimerEngine) {
    let result = Settings::load().and_then(|mut settings| {
        settings.record_total(engine.total_study());
        settings.save()
    });
    if let Err(e) = result {
        tracing::warn!(error = %e, "failed to save study total");
    }
}
