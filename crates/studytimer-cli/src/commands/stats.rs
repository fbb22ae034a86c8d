use clap::Subcommand;
use serde::Serialize;
use studytimer_core::timer::{format_hms, format_hours};
use studytimer_core::Settings;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Show total study time
    Total {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reset total study time to zero
    ResetTotal,
}

#[derive(Serialize)]
struct TotalReport {
    total_study_seconds: u64,
    hours: String,
    detailed: String,
}

impl TotalReport {
    fn new(secs: u64) -> Self {
        Self {
            total_study_seconds: secs,
            hours: format_hours(secs),
            detailed: format_hms(secs),
        }
    }
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load()?;

    match action {
        StatsAction::Total { json } => {
            let report = TotalReport::new(settings.total_study_seconds);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} ({})", report.hours, report.detailed);
            }
        }
        StatsAction::ResetTotal => {
            settings.total_study_seconds = 0;
            settings.save()?;
            tracing::info!("total study time reset");
            println!("total study time reset");
        }
    }
    Ok(())
}
