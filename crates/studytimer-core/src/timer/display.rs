//! Text forms of timer values for front-ends.

use super::engine::Snapshot;

/// Label shown in place of the countdown before durations are set.
pub const UNCONFIGURED_LABEL: &str = "Set time";

/// `MM:SS`, with minutes allowed to grow past two digits (`180:00`).
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Decimal hours with two places, e.g. `1.50 h`.
pub fn format_hours(secs: u64) -> String {
    format!("{:.2} h", secs as f64 / 3600.0)
}

/// `HH:MM:SS`.
pub fn format_hms(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

impl Snapshot {
    /// Countdown text, or "Set time" while unconfigured.
    pub fn remaining_label(&self) -> String {
        if self.configured {
            format_clock(self.remaining_ms)
        } else {
            UNCONFIGURED_LABEL.to_string()
        }
    }

    /// Short and detailed forms of the study total.
    pub fn total_labels(&self) -> (String, String) {
        let secs = self.total_study_secs();
        (format_hours(secs), format_hms(secs))
    }

    /// One-line status, e.g. `[study] running 24:13  total 1.50 h`.
    pub fn status_line(&self) -> String {
        let (short, _) = self.total_labels();
        format!(
            "[{}] {} {}  total {}",
            self.phase,
            self.run_state,
            self.remaining_label(),
            short
        )
    }
}
