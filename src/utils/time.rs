//! Time utilities: parsing HH:MM and rendering progress.

use chrono::NaiveTime;

/// Strict `HH:MM` (24h). Seconds are not accepted.
pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M").ok()
}

/// Text progress bar, e.g. `[#####-----]` for 50% at width 10.
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled.min(width)))
}
