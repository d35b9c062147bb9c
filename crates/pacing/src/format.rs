//! Human-readable renderings of paces, durations and clock times.

use time::{Duration, Time};

/// `m:ss` per kilometer, e.g. `6:30`. Rounded seconds carry into minutes.
pub fn format_pace(pace_min_per_km: f64) -> String {
    if !pace_min_per_km.is_finite() || pace_min_per_km <= 0.0 {
        return "-".to_string();
    }
    let total_seconds = (pace_min_per_km * 60.0).round() as u64;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// `HH:MM:SS` for a duration in minutes. Hours are not wrapped.
pub fn format_duration(minutes: f64) -> String {
    let total_seconds = (minutes.max(0.0) * 60.0).round() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

/// Clock time `elapsed_min` after `start`, wrapping past midnight.
pub fn time_of_day(start: Time, elapsed_min: f64) -> Time {
    let seconds = (elapsed_min.max(0.0) * 60.0).round() as i64;
    start + Duration::seconds(seconds)
}

/// `HH:MM`.
pub fn format_time_of_day(t: Time) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}
