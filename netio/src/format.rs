//! Human-formatted progress fields shared by every acquisition worker:
//! `progressCompleted`, `progressDownloadSpeeds` and `timeUntilComplete`
//! on [`status::DownloadingData`].

use std::time::Duration;

const UNIT_THRESHOLD: f64 = 1024.0;
const MAX_ETA: Duration = Duration::from_secs(24 * 60 * 60);

/// "0.00"-"100.00", per spec.md §3.
pub fn format_percent(downloaded: u64, total: u64) -> String {
    if total == 0 {
        return "0.00".to_string();
    }
    let pct = (downloaded as f64 / total as f64) * 100.0;
    format!("{:.2}", pct.clamp(0.0, 100.0))
}

/// Bytes-per-second rendered with a B/s, KB/s, MB/s, GB/s unit ladder.
pub fn format_speed(bytes_per_second: f64) -> String {
    let mut speed = bytes_per_second.max(0.0);
    let units = ["B/s", "KB/s", "MB/s", "GB/s"];
    let mut unit_index = 0;
    while speed >= UNIT_THRESHOLD && unit_index < units.len() - 1 {
        speed /= UNIT_THRESHOLD;
        unit_index += 1;
    }
    format!("{speed:.2} {}", units[unit_index])
}

/// ETA rendered with the ladder `<60s -> Ns`, `<1h -> Mm Ss`,
/// `<1d -> Hh Mm`, else `Dd Hh`, clamped to a maximum of 24 hours.
pub fn format_eta(bytes_remaining: u64, bytes_per_second: f64) -> String {
    if bytes_per_second <= 0.0 {
        return "calculating...".to_string();
    }
    let seconds_remaining = (bytes_remaining as f64 / bytes_per_second).max(0.0);
    let duration = Duration::from_secs_f64(seconds_remaining).min(MAX_ETA);
    let total_secs = duration.as_secs();

    if total_secs == 0 {
        return "0s".to_string();
    }
    if total_secs < 60 {
        return format!("{total_secs}s");
    }
    if total_secs < 3600 {
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        return format!("{minutes}m {seconds}s");
    }
    if total_secs < 86400 {
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        return format!("{hours}h {minutes}m");
    }
    let days = total_secs / 86400;
    let hours = (total_secs % 86400) / 3600;
    format!("{days}d {hours}h")
}
