//! Dashboard utility functions
//!
//! Formatting helpers shared by the view derivation and the renderer.

use chrono::{DateTime, Utc};

/// Human-readable estimate for `remaining_lessons` at `minutes_per_lesson` each.
///
/// Under an hour prints minutes (`"30m"`); otherwise whole hours rounded half away
/// from zero (`90` minutes prints `"2h"`).
pub fn format_remaining_time(remaining_lessons: usize, minutes_per_lesson: u32) -> String {
    let minutes = remaining_lessons as u64 * u64::from(minutes_per_lesson);
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}h", (minutes as f64 / 60.0).round() as u64)
    }
}

/// Compact "MM-DD HH:MM" rendering, or "-" when absent.
pub fn format_compact_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.format("%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Text progress bar, e.g. `[#####-----]` for 50%.
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let clamped = percentage.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// File name a downloaded certificate is saved under. Path separators are replaced so
/// the id cannot escape the download directory.
pub fn certificate_file_name(certificate_id: &str) -> String {
    let safe: String = certificate_id
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("certificate-{}.pdf", safe)
}
