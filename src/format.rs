//! Percentage formatters.
//!
//! A formatter turns the clamped progress fraction into the suffix shown
//! after the bar. The default is a right-aligned ` NNN%`.

use crate::style::PercentFormatter;
use std::sync::Arc;

/// Default ` NNN%` suffix.
pub fn default_percentage(p: f64) -> String {
    format!(" {:>3}%", (p * 100.0).round() as u32)
}

/// Shows progress as a fraction of `total`, e.g. ` 50/100`.
///
/// ```rust
/// use bubbletea_progress::format::format_as_fraction;
///
/// let f = format_as_fraction(100);
/// assert_eq!(f(0.5), " 50/100");
/// ```
pub fn format_as_fraction(total: u64) -> PercentFormatter {
    Arc::new(move |p: f64| format!(" {}/{}", (p * total as f64) as u64, total))
}

/// Estimates the remaining time from the time spent so far.
///
/// Below 1% there is not enough signal and the formatter shows
/// ` estimating...`.
pub fn format_as_time_remaining(elapsed_seconds: f64) -> PercentFormatter {
    Arc::new(move |p: f64| {
        if p < 0.01 {
            return " estimating...".to_string();
        }
        let remaining = elapsed_seconds / p - elapsed_seconds;
        if remaining < 60.0 {
            format!(" ~{:.0}s", remaining)
        } else if remaining < 3600.0 {
            format!(" ~{:.1}m", remaining / 60.0)
        } else {
            format!(" ~{:.1}h", remaining / 3600.0)
        }
    })
}

/// Scientific notation, switching to ` 100%` once effectively done.
pub fn format_engineering(p: f64) -> String {
    if p >= 0.999 {
        return " 100%".to_string();
    }
    format!(" {:.2e}", p)
}
