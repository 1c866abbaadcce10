//! Utility functions for formatting and numeric rounding.
//!
//! This module provides small helpers shared by the plan assembler and the
//! pass supervisor: elapsed-time formatting, the four-decimal rounding used
//! for every derived timestamp, and even-dimension rounding for scaling.

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use] pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Rounds to 4 decimal places, the precision of every derived timestamp.
#[must_use] pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Formats a number for a filter or option argument (e.g., 6.0 -> "6", 1.25 -> "1.25").
#[must_use] pub fn format_decimal(value: f64) -> String {
    let rounded = round4(value);
    // Avoid "-0" from rounding tiny negative values.
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Rounds a dimension up to the nearest even integer (481 -> 482).
///
/// `u32::MAX` has no even value above it and maps to `u32::MAX - 1`.
#[must_use] pub fn ceil_even(value: u32) -> u32 {
    value.checked_add(value % 2).unwrap_or(u32::MAX - 1)
}
