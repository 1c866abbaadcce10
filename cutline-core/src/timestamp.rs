//! Time expression parsing.
//!
//! User-facing time options accept either bare seconds (`"90"`, `"2.5"`) or a
//! clock value. Clock values are tried against a fixed, ordered list of
//! formats and the first match wins:
//!
//! | format         | example         |
//! |----------------|-----------------|
//! | `H:M:S.ffffff` | `1:02:03.5`     |
//! | `H:M:S`        | `01:01:30`      |
//! | `M:S.ffffff`   | `1:30.5`        |
//! | `M:S`          | `1:30`          |
//!
//! Hour, minute and second fields take one or two digits and the fraction one
//! to six, as with strptime. The value is the offset from midnight, rounded to
//! four decimals. An unrecognized expression is an error, never zero seconds.

use crate::error::{CoreError, CoreResult};
use crate::utils::round4;
use chrono::{NaiveTime, Timelike};

/// Clock layouts in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockFormat {
    HoursWithFraction,
    Hours,
    MinutesWithFraction,
    Minutes,
}

const CLOCK_FORMATS: [ClockFormat; 4] = [
    ClockFormat::HoursWithFraction,
    ClockFormat::Hours,
    ClockFormat::MinutesWithFraction,
    ClockFormat::Minutes,
];

impl ClockFormat {
    fn field_count(self) -> usize {
        match self {
            ClockFormat::HoursWithFraction | ClockFormat::Hours => 3,
            ClockFormat::MinutesWithFraction | ClockFormat::Minutes => 2,
        }
    }

    fn has_fraction(self) -> bool {
        matches!(
            self,
            ClockFormat::HoursWithFraction | ClockFormat::MinutesWithFraction
        )
    }

    /// Parses `input` strictly in this layout, validating ranges through chrono.
    fn parse(self, input: &str) -> Option<NaiveTime> {
        let (clock, micros) = if self.has_fraction() {
            let (clock, fraction) = input.split_once('.')?;
            (clock, parse_fraction(fraction)?)
        } else {
            (input, 0)
        };

        let fields = clock
            .split(':')
            .map(parse_clock_field)
            .collect::<Option<Vec<u32>>>()?;
        if fields.len() != self.field_count() {
            return None;
        }

        let (hour, minute, second) = match fields.as_slice() {
            [h, m, s] => (*h, *m, *s),
            [m, s] => (0, *m, *s),
            _ => return None,
        };
        NaiveTime::from_hms_micro_opt(hour, minute, second, micros)
    }
}

fn parse_clock_field(field: &str) -> Option<u32> {
    if field.is_empty() || field.len() > 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Parses 1 to 6 fractional digits into microseconds (`"5"` -> 500000).
fn parse_fraction(fraction: &str) -> Option<u32> {
    if fraction.is_empty() || fraction.len() > 6 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{fraction:0<6}");
    padded.parse().ok()
}

fn seconds_since_midnight(time: NaiveTime) -> f64 {
    f64::from(time.num_seconds_from_midnight()) + f64::from(time.nanosecond()) / 1e9
}

/// Normalizes a time expression into seconds.
///
/// # Errors
///
/// Returns `CoreError::TimestampParse` when the expression is neither a finite
/// decimal number nor one of the supported clock formats.
pub fn parse_timestamp(input: &str) -> CoreResult<f64> {
    let trimmed = input.trim();

    if let Ok(seconds) = trimmed.parse::<f64>() {
        if seconds.is_finite() {
            return Ok(seconds);
        }
    }

    CLOCK_FORMATS
        .iter()
        .find_map(|format| format.parse(trimmed))
        .map(|time| round4(seconds_since_midnight(time)))
        .ok_or_else(|| CoreError::TimestampParse {
            input: input.to_string(),
        })
}
