//! Platform bitrate caps.
//!
//! A two-level table keyed by frame-rate ceiling, then by height ceiling.
//! Lookups use ceiling selection: the smallest key greater than or equal to
//! the actual value. A value above every key is an error rather than a clamp
//! to the largest tier.

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::fmt;

/// A bitrate such as `8M`: integer amount plus unit suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitrate {
    pub amount: u32,
    pub unit: String,
}

impl Bitrate {
    #[must_use]
    pub fn new(amount: u32, unit: &str) -> Self {
        Self {
            amount,
            unit: unit.to_string(),
        }
    }

    /// Rate-control buffer: 1.5 times the amount, same unit. Halves round to
    /// the even neighbour (3M -> 4M, 5M -> 8M).
    #[must_use]
    pub fn buffer_size(&self) -> Bitrate {
        let amount = (f64::from(self.amount) * 1.5).round_ties_even() as u32;
        Bitrate {
            amount,
            unit: self.unit.clone(),
        }
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit)
    }
}

/// Result of a table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSelection {
    pub fps_tier: u32,
    pub height_tier: u32,
    pub maxrate: Bitrate,
    pub bufsize: Bitrate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitrateTable {
    rows: BTreeMap<u32, BTreeMap<u32, Bitrate>>,
}

/// Smallest key >= value. BTreeMap iterates keys in ascending order.
fn ceiling<V>(map: &BTreeMap<u32, V>, value: f64) -> Option<(u32, &V)> {
    map.iter()
        .find(|(key, _)| f64::from(**key) >= value)
        .map(|(key, v)| (*key, v))
}

impl BitrateTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) one cell.
    #[must_use]
    pub fn with_tier(mut self, fps: u32, height: u32, bitrate: Bitrate) -> Self {
        self.rows.entry(fps).or_default().insert(height, bitrate);
        self
    }

    /// YouTube's recommended maximum bitrates for SDR uploads.
    #[must_use]
    pub fn youtube() -> Self {
        const ROWS: [(u32, [(u32, u32); 7]); 2] = [
            (30, [(2880, 64), (2160, 45), (1440, 16), (1080, 8), (720, 5), (480, 3), (360, 1)]),
            (60, [(2880, 80), (2160, 64), (1440, 24), (1080, 12), (720, 8), (480, 4), (360, 2)]),
        ];

        ROWS.iter().fold(Self::new(), |table, (fps, cells)| {
            cells.iter().fold(table, |table, (height, megabits)| {
                table.with_tier(*fps, *height, Bitrate::new(*megabits, "M"))
            })
        })
    }

    /// Selects the cell for a frame rate and output height.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::BitrateTierNotFound` when the frame rate exceeds
    /// every row key, or the height exceeds every key of the selected row.
    pub fn select(&self, fps: f64, height: u32) -> CoreResult<TierSelection> {
        let (fps_tier, row) = ceiling(&self.rows, fps).ok_or(CoreError::BitrateTierNotFound {
            dimension: "frame rate",
            value: fps,
        })?;
        let (height_tier, maxrate) =
            ceiling(row, f64::from(height)).ok_or(CoreError::BitrateTierNotFound {
                dimension: "height",
                value: f64::from(height),
            })?;

        log::debug!(
            "Bitrate tier {fps_tier}fps/{height_tier}p selected for {fps:.3}fps at {height}p: {maxrate}"
        );

        Ok(TierSelection {
            fps_tier,
            height_tier,
            maxrate: maxrate.clone(),
            bufsize: maxrate.buffer_size(),
        })
    }
}

/// Keyframe interval: half the source frame rate, at least 1.
#[must_use]
pub fn gop_length(fps: f64) -> u32 {
    ((fps / 2.0).round() as u32).max(1)
}
