//! Source media properties.
//!
//! [`MediaInfo`] is built from ffprobe's JSON output for the first video
//! stream. Parsing is kept separate from the process boundary in
//! `external::ffprobe_executor` so the fallback rules can be tested on canned
//! documents.

use crate::error::{CoreError, CoreResult};
use serde::Deserialize;

/// Probed properties of the source. Produced once per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub width: u32,
    pub height: u32,
    /// Frames per second as a decimal (`30000/1001` -> 29.97...).
    pub frame_rate: f64,
    pub duration_secs: f64,
    /// Set when no stream reported a duration and the fallback was used.
    pub duration_is_fallback: bool,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    streams: Option<Vec<ProbeStream>>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    r_frame_rate: Option<String>,
}

/// Parses a frame rate reported as `N/D` or as a plain decimal.
///
/// Returns `None` for a zero denominator or a non-positive result.
#[must_use]
pub fn parse_frame_rate(raw: &str) -> Option<f64> {
    let rate = match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => raw.trim().parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

impl ProbeStream {
    fn frame_rate(&self) -> Option<f64> {
        self.r_frame_rate.as_deref().and_then(parse_frame_rate)
    }

    fn duration(&self) -> Option<f64> {
        self.duration
            .as_deref()
            .and_then(|d| d.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
    }
}

impl MediaInfo {
    /// Builds a MediaInfo from ffprobe `-print_format json` output.
    ///
    /// The first stream supplies the dimensions. Frame rate and duration come
    /// from the first stream when usable, otherwise from the first stream that
    /// carries one. Without any duration, `fallback_duration_secs` is used and
    /// a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ProbeFailure` when the document is not valid JSON,
    /// has no stream list, has no streams, lacks dimensions, or carries no
    /// usable frame rate.
    pub fn from_probe_json(json: &str, fallback_duration_secs: f64) -> CoreResult<Self> {
        let output: ProbeOutput = serde_json::from_str(json)
            .map_err(|e| CoreError::ProbeFailure(format!("unreadable prober output: {e}")))?;

        let streams = output
            .streams
            .ok_or_else(|| CoreError::ProbeFailure("prober output has no stream list".to_string()))?;
        let first = streams
            .first()
            .ok_or_else(|| CoreError::ProbeFailure("source has no video stream".to_string()))?;

        let (width, height) = match (first.width, first.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(CoreError::ProbeFailure(
                    "video stream reports no dimensions".to_string(),
                ));
            }
        };

        let frame_rate = first
            .frame_rate()
            .or_else(|| streams.iter().find_map(ProbeStream::frame_rate))
            .ok_or_else(|| CoreError::ProbeFailure("no stream reports a usable frame rate".to_string()))?;

        let (duration_secs, duration_is_fallback) =
            match first.duration().or_else(|| streams.iter().find_map(ProbeStream::duration)) {
                Some(duration) => (duration, false),
                None => {
                    log::warn!(
                        "Source reports no duration; assuming {fallback_duration_secs}s. \
                         Trims to the end of the source may be inexact."
                    );
                    (fallback_duration_secs, true)
                }
            };

        Ok(Self {
            width,
            height,
            frame_rate,
            duration_secs,
            duration_is_fallback,
        })
    }
}
