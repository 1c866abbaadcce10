//! Trim window, seek placement and fade timing.
//!
//! Fast seek puts `-ss` before `-i`, so the decoder starts at the seek point
//! and filter timestamps begin at zero. Accurate seek puts `-ss` after `-i`;
//! filters then see the source timeline and every fade must add the start
//! offset back. Palette exports and the explicit override use fast seek.

use crate::error::{CoreError, CoreResult};
use crate::media::MediaInfo;
use crate::request::{EndPolicy, TranscodeRequest};
use crate::utils::{format_decimal, round4};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekPlacement {
    /// `-ss` before `-i`.
    Fast,
    /// `-ss` after `-i`.
    Accurate,
}

/// Time values derived from a request and the probed source.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub seek: SeekPlacement,
    pub start_secs: f64,
    /// Length of the selected source range.
    pub duration_secs: f64,
    /// Length of the encoded output, including loop repetitions.
    pub output_secs: f64,
    /// Whether the duration option is emitted.
    pub explicit_duration: bool,
    /// Filter timestamp corresponding to the start of the trim.
    pub effective_zero: f64,
    pub fadein_start: Option<f64>,
    pub fadeout_start: Option<f64>,
}

impl Timeline {
    /// Derives the trim window and fade positions.
    ///
    /// "To end of source" runs from the start offset to the probed duration.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRequest` when the resulting duration is not
    /// positive (for example an end position before the start).
    pub fn resolve(request: &TranscodeRequest, media: &MediaInfo) -> CoreResult<Self> {
        let seek = if request.codec.uses_palette() || request.fast_seek {
            SeekPlacement::Fast
        } else {
            SeekPlacement::Accurate
        };

        let start_secs = request.start_secs;
        let duration_secs = round4(match request.end {
            EndPolicy::Duration(duration) => duration,
            EndPolicy::EndPosition(end) => end - start_secs,
            EndPolicy::ToEndOfSource => media.duration_secs - start_secs,
        });
        if duration_secs <= 0.0 {
            return Err(CoreError::InvalidRequest(format!(
                "empty trim range: start {start_secs}s leaves {duration_secs}s of output"
            )));
        }

        let output_secs = round4(duration_secs * f64::from(request.loop_count + 1));
        let effective_zero = match seek {
            SeekPlacement::Fast => 0.0,
            SeekPlacement::Accurate => start_secs,
        };

        let fadein_start = request.fade_in.map(|_| round4(effective_zero));
        let fadeout_start = request
            .fade_out
            .map(|length| round4(effective_zero + output_secs - length));

        if request.fade_in.into_iter().chain(request.fade_out).any(|f| f > output_secs) {
            log::warn!("Fade length exceeds the {output_secs}s output; fades will overlap the whole clip");
        }

        Ok(Self {
            seek,
            start_secs,
            duration_secs,
            output_secs,
            explicit_duration: request.end.is_explicit(),
            effective_zero,
            fadein_start,
            fadeout_start,
        })
    }

    /// Duration option value, present only for an explicit duration or end.
    ///
    /// Under fast seek `-t` is an input option and limits the source read to
    /// the selected range; the `loop` filter then produces the full span.
    /// Under accurate seek it is an output option and bounds the output span.
    #[must_use]
    pub fn duration_arg(&self) -> Option<String> {
        let secs = match self.seek {
            SeekPlacement::Fast => self.duration_secs,
            SeekPlacement::Accurate => self.output_secs,
        };
        self.explicit_duration.then(|| format!("{secs:.4}"))
    }

    /// Input arguments ordered per the seek placement.
    #[must_use]
    pub fn input_args(&self, input: &Path) -> Vec<String> {
        let input = input.to_string_lossy().into_owned();
        let mut trim = vec!["-ss".to_string(), format_decimal(self.start_secs)];
        if let Some(duration) = self.duration_arg() {
            trim.push("-t".to_string());
            trim.push(duration);
        }

        let input_opt = ["-i".to_string(), input];
        match self.seek {
            SeekPlacement::Fast => trim.into_iter().chain(input_opt).collect(),
            SeekPlacement::Accurate => input_opt.into_iter().chain(trim).collect(),
        }
    }
}
