//! Configuration structures and constants for the cutline-core library.
//!
//! Every constant table the compiler consults (codec quality values, the
//! platform bitrate table, motion-estimation presets, audio defaults) lives in
//! [`CompilerConfig`]. It is built once at startup and passed by reference;
//! nothing in the library keeps global mutable state.

mod builder;

use crate::bitrate::BitrateTable;
use crate::request::MotionPreset;
use std::path::PathBuf;

pub use builder::CompilerConfigBuilder;

// Default constants

/// Default CRF for libx264. Lower values produce higher quality but larger files.
pub const DEFAULT_X264_CRF: u8 = 20;

/// Default CRF for libx265.
pub const DEFAULT_X265_CRF: u8 = 24;

/// Default constant QP for h264_nvenc.
pub const DEFAULT_NVENC_QP: u8 = 21;

/// Default encoder preset shared by libx264, libx265 and h264_nvenc.
pub const DEFAULT_ENCODER_PRESET: &str = "slow";

/// Factor applied to CRF/QP in garbage (size-reduction) mode.
pub const DEFAULT_GARBAGE_MULTIPLIER: f64 = 1.75;

/// Upper bound of the CRF/QP scale for the supported encoders.
pub const MAX_QUALITY_VALUE: u8 = 51;

/// Audio codec and bitrate used whenever audio has to be re-encoded.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
pub const DEFAULT_AUDIO_BITRATE: &str = "384k";

/// EBU R128 targets for the loudnorm filter.
pub const DEFAULT_LOUDNORM_PARAMS: &str = "I=-16:TP=-1.5:LRA=11";

/// Duration substituted when the prober reports none. Not authoritative.
pub const DEFAULT_FALLBACK_DURATION_SECS: f64 = 1000.0;

/// Motion-estimation method and search range for `minterpolate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionSearch {
    pub method: String,
    pub search_range: u32,
}

impl MotionSearch {
    fn new(method: &str, search_range: u32) -> Self {
        Self {
            method: method.to_string(),
            search_range,
        }
    }
}

/// The three slow-motion quality presets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionPresets {
    pub fast: MotionSearch,
    pub sensible: MotionSearch,
    pub slow: MotionSearch,
}

impl MotionPresets {
    #[must_use]
    pub fn get(&self, preset: MotionPreset) -> &MotionSearch {
        match preset {
            MotionPreset::Fast => &self.fast,
            MotionPreset::Sensible => &self.sensible,
            MotionPreset::Slow => &self.slow,
        }
    }
}

impl Default for MotionPresets {
    fn default() -> Self {
        Self {
            fast: MotionSearch::new("dia", 16),
            sensible: MotionSearch::new("epzs", 32),
            slow: MotionSearch::new("umh", 64),
        }
    }
}

/// Main configuration structure for the cutline-core library.
///
/// Created by the consumer of the library (e.g., cutline-cli), usually
/// through [`CompilerConfigBuilder`], and passed by reference to
/// [`crate::transcode`].
///
/// # Examples
///
/// ```rust
/// use cutline_core::config::CompilerConfigBuilder;
///
/// let config = CompilerConfigBuilder::new()
///     .ffmpeg_path("/opt/ffmpeg/bin/ffmpeg")
///     .x264_crf(18)
///     .build();
/// assert_eq!(config.x264_crf, 18);
/// ```
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// ffmpeg binary invoked for every pass
    pub ffmpeg_path: PathBuf,

    /// ffprobe binary used to read source metadata
    pub ffprobe_path: PathBuf,

    /// Directory for the palette artifact (system temp dir when unset)
    pub temp_dir: Option<PathBuf>,

    pub x264_crf: u8,
    pub x265_crf: u8,
    pub nvenc_qp: u8,
    pub encoder_preset: String,

    /// Multiplier applied to CRF/QP in garbage mode
    pub garbage_multiplier: f64,

    pub audio_codec: String,
    pub audio_bitrate: String,
    pub loudnorm_params: String,

    /// Duration used when the source reports none
    pub fallback_duration_secs: f64,

    /// Platform maximum-bitrate table for capped exports
    pub bitrate_table: BitrateTable,

    pub motion_presets: MotionPresets,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfigBuilder::new().build()
    }
}
