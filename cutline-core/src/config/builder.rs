// ============================================================================
// cutline-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CompilerConfig
//
// This module implements the builder pattern for CompilerConfig, providing a
// fluent API that starts from the documented defaults and overrides only what
// the caller sets.

use std::path::PathBuf;

use super::{
    CompilerConfig, MotionPresets, DEFAULT_AUDIO_BITRATE, DEFAULT_AUDIO_CODEC,
    DEFAULT_ENCODER_PRESET, DEFAULT_FALLBACK_DURATION_SECS, DEFAULT_GARBAGE_MULTIPLIER,
    DEFAULT_LOUDNORM_PARAMS, DEFAULT_NVENC_QP, DEFAULT_X264_CRF, DEFAULT_X265_CRF,
};
use crate::bitrate::BitrateTable;

/// Builder for creating CompilerConfig instances.
///
/// # Examples
///
/// ```rust
/// use cutline_core::bitrate::{Bitrate, BitrateTable};
/// use cutline_core::config::CompilerConfigBuilder;
///
/// let table = BitrateTable::new().with_tier(30, 1080, Bitrate::new(6, "M"));
/// let config = CompilerConfigBuilder::new()
///     .bitrate_table(table)
///     .garbage_multiplier(2.0)
///     .build();
/// assert_eq!(config.garbage_multiplier, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct CompilerConfigBuilder {
    config: CompilerConfig,
}

impl Default for CompilerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerConfigBuilder {
    /// Creates a builder holding the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CompilerConfig {
                ffmpeg_path: PathBuf::from("ffmpeg"),
                ffprobe_path: PathBuf::from("ffprobe"),
                temp_dir: None,
                x264_crf: DEFAULT_X264_CRF,
                x265_crf: DEFAULT_X265_CRF,
                nvenc_qp: DEFAULT_NVENC_QP,
                encoder_preset: DEFAULT_ENCODER_PRESET.to_string(),
                garbage_multiplier: DEFAULT_GARBAGE_MULTIPLIER,
                audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
                audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
                loudnorm_params: DEFAULT_LOUDNORM_PARAMS.to_string(),
                fallback_duration_secs: DEFAULT_FALLBACK_DURATION_SECS,
                bitrate_table: BitrateTable::youtube(),
                motion_presets: MotionPresets::default(),
            },
        }
    }

    #[must_use]
    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffmpeg_path = path.into();
        self
    }

    #[must_use]
    pub fn ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffprobe_path = path.into();
        self
    }

    /// Sets the directory that receives the palette artifact.
    #[must_use]
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn x264_crf(mut self, crf: u8) -> Self {
        self.config.x264_crf = crf;
        self
    }

    #[must_use]
    pub fn x265_crf(mut self, crf: u8) -> Self {
        self.config.x265_crf = crf;
        self
    }

    #[must_use]
    pub fn nvenc_qp(mut self, qp: u8) -> Self {
        self.config.nvenc_qp = qp;
        self
    }

    #[must_use]
    pub fn encoder_preset(mut self, preset: &str) -> Self {
        self.config.encoder_preset = preset.to_string();
        self
    }

    #[must_use]
    pub fn garbage_multiplier(mut self, multiplier: f64) -> Self {
        self.config.garbage_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn audio_bitrate(mut self, bitrate: &str) -> Self {
        self.config.audio_bitrate = bitrate.to_string();
        self
    }

    #[must_use]
    pub fn fallback_duration_secs(mut self, secs: f64) -> Self {
        self.config.fallback_duration_secs = secs;
        self
    }

    #[must_use]
    pub fn bitrate_table(mut self, table: BitrateTable) -> Self {
        self.config.bitrate_table = table;
        self
    }

    #[must_use]
    pub fn motion_presets(mut self, presets: MotionPresets) -> Self {
        self.config.motion_presets = presets;
        self
    }

    /// Builds the CompilerConfig instance.
    #[must_use]
    pub fn build(self) -> CompilerConfig {
        self.config
    }
}
