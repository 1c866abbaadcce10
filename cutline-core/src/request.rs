// ============================================================================
// cutline-core/src/request.rs
// ============================================================================
//
// TRANSCODE REQUEST: Resolved Editing Parameters
//
// This module defines the immutable TranscodeRequest consumed by the plan
// assembler, together with TranscodeOptions, the raw string form collected by
// a front end. Resolution normalizes every time expression, parses the crop
// rectangle and scale target, and rejects contradictory combinations before
// anything is probed or spawned.
//
// KEY COMPONENTS:
// - TranscodeOptions: Raw user input (strings as typed)
// - TranscodeRequest: Fully resolved request
// - Closed enums for every selector (end policy, audio mode, codec family...)

use crate::error::{CoreError, CoreResult};
use crate::timestamp::parse_timestamp;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ============================================================================
// SELECTORS
// ============================================================================

/// How the end of the trimmed range is determined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndPolicy {
    /// Explicit duration in seconds.
    Duration(f64),
    /// Explicit end position in seconds on the source timeline.
    EndPosition(f64),
    /// Run until the end of the source.
    ToEndOfSource,
}

impl EndPolicy {
    /// Whether the duration option must be emitted on the encoder command line.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        !matches!(self, EndPolicy::ToEndOfSource)
    }
}

/// Crop rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl FromStr for CropRect {
    type Err = CoreError;

    /// Parses `W:H:X:Y`; anything other than four integer components is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(CoreError::InvalidCropSpecification(format!(
                "expected W:H:X:Y, got {} component(s) in '{s}'",
                parts.len()
            )));
        }

        let mut values = [0u32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                CoreError::InvalidCropSpecification(format!(
                    "component '{part}' in '{s}' is not a non-negative integer"
                ))
            })?;
        }

        let [width, height, x, y] = values;
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidCropSpecification(format!(
                "crop '{s}' has an empty area"
            )));
        }
        Ok(CropRect { width, height, x, y })
    }
}

/// Which output dimension a scale target constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleAxis {
    Width,
    Height,
}

impl ScaleAxis {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScaleAxis::Width => "width",
            ScaleAxis::Height => "height",
        }
    }
}

/// Requested size along the scale axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DimensionSpec {
    /// Pixels.
    Absolute(u32),
    /// Multiplier of the pre-scale dimension (`0.5x`).
    Relative(f64),
}

impl FromStr for DimensionSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || CoreError::InvalidRequest(format!("invalid scale dimension '{s}'"));

        if let Some(factor) = trimmed
            .strip_suffix('x')
            .or_else(|| trimmed.strip_suffix('X'))
            .or_else(|| trimmed.strip_suffix('×'))
        {
            let factor: f64 = factor.trim().parse().map_err(|_| invalid())?;
            if !factor.is_finite() || factor <= 0.0 {
                return Err(invalid());
            }
            return Ok(DimensionSpec::Relative(factor));
        }

        match trimmed.parse::<u32>() {
            Ok(pixels) if pixels > 0 => Ok(DimensionSpec::Absolute(pixels)),
            _ => Err(invalid()),
        }
    }
}

/// Scale request: exactly one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTarget {
    pub axis: ScaleAxis,
    pub size: DimensionSpec,
}

/// Motion-estimation quality for slow-motion interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionPreset {
    Fast,
    #[default]
    Sensible,
    Slow,
}

impl FromStr for MotionPreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(MotionPreset::Fast),
            "sensible" => Ok(MotionPreset::Sensible),
            "slow" => Ok(MotionPreset::Slow),
            _ => Err(CoreError::InvalidRequest(format!(
                "unknown slow-motion preset '{s}' (expected fast, sensible or slow)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowMotion {
    pub fps: f64,
    pub preset: MotionPreset,
}

/// Optional `eq` adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorAdjust {
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
    pub saturation: Option<f64>,
}

impl ColorAdjust {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brightness.is_none() && self.contrast.is_none() && self.saturation.is_none()
    }
}

/// Color-range correction for sources with mis-tagged limited range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorRangeFix {
    #[default]
    None,
    TagOnly,
    TagAndRescale,
}

impl ColorRangeFix {
    /// Maps the numeric level used on the command line (0, 1 or 2).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRequest` for any other level.
    pub fn from_level(level: u8) -> CoreResult<Self> {
        match level {
            0 => Ok(ColorRangeFix::None),
            1 => Ok(ColorRangeFix::TagOnly),
            2 => Ok(ColorRangeFix::TagAndRescale),
            other => Err(CoreError::InvalidRequest(format!(
                "color-range fix level must be 0, 1 or 2, got {other}"
            ))),
        }
    }
}

/// Audio handling. The variants are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AudioMode {
    #[default]
    Copy,
    Mute,
    Reencode,
    Volume(f64),
    Normalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HwAccel {
    #[default]
    None,
    Cuda,
}

/// Output codec family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecFamily {
    #[default]
    H264,
    H265,
    Gif,
    Apng,
    WebP,
}

impl CodecFamily {
    /// Palette exports run as two passes (palettegen, then paletteuse).
    #[must_use]
    pub fn uses_palette(self) -> bool {
        matches!(self, CodecFamily::Gif)
    }

    /// Animated image formats carry no audio.
    #[must_use]
    pub fn is_image(self) -> bool {
        matches!(self, CodecFamily::Gif | CodecFamily::Apng | CodecFamily::WebP)
    }
}

impl fmt::Display for CodecFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodecFamily::H264 => "H.264",
            CodecFamily::H265 => "H.265",
            CodecFamily::Gif => "GIF",
            CodecFamily::Apng => "APNG",
            CodecFamily::WebP => "WebP",
        };
        f.write_str(name)
    }
}

/// The single output target picked on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// H.264 with platform bitrate caps.
    PlatformCapped,
    /// H.264 through NVENC with CUDA decoding and scaling.
    Gpu,
    #[default]
    X264,
    X265,
    Gif,
    Apng,
    WebP,
}

impl OutputTarget {
    #[must_use]
    pub fn codec(self) -> CodecFamily {
        match self {
            OutputTarget::PlatformCapped | OutputTarget::Gpu | OutputTarget::X264 => CodecFamily::H264,
            OutputTarget::X265 => CodecFamily::H265,
            OutputTarget::Gif => CodecFamily::Gif,
            OutputTarget::Apng => CodecFamily::Apng,
            OutputTarget::WebP => CodecFamily::WebP,
        }
    }

    #[must_use]
    pub fn hw_accel(self) -> HwAccel {
        match self {
            OutputTarget::Gpu => HwAccel::Cuda,
            _ => HwAccel::None,
        }
    }
}

/// Dither algorithm for `paletteuse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherAlgorithm {
    Bayer,
    Heckbert,
    #[default]
    FloydSteinberg,
    Sierra2,
    Sierra2_4a,
    None,
}

impl DitherAlgorithm {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DitherAlgorithm::Bayer => "bayer",
            DitherAlgorithm::Heckbert => "heckbert",
            DitherAlgorithm::FloydSteinberg => "floyd_steinberg",
            DitherAlgorithm::Sierra2 => "sierra2",
            DitherAlgorithm::Sierra2_4a => "sierra2_4a",
            DitherAlgorithm::None => "none",
        }
    }
}

impl FromStr for DitherAlgorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            DitherAlgorithm::Bayer,
            DitherAlgorithm::Heckbert,
            DitherAlgorithm::FloydSteinberg,
            DitherAlgorithm::Sierra2,
            DitherAlgorithm::Sierra2_4a,
            DitherAlgorithm::None,
        ]
        .into_iter()
        .find(|d| d.as_str() == s)
        .ok_or_else(|| CoreError::InvalidRequest(format!("unknown dither algorithm '{s}'")))
    }
}

/// Statistics mode for `palettegen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsMode {
    Full,
    #[default]
    Diff,
    Single,
}

impl StatsMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StatsMode::Full => "full",
            StatsMode::Diff => "diff",
            StatsMode::Single => "single",
        }
    }
}

impl FromStr for StatsMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(StatsMode::Full),
            "diff" => Ok(StatsMode::Diff),
            "single" => Ok(StatsMode::Single),
            _ => Err(CoreError::InvalidRequest(format!("unknown palette stats mode '{s}'"))),
        }
    }
}

/// Smallest and largest palette sizes accepted by `palettegen`.
pub const MIN_PALETTE_COLORS: u16 = 2;
pub const MAX_PALETTE_COLORS: u16 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteOptions {
    pub max_colors: u16,
    pub dither: DitherAlgorithm,
    pub stats_mode: StatsMode,
    pub transparency: bool,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            max_colors: MAX_PALETTE_COLORS,
            dither: DitherAlgorithm::default(),
            stats_mode: StatsMode::default(),
            transparency: false,
        }
    }
}

// ============================================================================
// REQUEST
// ============================================================================

/// Fully resolved editing request. Built by [`TranscodeOptions::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub start_secs: f64,
    pub end: EndPolicy,
    pub fade_in: Option<f64>,
    pub fade_out: Option<f64>,
    pub crop: Option<CropRect>,
    pub scale: Option<ScaleTarget>,
    pub framerate: Option<f64>,
    pub loop_count: u32,
    pub slow_motion: Option<SlowMotion>,
    pub color: ColorAdjust,
    pub sharpen: bool,
    pub color_range_fix: ColorRangeFix,
    pub audio: AudioMode,
    pub title: Option<String>,
    pub hw_accel: HwAccel,
    pub codec: CodecFamily,
    pub platform_cap: bool,
    pub garbage: bool,
    pub fast_seek: bool,
    pub palette: PaletteOptions,
    pub passthrough: Vec<String>,
}

impl TranscodeRequest {
    /// Whether any fade is requested on either stream.
    #[must_use]
    pub fn has_fades(&self) -> bool {
        self.fade_in.is_some() || self.fade_out.is_some()
    }
}

/// Raw options as typed by the user. Every time expression is still a string.
#[derive(Debug, Clone, Default)]
pub struct TranscodeOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub start: Option<String>,
    pub duration: Option<String>,
    pub end: Option<String>,
    /// Sets both fade-in and fade-out; takes precedence over the separate values.
    pub fade: Option<String>,
    pub fade_in: Option<String>,
    pub fade_out: Option<String>,
    pub crop: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub framerate: Option<f64>,
    pub loop_count: u32,
    pub slowmo_fps: Option<f64>,
    pub slowmo_preset: Option<String>,
    pub color: ColorAdjust,
    pub sharpen: bool,
    pub fixrgb: u8,
    pub audio: AudioMode,
    pub title: Option<String>,
    pub target: OutputTarget,
    pub garbage: bool,
    pub fast_seek: bool,
    pub palette_colors: Option<u16>,
    pub dither: Option<String>,
    pub stats_mode: Option<String>,
    pub transparency: bool,
    pub passthrough: Option<String>,
}

fn positive_rate(value: Option<f64>, what: &str) -> CoreResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(CoreError::InvalidRequest(format!(
            "{what} must be a positive number, got {v}"
        ))),
        other => Ok(other),
    }
}

/// Parses a fade length; zero means no fade.
fn fade_length(raw: Option<&str>, what: &str) -> CoreResult<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let secs = parse_timestamp(raw)?;
    if secs < 0.0 {
        return Err(CoreError::InvalidRequest(format!("{what} must not be negative")));
    }
    Ok((secs > 0.0).then_some(secs))
}

impl TranscodeOptions {
    /// Resolves raw options into a [`TranscodeRequest`].
    ///
    /// # Errors
    ///
    /// - `TimestampParse` for an unrecognized time expression
    /// - `InvalidCropSpecification` for a crop without exactly four components
    /// - `InvalidRequest` for contradictory or out-of-range options
    pub fn resolve(&self) -> CoreResult<TranscodeRequest> {
        let start_secs = parse_timestamp(self.start.as_deref().unwrap_or("0"))?;
        if start_secs < 0.0 {
            return Err(CoreError::InvalidRequest(format!(
                "start time must not be negative, got {start_secs}"
            )));
        }

        let end = match (&self.duration, &self.end) {
            (Some(_), Some(_)) => {
                return Err(CoreError::InvalidRequest(
                    "duration and end position are mutually exclusive".to_string(),
                ));
            }
            (Some(duration), None) => EndPolicy::Duration(parse_timestamp(duration)?),
            (None, Some(end)) => EndPolicy::EndPosition(parse_timestamp(end)?),
            (None, None) => EndPolicy::ToEndOfSource,
        };

        let (fade_in, fade_out) = match &self.fade {
            Some(fade) => {
                let both = fade_length(Some(fade.as_str()), "fade")?;
                (both, both)
            }
            None => (
                fade_length(self.fade_in.as_deref(), "fade-in")?,
                fade_length(self.fade_out.as_deref(), "fade-out")?,
            ),
        };

        let crop = self.crop.as_deref().map(str::parse::<CropRect>).transpose()?;

        let scale = match (&self.width, &self.height) {
            (Some(_), Some(_)) => {
                return Err(CoreError::InvalidRequest(
                    "width and height targets are mutually exclusive".to_string(),
                ));
            }
            (Some(width), None) => Some(ScaleTarget {
                axis: ScaleAxis::Width,
                size: width.parse()?,
            }),
            (None, Some(height)) => Some(ScaleTarget {
                axis: ScaleAxis::Height,
                size: height.parse()?,
            }),
            (None, None) => None,
        };

        let framerate = positive_rate(self.framerate, "frame rate")?;
        let slow_motion = positive_rate(self.slowmo_fps, "slow-motion frame rate")?
            .map(|fps| -> CoreResult<SlowMotion> {
                let preset = match &self.slowmo_preset {
                    Some(preset) => preset.parse()?,
                    None => MotionPreset::default(),
                };
                Ok(SlowMotion { fps, preset })
            })
            .transpose()?;

        if let AudioMode::Volume(factor) = self.audio {
            if !factor.is_finite() || factor < 0.0 {
                return Err(CoreError::InvalidRequest(format!(
                    "volume factor must be a non-negative number, got {factor}"
                )));
            }
        }

        if self.loop_count > 0
            && matches!(
                self.audio,
                AudioMode::Reencode | AudioMode::Volume(_) | AudioMode::Normalize
            )
        {
            return Err(CoreError::InvalidRequest(
                "looped output has no audio; drop the audio options or mute".to_string(),
            ));
        }

        let max_colors = self.palette_colors.unwrap_or(MAX_PALETTE_COLORS);
        if !(MIN_PALETTE_COLORS..=MAX_PALETTE_COLORS).contains(&max_colors) {
            return Err(CoreError::InvalidRequest(format!(
                "palette size must be between {MIN_PALETTE_COLORS} and {MAX_PALETTE_COLORS}, got {max_colors}"
            )));
        }
        let palette = PaletteOptions {
            max_colors,
            dither: self.dither.as_deref().map(str::parse::<DitherAlgorithm>).transpose()?.unwrap_or_default(),
            stats_mode: self.stats_mode.as_deref().map(str::parse::<StatsMode>).transpose()?.unwrap_or_default(),
            transparency: self.transparency,
        };

        let passthrough = self
            .passthrough
            .as_deref()
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Ok(TranscodeRequest {
            input: self.input.clone(),
            output: self.output.clone(),
            start_secs,
            end,
            fade_in,
            fade_out,
            crop,
            scale,
            framerate,
            loop_count: self.loop_count,
            slow_motion,
            color: self.color,
            sharpen: self.sharpen,
            color_range_fix: ColorRangeFix::from_level(self.fixrgb)?,
            audio: self.audio,
            title: self.title.clone(),
            hw_accel: self.target.hw_accel(),
            codec: self.target.codec(),
            platform_cap: self.target == OutputTarget::PlatformCapped,
            garbage: self.garbage,
            fast_seek: self.fast_seek,
            palette,
            passthrough,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> TranscodeOptions {
        TranscodeOptions {
            input: PathBuf::from("in.mkv"),
            output: PathBuf::from("out.mp4"),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_resolve_to_full_copy() {
        let request = options().resolve().unwrap();
        assert_eq!(request.start_secs, 0.0);
        assert_eq!(request.end, EndPolicy::ToEndOfSource);
        assert_eq!(request.codec, CodecFamily::H264);
        assert_eq!(request.hw_accel, HwAccel::None);
        assert_eq!(request.audio, AudioMode::Copy);
        assert!(!request.has_fades());
        assert_eq!(request.palette, PaletteOptions::default());
    }

    #[test]
    fn combined_fade_overrides_separate_fades() {
        let request = TranscodeOptions {
            fade: Some("1".to_string()),
            fade_in: Some("3".to_string()),
            ..options()
        }
        .resolve()
        .unwrap();
        assert_eq!(request.fade_in, Some(1.0));
        assert_eq!(request.fade_out, Some(1.0));
    }

    #[test]
    fn end_position_and_duration_are_exclusive() {
        let err = TranscodeOptions {
            duration: Some("5".to_string()),
            end: Some("10".to_string()),
            ..options()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidRequest(_)));

        let request = TranscodeOptions {
            end: Some("0:10".to_string()),
            ..options()
        }
        .resolve()
        .unwrap();
        assert_eq!(request.end, EndPolicy::EndPosition(10.0));
    }

    #[test]
    fn loops_reject_audio_processing() {
        for audio in [AudioMode::Volume(1.5), AudioMode::Normalize, AudioMode::Reencode] {
            let err = TranscodeOptions {
                loop_count: 2,
                audio,
                ..options()
            }
            .resolve()
            .unwrap_err();
            assert!(matches!(err, CoreError::InvalidRequest(_)));
        }

        let request = TranscodeOptions {
            loop_count: 2,
            ..options()
        }
        .resolve()
        .unwrap();
        assert_eq!(request.audio, AudioMode::Copy);
    }

    #[test]
    fn bad_time_expression_is_a_parse_failure() {
        let err = TranscodeOptions {
            start: Some("soon".to_string()),
            ..options()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, CoreError::TimestampParse { .. }));
    }

    #[test]
    fn crop_requires_four_components() {
        assert_eq!(
            "640:360:10:20".parse::<CropRect>().unwrap(),
            CropRect { width: 640, height: 360, x: 10, y: 20 }
        );
        for bad in ["640:360", "640:360:10", "640:360:10:20:5", "a:b:c:d", "0:360:0:0"] {
            assert!(
                matches!(bad.parse::<CropRect>(), Err(CoreError::InvalidCropSpecification(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn dimension_spec_accepts_relative_suffixes() {
        assert_eq!("720".parse::<DimensionSpec>().unwrap(), DimensionSpec::Absolute(720));
        assert_eq!("0.5x".parse::<DimensionSpec>().unwrap(), DimensionSpec::Relative(0.5));
        assert_eq!("2X".parse::<DimensionSpec>().unwrap(), DimensionSpec::Relative(2.0));
        assert_eq!("1.5×".parse::<DimensionSpec>().unwrap(), DimensionSpec::Relative(1.5));
        assert!("0".parse::<DimensionSpec>().is_err());
        assert!("-2x".parse::<DimensionSpec>().is_err());
        assert!("wide".parse::<DimensionSpec>().is_err());
    }

    #[test]
    fn width_and_height_are_exclusive() {
        let err = TranscodeOptions {
            width: Some("640".to_string()),
            height: Some("360".to_string()),
            ..options()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidRequest(_)));
    }

    #[test]
    fn gpu_target_selects_cuda_h264() {
        let request = TranscodeOptions {
            target: OutputTarget::Gpu,
            ..options()
        }
        .resolve()
        .unwrap();
        assert_eq!(request.codec, CodecFamily::H264);
        assert_eq!(request.hw_accel, HwAccel::Cuda);
        assert!(!request.platform_cap);
    }

    #[test]
    fn palette_options_are_validated() {
        let request = TranscodeOptions {
            target: OutputTarget::Gif,
            palette_colors: Some(64),
            dither: Some("sierra2_4a".to_string()),
            stats_mode: Some("full".to_string()),
            ..options()
        }
        .resolve()
        .unwrap();
        assert_eq!(request.palette.max_colors, 64);
        assert_eq!(request.palette.dither, DitherAlgorithm::Sierra2_4a);
        assert_eq!(request.palette.stats_mode, StatsMode::Full);

        let err = TranscodeOptions {
            palette_colors: Some(300),
            ..options()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidRequest(_)));
    }

    #[test]
    fn passthrough_is_split_on_whitespace() {
        let request = TranscodeOptions {
            passthrough: Some("-map 0  -threads 4".to_string()),
            ..options()
        }
        .resolve()
        .unwrap();
        assert_eq!(request.passthrough, vec!["-map", "0", "-threads", "4"]);
    }

    #[test]
    fn fixrgb_levels_map_to_modes() {
        assert_eq!(ColorRangeFix::from_level(0).unwrap(), ColorRangeFix::None);
        assert_eq!(ColorRangeFix::from_level(1).unwrap(), ColorRangeFix::TagOnly);
        assert_eq!(ColorRangeFix::from_level(2).unwrap(), ColorRangeFix::TagAndRescale);
        assert!(ColorRangeFix::from_level(3).is_err());
    }
}
