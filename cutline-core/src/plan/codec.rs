// ============================================================================
// cutline-core/src/plan/codec.rs
// ============================================================================
//
// CODEC SELECTION: Encoder Blocks and Rate Control
//
// One closed enum per supported encoder. The block is chosen by an exhaustive
// match on (CodecFamily, HwAccel), so adding a family or an accelerator forces
// every combination to be decided here.
//
// KEY COMPONENTS:
// - CodecBlock: Encoder plus quality settings
// - color_tag_args: BT.709 full-range tagging for the color-range fix
// - platform_cap_args: Bitrate ceiling, GOP and pixel format for uploads

use crate::bitrate::{TierSelection, gop_length};
use crate::config::{CompilerConfig, MAX_QUALITY_VALUE};
use crate::error::{CoreError, CoreResult};
use crate::request::{CodecFamily, ColorRangeFix, HwAccel, TranscodeRequest};

/// Encoder selection with its rate-control values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecBlock {
    X264 { crf: u8, preset: String },
    X265 { crf: u8, preset: String },
    Nvenc { qp: u8, preset: String },
    Gif,
    Apng,
    WebP,
}

/// Scales a CRF/QP value for garbage mode: multiply, round, clamp to 51.
#[must_use]
pub fn garbage_quality(base: u8, multiplier: f64) -> u8 {
    let scaled = (f64::from(base) * multiplier).round();
    scaled.clamp(0.0, f64::from(MAX_QUALITY_VALUE)) as u8
}

impl CodecBlock {
    /// Picks the encoder for a request.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRequest` for a codec family that has no
    /// CUDA encoder.
    pub fn select(request: &TranscodeRequest, config: &CompilerConfig) -> CoreResult<Self> {
        let quality = |base: u8| {
            if request.garbage {
                garbage_quality(base, config.garbage_multiplier)
            } else {
                base
            }
        };
        let preset = config.encoder_preset.clone();

        let block = match (request.codec, request.hw_accel) {
            (CodecFamily::H264, HwAccel::None) => CodecBlock::X264 {
                crf: quality(config.x264_crf),
                preset,
            },
            (CodecFamily::H264, HwAccel::Cuda) => CodecBlock::Nvenc {
                qp: quality(config.nvenc_qp),
                preset,
            },
            (CodecFamily::H265, HwAccel::None) => CodecBlock::X265 {
                crf: quality(config.x265_crf),
                preset,
            },
            (CodecFamily::Gif, HwAccel::None) => CodecBlock::Gif,
            (CodecFamily::Apng, HwAccel::None) => CodecBlock::Apng,
            (CodecFamily::WebP, HwAccel::None) => CodecBlock::WebP,
            (family @ (CodecFamily::H265 | CodecFamily::Gif | CodecFamily::Apng | CodecFamily::WebP), HwAccel::Cuda) => {
                return Err(CoreError::InvalidRequest(format!(
                    "{family} output has no CUDA encoder"
                )));
            }
        };
        Ok(block)
    }

    /// Encoder name passed to `-c:v`.
    #[must_use]
    pub fn encoder(&self) -> &'static str {
        match self {
            CodecBlock::X264 { .. } => "libx264",
            CodecBlock::X265 { .. } => "libx265",
            CodecBlock::Nvenc { .. } => "h264_nvenc",
            CodecBlock::Gif => "gif",
            CodecBlock::Apng => "apng",
            CodecBlock::WebP => "libwebp",
        }
    }

    /// Whether this is a video (rather than animated image) encoder.
    #[must_use]
    pub fn is_video(&self) -> bool {
        matches!(
            self,
            CodecBlock::X264 { .. } | CodecBlock::X265 { .. } | CodecBlock::Nvenc { .. }
        )
    }

    /// `-c:v <encoder>` followed by the encoder's options.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["-c:v".to_string(), self.encoder().to_string()];
        let rest: Vec<String> = match self {
            CodecBlock::X264 { crf, preset } => vec![
                "-crf".into(),
                crf.to_string(),
                "-preset".into(),
                preset.clone(),
                "-tune".into(),
                "film".into(),
                "-profile:v".into(),
                "high".into(),
                "-level".into(),
                "5.2".into(),
            ],
            CodecBlock::X265 { crf, preset } => vec![
                "-crf".into(),
                crf.to_string(),
                "-preset".into(),
                preset.clone(),
                "-profile:v".into(),
                "main".into(),
                "-tag:v".into(),
                "hvc1".into(),
            ],
            CodecBlock::Nvenc { qp, preset } => vec![
                "-preset".into(),
                preset.clone(),
                "-profile:v".into(),
                "high".into(),
                "-level".into(),
                "5.2".into(),
                "-rc".into(),
                "constqp".into(),
                "-qp".into(),
                qp.to_string(),
                "-strict_gop".into(),
                "1".into(),
                "-rc-lookahead".into(),
                "48".into(),
                "-spatial-aq".into(),
                "1".into(),
                "-temporal-aq".into(),
                "1".into(),
                "-aq-strength".into(),
                "8".into(),
            ],
            CodecBlock::Gif => vec!["-f".into(), "gif".into(), "-loop".into(), "0".into()],
            CodecBlock::Apng => vec!["-f".into(), "apng".into(), "-plays".into(), "0".into()],
            CodecBlock::WebP => vec!["-f".into(), "webp".into(), "-loop".into(), "0".into()],
        };
        args.extend(rest);
        args
    }
}

/// BT.709 full-range tags, emitted for video encoders when the color-range fix is active.
#[must_use]
pub fn color_tag_args(block: &CodecBlock, fix: ColorRangeFix) -> Vec<String> {
    if fix == ColorRangeFix::None || !block.is_video() {
        return Vec::new();
    }
    [
        "-colorspace",
        "bt709",
        "-color_range",
        "jpeg",
        "-color_primaries",
        "bt709",
        "-color_trc",
        "bt709",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Upload-friendly rate control for the platform-capped target.
#[must_use]
pub fn platform_cap_args(tier: &TierSelection, source_fps: f64) -> Vec<String> {
    vec![
        "-movflags".to_string(),
        "faststart".to_string(),
        "-maxrate".to_string(),
        tier.maxrate.to_string(),
        "-bufsize".to_string(),
        tier.bufsize.to_string(),
        "-g".to_string(),
        gop_length(source_fps).to_string(),
        "-bf".to_string(),
        "2".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitrate::Bitrate;
    use crate::plan::test_support::options;
    use crate::request::{OutputTarget, TranscodeOptions};

    fn select(options: TranscodeOptions) -> CoreResult<CodecBlock> {
        CodecBlock::select(&options.resolve().unwrap(), &CompilerConfig::default())
    }

    #[test]
    fn default_target_is_x264() {
        let block = select(options()).unwrap();
        assert_eq!(
            block.args().join(" "),
            "-c:v libx264 -crf 20 -preset slow -tune film -profile:v high -level 5.2"
        );
    }

    #[test]
    fn x265_is_tagged_for_apple_players() {
        let block = select(TranscodeOptions {
            target: OutputTarget::X265,
            ..options()
        })
        .unwrap();
        assert_eq!(
            block.args().join(" "),
            "-c:v libx265 -crf 24 -preset slow -profile:v main -tag:v hvc1"
        );
    }

    #[test]
    fn gpu_target_uses_constant_qp_nvenc() {
        let block = select(TranscodeOptions {
            target: OutputTarget::Gpu,
            ..options()
        })
        .unwrap();
        assert_eq!(block, CodecBlock::Nvenc { qp: 21, preset: "slow".to_string() });
        let args = block.args();
        assert_eq!(args[..2], ["-c:v", "h264_nvenc"]);
        assert!(args.windows(2).any(|w| w == ["-rc", "constqp"]));
        assert!(args.windows(2).any(|w| w == ["-aq-strength", "8"]));
    }

    #[test]
    fn image_formats_set_muxer_and_looping() {
        let args = |target| {
            select(TranscodeOptions { target, ..options() })
                .unwrap()
                .args()
                .join(" ")
        };
        assert_eq!(args(OutputTarget::Gif), "-c:v gif -f gif -loop 0");
        assert_eq!(args(OutputTarget::Apng), "-c:v apng -f apng -plays 0");
        assert_eq!(args(OutputTarget::WebP), "-c:v libwebp -f webp -loop 0");
    }

    #[test]
    fn garbage_mode_scales_and_clamps_quality() {
        assert_eq!(garbage_quality(20, 1.75), 35);
        assert_eq!(garbage_quality(21, 1.75), 37);
        assert_eq!(garbage_quality(40, 1.75), MAX_QUALITY_VALUE);

        let block = select(TranscodeOptions {
            garbage: true,
            target: OutputTarget::X265,
            ..options()
        })
        .unwrap();
        assert_eq!(block, CodecBlock::X265 { crf: 42, preset: "slow".to_string() });
    }

    #[test]
    fn color_tags_only_for_video_with_fix() {
        let x264 = CodecBlock::X264 { crf: 20, preset: "slow".to_string() };
        assert!(color_tag_args(&x264, ColorRangeFix::None).is_empty());
        assert_eq!(color_tag_args(&x264, ColorRangeFix::TagOnly).len(), 8);
        assert!(color_tag_args(&CodecBlock::Gif, ColorRangeFix::TagAndRescale).is_empty());
    }

    #[test]
    fn platform_cap_carries_tier_and_gop() {
        let tier = TierSelection {
            fps_tier: 30,
            height_tier: 720,
            maxrate: Bitrate::new(5, "M"),
            bufsize: Bitrate::new(8, "M"),
        };
        assert_eq!(
            platform_cap_args(&tier, 29.97).join(" "),
            "-movflags faststart -maxrate 5M -bufsize 8M -g 15 -bf 2 -pix_fmt yuv420p"
        );
    }
}
