// ============================================================================
// cutline-core/src/plan/filters.rs
// ============================================================================
//
// FILTER GRAPH BUILDER: Ordered Video and Audio Filter Chains
//
// Video fragments are appended in a fixed order; changing it changes the
// output:
//
//   1. fps retiming        6. eq adjustments
//   2. color range         7. sharpen
//   3. crop                8. loop
//   4. scale               9. fades
//   5. minterpolate       10. palettegen / paletteuse
//
// Audio fragments: volume, loudnorm, fade-in, fade-out.
//
// Under CUDA decoding frames stay in device memory. Crop, range rescale,
// minterpolate, eq, unsharp, fades and palettegen need host frames, so one
// hwdownload/hwupload_cuda pair spans all of them; scale becomes scale_cuda
// only when it sits outside that span.

use crate::config::CompilerConfig;
use crate::error::{CoreError, CoreResult};
use crate::media::MediaInfo;
use crate::plan::timeline::Timeline;
use crate::request::{
    AudioMode, ColorRangeFix, DimensionSpec, HwAccel, PaletteOptions, ScaleAxis, ScaleTarget,
    SlowMotion, TranscodeRequest,
};
use crate::utils::{ceil_even, format_decimal};

/// Flags for the software scaler.
pub const SCALE_FLAGS: &str = "spline+accurate_rnd+full_chroma_int+full_chroma_inp";

/// Largest segment the `loop` filter can hold, in frames.
pub const MAX_LOOP_FRAMES: u32 = 32767;

/// Host memory transfer tokens used around host-only fragments under CUDA.
pub const HW_DOWNLOAD: &str = "hwdownload";
pub const HW_DOWNLOAD_FORMAT: &str = "format=nv12";
pub const HW_UPLOAD: &str = "hwupload_cuda";

/// Which pass of a palette export the chain is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteStage {
    /// Not a palette export.
    Single,
    /// Pass 1: ends in `palettegen`.
    Generate,
    /// Pass 2: feeds `paletteuse` together with the palette input.
    Apply,
}

/// Ordered filter fragments for one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    pub video: Vec<String>,
    pub audio: Vec<String>,
    /// `paletteuse` fragment, joined with the palette input by [`FilterChain::video_graph`].
    pub palette_use: Option<String>,
}

fn join(fragments: &[String]) -> Option<String> {
    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(","))
    }
}

impl FilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a video fragment; empty fragments are ignored.
    pub fn add_video(&mut self, fragment: impl Into<String>) -> &mut Self {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.video.push(fragment);
        }
        self
    }

    /// Adds an audio fragment; empty fragments are ignored.
    pub fn add_audio(&mut self, fragment: impl Into<String>) -> &mut Self {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.audio.push(fragment);
        }
        self
    }

    /// Comma-joined video chain, `None` when empty.
    #[must_use]
    pub fn video_expr(&self) -> Option<String> {
        join(&self.video)
    }

    /// Comma-joined audio chain, `None` when empty.
    #[must_use]
    pub fn audio_expr(&self) -> Option<String> {
        join(&self.audio)
    }

    /// Filter graph for `-lavfi` on the palette application pass.
    ///
    /// Input 0 is the source and input 1 the palette image. Without a
    /// `paletteuse` fragment this is the plain video chain.
    #[must_use]
    pub fn video_graph(&self) -> Option<String> {
        let Some(palette_use) = &self.palette_use else {
            return self.video_expr();
        };
        Some(match self.video_expr() {
            Some(chain) => format!("{chain}[x];[x][1:v]{palette_use}"),
            None => format!("[0:v][1:v]{palette_use}"),
        })
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Frame size entering the scale fragment: the crop if any, else the source.
#[must_use]
pub fn pre_scale_size(request: &TranscodeRequest, media: &MediaInfo) -> (u32, u32) {
    request
        .crop
        .map_or((media.width, media.height), |crop| (crop.width, crop.height))
}

/// Largest scaled dimension accepted, in pixels.
pub const MAX_SCALE_DIMENSION: u32 = 16384;

/// Even pixel size along the target's axis.
///
/// # Errors
///
/// Returns [`CoreError::InvalidRequest`] when the size exceeds
/// [`MAX_SCALE_DIMENSION`].
pub fn scale_dimension(target: &ScaleTarget, base: (u32, u32)) -> CoreResult<u32> {
    let base_dim = match target.axis {
        ScaleAxis::Width => base.0,
        ScaleAxis::Height => base.1,
    };
    let raw = match target.size {
        DimensionSpec::Absolute(pixels) => f64::from(pixels),
        DimensionSpec::Relative(factor) => (f64::from(base_dim) * factor).trunc(),
    };
    if raw > f64::from(MAX_SCALE_DIMENSION) {
        return Err(CoreError::InvalidRequest(format!(
            "scaled {} of {} exceeds the {MAX_SCALE_DIMENSION} pixel limit",
            target.axis.as_str(),
            format_decimal(raw)
        )));
    }
    Ok(ceil_even((raw as u32).max(1)))
}

/// Height of the encoded frames, used for bitrate tier lookup.
///
/// # Errors
///
/// Fails when the scale target is out of range, see [`scale_dimension`].
pub fn output_height(request: &TranscodeRequest, media: &MediaInfo) -> CoreResult<u32> {
    let (width, height) = pre_scale_size(request, media);
    let Some(target) = &request.scale else {
        return Ok(height);
    };
    let scaled = scale_dimension(target, (width, height))?;
    Ok(match target.axis {
        ScaleAxis::Height => scaled,
        ScaleAxis::Width => {
            let derived = f64::from(scaled) * f64::from(height) / f64::from(width.max(1));
            ceil_even(derived.round() as u32)
        }
    })
}

fn scale_fragment(target: &ScaleTarget, base: (u32, u32), on_device: bool) -> CoreResult<String> {
    let size = scale_dimension(target, base)?;
    let (w, h) = match target.axis {
        ScaleAxis::Width => (size.to_string(), "-2".to_string()),
        ScaleAxis::Height => ("-2".to_string(), size.to_string()),
    };
    Ok(if on_device {
        format!("scale_cuda={w}:{h}")
    } else {
        format!("scale={w}:{h}:flags={SCALE_FLAGS}")
    })
}

// ============================================================================
// FRAME RATE
// ============================================================================

/// Slow-motion settings when interpolation actually raises the frame rate.
fn effective_slow_motion(request: &TranscodeRequest, media: &MediaInfo) -> Option<SlowMotion> {
    let slow_motion = request.slow_motion?;
    let incoming = request.framerate.unwrap_or(media.frame_rate);
    if slow_motion.fps <= incoming {
        log::warn!(
            "Slow-motion target {}fps does not exceed {}fps; skipping interpolation",
            format_decimal(slow_motion.fps),
            format_decimal(incoming)
        );
        return None;
    }
    Some(slow_motion)
}

/// Frame rate of the frames reaching the loop fragment.
fn chain_frame_rate(request: &TranscodeRequest, media: &MediaInfo) -> f64 {
    effective_slow_motion(request, media)
        .map(|s| s.fps)
        .or(request.framerate)
        .unwrap_or(media.frame_rate)
}

// ============================================================================
// CHAIN CONSTRUCTION
// ============================================================================

/// One video fragment and whether it can run on CUDA frames.
#[derive(Debug, Clone)]
enum VideoStep {
    /// Works on device and host frames alike.
    Any(String),
    /// Needs frames in host memory.
    Host(String),
    /// Resolved to `scale_cuda` or the software scaler by position.
    Scale(ScaleTarget),
}

fn fade_steps(request: &TranscodeRequest, timeline: &Timeline) -> impl Iterator<Item = VideoStep> {
    let fade_in = request
        .fade_in
        .zip(timeline.fadein_start)
        .map(|(length, start)| {
            format!("fade=t=in:st={}:d={}", format_decimal(start), format_decimal(length))
        });
    let fade_out = request
        .fade_out
        .zip(timeline.fadeout_start)
        .map(|(length, start)| {
            format!("fade=t=out:st={}:d={}", format_decimal(start), format_decimal(length))
        });
    fade_in.into_iter().chain(fade_out).map(VideoStep::Host)
}

/// Appends the video steps in order.
///
/// Under CUDA one download/upload pair spans every host-only step. A scale
/// outside that span runs as `scale_cuda`, one inside it uses the software
/// scaler.
fn push_video_steps(
    chain: &mut FilterChain,
    steps: Vec<VideoStep>,
    request: &TranscodeRequest,
    media: &MediaInfo,
) -> CoreResult<()> {
    let is_host = |step: &VideoStep| matches!(step, VideoStep::Host(_));
    let host_span = if request.hw_accel == HwAccel::Cuda {
        steps
            .iter()
            .position(is_host)
            .zip(steps.iter().rposition(is_host))
    } else {
        None
    };

    for (index, step) in steps.into_iter().enumerate() {
        let on_device = match host_span {
            Some((first, last)) => index < first || index > last,
            None => request.hw_accel == HwAccel::Cuda,
        };
        if host_span.is_some_and(|(first, _)| first == index) {
            chain.add_video(HW_DOWNLOAD).add_video(HW_DOWNLOAD_FORMAT);
        }
        match step {
            VideoStep::Any(fragment) | VideoStep::Host(fragment) => {
                chain.add_video(fragment);
            }
            VideoStep::Scale(target) => {
                let base = pre_scale_size(request, media);
                chain.add_video(scale_fragment(&target, base, on_device)?);
            }
        }
        if host_span.is_some_and(|(_, last)| last == index) {
            chain.add_video(HW_UPLOAD);
        }
    }
    Ok(())
}

fn palettegen_fragment(palette: &PaletteOptions) -> String {
    format!(
        "palettegen=stats_mode={}:reserve_transparent={}:max_colors={}",
        palette.stats_mode.as_str(),
        u8::from(palette.transparency),
        palette.max_colors
    )
}

fn paletteuse_fragment(palette: &PaletteOptions) -> String {
    let mut fragment = format!(
        "paletteuse=diff_mode=rectangle:bayer_scale=0:dither={}",
        palette.dither.as_str()
    );
    if palette.transparency {
        fragment.push_str(":alpha_threshold=128");
    }
    fragment
}

/// Whether an audio stream is written at all.
///
/// Looped output has no audio: the `loop` filter repeats video frames only.
#[must_use]
pub fn audio_enabled(request: &TranscodeRequest) -> bool {
    request.audio != AudioMode::Mute && !request.codec.is_image() && request.loop_count == 0
}

fn add_audio_fragments(
    chain: &mut FilterChain,
    request: &TranscodeRequest,
    timeline: &Timeline,
    config: &CompilerConfig,
) {
    if !audio_enabled(request) {
        return;
    }

    match request.audio {
        AudioMode::Volume(factor) => {
            chain.add_audio(format!("volume={}", format_decimal(factor)));
        }
        AudioMode::Normalize => {
            chain.add_audio(format!("loudnorm={}", config.loudnorm_params));
        }
        AudioMode::Copy | AudioMode::Mute | AudioMode::Reencode => {}
    }

    if let (Some(length), Some(start)) = (request.fade_in, timeline.fadein_start) {
        chain.add_audio(format!(
            "afade=t=in:st={}:d={}:curve=ihsin",
            format_decimal(start),
            format_decimal(length)
        ));
    }
    if let (Some(length), Some(start)) = (request.fade_out, timeline.fadeout_start) {
        chain.add_audio(format!(
            "afade=t=out:st={}:d={}:curve=ihsin",
            format_decimal(start),
            format_decimal(length)
        ));
    }
}

/// Builds the filter chains for one pass.
///
/// # Errors
///
/// Fails when the scale target is out of range, see [`scale_dimension`].
pub fn build_filter_chain(
    request: &TranscodeRequest,
    media: &MediaInfo,
    timeline: &Timeline,
    config: &CompilerConfig,
    stage: PaletteStage,
) -> CoreResult<FilterChain> {
    let mut chain = FilterChain::new();
    let mut steps = Vec::new();

    // 1. frame-rate retiming
    if let Some(fps) = request.framerate {
        steps.push(VideoStep::Any(format!("fps=fps={}", format_decimal(fps))));
    }

    // 2. color range
    match request.color_range_fix {
        ColorRangeFix::None => {}
        ColorRangeFix::TagOnly => {
            steps.push(VideoStep::Any("setparams=range=pc".to_string()));
        }
        ColorRangeFix::TagAndRescale => {
            steps.push(VideoStep::Host("scale=in_range=tv:out_range=pc".to_string()));
        }
    }

    // 3. crop
    if let Some(crop) = request.crop {
        steps.push(VideoStep::Host(format!(
            "crop={}:{}:{}:{}",
            crop.width, crop.height, crop.x, crop.y
        )));
    }

    // 4. scale
    if let Some(target) = request.scale {
        steps.push(VideoStep::Scale(target));
    }

    // 5. motion interpolation
    if let Some(slow_motion) = effective_slow_motion(request, media) {
        let search = config.motion_presets.get(slow_motion.preset);
        steps.push(VideoStep::Host(format!(
            "minterpolate=fps={}:mi_mode=mci:mc_mode=aobmc:me_mode=bidir:me={}:search_param={}:vsbmc=1",
            format_decimal(slow_motion.fps),
            search.method,
            search.search_range
        )));
    }

    // 6. eq
    if !request.color.is_empty() {
        let params: Vec<String> = [
            ("brightness", request.color.brightness),
            ("contrast", request.color.contrast),
            ("saturation", request.color.saturation),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("{key}={}", format_decimal(v))))
        .collect();
        steps.push(VideoStep::Host(format!("eq={}", params.join(":"))));
    }

    // 7. sharpen
    if request.sharpen {
        steps.push(VideoStep::Host("unsharp=5:5:1.0".to_string()));
    }

    // 8. loop
    if request.loop_count > 0 {
        let fps = chain_frame_rate(request, media);
        let size = (timeline.duration_secs * fps).ceil().min(f64::from(MAX_LOOP_FRAMES)) as u32;
        let start = (timeline.effective_zero * fps).round() as u64;
        steps.push(VideoStep::Any(format!(
            "loop=loop={}:size={}:start={}",
            request.loop_count, size, start
        )));
    }

    // 9. fades
    steps.extend(fade_steps(request, timeline));

    // 10. palette
    match stage {
        PaletteStage::Single => {}
        PaletteStage::Generate => {
            steps.push(VideoStep::Host(palettegen_fragment(&request.palette)));
        }
        PaletteStage::Apply => {
            chain.palette_use = Some(paletteuse_fragment(&request.palette));
        }
    }

    push_video_steps(&mut chain, steps, request, media)?;

    if stage != PaletteStage::Generate {
        add_audio_fragments(&mut chain, request, timeline, config);
    }

    Ok(chain)
}
