// ============================================================================
// cutline-core/src/plan/assemble.rs
// ============================================================================
//
// COMMAND PLAN ASSEMBLY: Ordered ffmpeg Argument Vectors
//
// Combines the timeline, filter chains and codec block into the argument
// vectors for each pass. Palette exports produce two passes: the first writes
// a palette image to an intermediate path, the second reads it as a second
// input and writes the final output.
//
// KEY COMPONENTS:
// - CommandPlan: Ordered passes plus the derived timeline and bitrate tier
// - Pass / PassKind / PassOutput: One encoder invocation
// - display_command: Shell-like rendering for logs and dry runs

use crate::bitrate::TierSelection;
use crate::config::CompilerConfig;
use crate::error::{CoreError, CoreResult};
use crate::media::MediaInfo;
use crate::plan::codec::{CodecBlock, color_tag_args, platform_cap_args};
use crate::plan::filters::{
    FilterChain, PaletteStage, audio_enabled, build_filter_chain, output_height,
};
use crate::plan::timeline::Timeline;
use crate::request::{AudioMode, HwAccel, TranscodeRequest};
use std::path::{Path, PathBuf};

/// Options placed at the front of every invocation.
pub const GLOBAL_ARGS: [&str; 3] = ["-loglevel", "warning", "-hide_banner"];

/// Decoder options for the CUDA target; frames stay in device memory.
pub const CUDA_ARGS: [&str; 4] = ["-hwaccel", "cuda", "-hwaccel_output_format", "cuda"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Single,
    PaletteGeneration,
    PaletteApplication,
}

/// Where a pass writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutput {
    /// The user's output file.
    Final(PathBuf),
    /// A temporary artifact consumed by a later pass.
    Intermediate(PathBuf),
}

impl PassOutput {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            PassOutput::Final(path) | PassOutput::Intermediate(path) => path,
        }
    }

    #[must_use]
    pub fn is_intermediate(&self) -> bool {
        matches!(self, PassOutput::Intermediate(_))
    }
}

/// One encoder invocation. `args` excludes the program name.
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    pub kind: PassKind,
    pub args: Vec<String>,
    pub output: PassOutput,
}

/// Ordered passes for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandPlan {
    pub passes: Vec<Pass>,
    pub timeline: Timeline,
    /// Bitrate tier, set for the platform-capped target only.
    pub tier: Option<TierSelection>,
}

/// Collects arguments in order; keeps assembly code flat.
#[derive(Default)]
struct ArgList(Vec<String>);

impl ArgList {
    fn push(&mut self, arg: impl Into<String>) -> &mut Self {
        self.0.push(arg.into());
        self
    }

    fn option(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.push(name).push(value)
    }

    fn extend<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(args.into_iter().map(Into::into));
        self
    }

    fn path(&mut self, path: &Path) -> &mut Self {
        self.push(path.to_string_lossy().into_owned())
    }
}

fn audio_args(request: &TranscodeRequest, config: &CompilerConfig) -> Vec<String> {
    if !audio_enabled(request) {
        return vec!["-an".to_string()];
    }
    let reencode = request.has_fades()
        || matches!(
            request.audio,
            AudioMode::Reencode | AudioMode::Volume(_) | AudioMode::Normalize
        );
    if reencode {
        vec![
            "-c:a".to_string(),
            config.audio_codec.clone(),
            "-b:a".to_string(),
            config.audio_bitrate.clone(),
        ]
    } else {
        vec!["-c:a".to_string(), "copy".to_string()]
    }
}

fn metadata_args(request: &TranscodeRequest) -> Vec<String> {
    request
        .title
        .as_ref()
        .map(|title| vec!["-metadata".to_string(), format!("title={title}")])
        .unwrap_or_default()
}

impl CommandPlan {
    /// Compiles a request into its passes.
    ///
    /// `palette` is the intermediate path for palette exports and is ignored
    /// for every other codec.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for an empty trim range, an out-of-range scale
    ///   target, a codec without a CUDA encoder, or a palette export without a
    ///   palette path
    /// - `BitrateTierNotFound` when the platform-capped target has no tier
    pub fn assemble(
        request: &TranscodeRequest,
        media: &MediaInfo,
        config: &CompilerConfig,
        palette: Option<&Path>,
    ) -> CoreResult<Self> {
        let timeline = Timeline::resolve(request, media)?;
        let codec = CodecBlock::select(request, config)?;
        if request.loop_count > 0 && request.audio != AudioMode::Mute && codec.is_video() {
            log::warn!("Looped output is written without audio");
        }

        let tier = if request.platform_cap {
            Some(
                config
                    .bitrate_table
                    .select(media.frame_rate, output_height(request, media)?)?,
            )
        } else {
            None
        };

        let passes = if request.codec.uses_palette() {
            let palette = palette.ok_or_else(|| {
                CoreError::InvalidRequest(format!(
                    "{} export needs an intermediate palette path",
                    request.codec
                ))
            })?;
            vec![
                palette_generation_pass(request, media, &timeline, config, palette)?,
                palette_application_pass(request, media, &timeline, config, &codec, palette)?,
            ]
        } else {
            vec![single_pass(request, media, &timeline, config, &codec, tier.as_ref())?]
        };

        log::debug!(
            "Assembled {} pass(es) for {} output ({:?} seek)",
            passes.len(),
            request.codec,
            timeline.seek
        );

        Ok(Self {
            passes,
            timeline,
            tier,
        })
    }

    #[must_use]
    pub fn is_multi_pass(&self) -> bool {
        self.passes.len() > 1
    }
}

fn single_pass(
    request: &TranscodeRequest,
    media: &MediaInfo,
    timeline: &Timeline,
    config: &CompilerConfig,
    codec: &CodecBlock,
    tier: Option<&TierSelection>,
) -> CoreResult<Pass> {
    let chain: FilterChain =
        build_filter_chain(request, media, timeline, config, PaletteStage::Single)?;

    let mut args = ArgList::default();
    args.extend(GLOBAL_ARGS);
    if request.hw_accel == HwAccel::Cuda {
        args.extend(CUDA_ARGS);
    }
    args.extend(timeline.input_args(&request.input))
        .extend(codec.args())
        .extend(color_tag_args(codec, request.color_range_fix));
    if let Some(tier) = tier {
        args.extend(platform_cap_args(tier, media.frame_rate));
    }
    args.extend(audio_args(request, config));
    if audio_enabled(request) {
        if let Some(audio) = chain.audio_expr() {
            args.option("-af", audio);
        }
    }
    if let Some(video) = chain.video_expr() {
        args.option("-vf", video);
    }
    args.extend(metadata_args(request))
        .extend(request.passthrough.iter().cloned())
        .push("-y")
        .path(&request.output);

    Ok(Pass {
        kind: PassKind::Single,
        args: args.0,
        output: PassOutput::Final(request.output.clone()),
    })
}

fn palette_generation_pass(
    request: &TranscodeRequest,
    media: &MediaInfo,
    timeline: &Timeline,
    config: &CompilerConfig,
    palette: &Path,
) -> CoreResult<Pass> {
    let chain = build_filter_chain(request, media, timeline, config, PaletteStage::Generate)?;

    let mut args = ArgList::default();
    args.extend(GLOBAL_ARGS)
        .extend(timeline.input_args(&request.input));
    if let Some(video) = chain.video_expr() {
        args.option("-vf", video);
    }
    args.push("-an")
        .extend(request.passthrough.iter().cloned())
        .push("-y")
        .path(palette);

    Ok(Pass {
        kind: PassKind::PaletteGeneration,
        args: args.0,
        output: PassOutput::Intermediate(palette.to_path_buf()),
    })
}

fn palette_application_pass(
    request: &TranscodeRequest,
    media: &MediaInfo,
    timeline: &Timeline,
    config: &CompilerConfig,
    codec: &CodecBlock,
    palette: &Path,
) -> CoreResult<Pass> {
    let chain = build_filter_chain(request, media, timeline, config, PaletteStage::Apply)?;

    let mut args = ArgList::default();
    args.extend(GLOBAL_ARGS)
        .extend(timeline.input_args(&request.input))
        .push("-i")
        .path(palette)
        .extend(codec.args())
        .push("-an");
    if let Some(graph) = chain.video_graph() {
        args.option("-lavfi", graph);
    }
    args.extend(metadata_args(request))
        .extend(request.passthrough.iter().cloned())
        .push("-y")
        .path(&request.output);

    Ok(Pass {
        kind: PassKind::PaletteApplication,
        args: args.0,
        output: PassOutput::Final(request.output.clone()),
    })
}

/// Renders a command line for logs, quoting arguments that contain spaces.
#[must_use]
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("\"{arg}\"")
            } else {
                arg.clone()
            }
        }))
        .collect::<Vec<_>>()
        .join(" ")
}
