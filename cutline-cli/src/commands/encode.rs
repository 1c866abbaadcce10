//! Implementation of the encode command.
//!
//! Maps parsed arguments to `TranscodeOptions`, resolves them before anything
//! external is touched, then hands the request to cutline-core.

use crate::cli::Cli;
use crate::output;

use cutline_core::config::CompilerConfigBuilder;
use cutline_core::external::{FfprobeCommandProber, SidecarSpawner};
use cutline_core::request::{AudioMode, ColorAdjust, OutputTarget, TranscodeOptions};
use cutline_core::{CoreError, CoreResult, check_tools, transcode};

use log::{debug, info};
use std::time::Instant;

/// The output target picked by the (mutually exclusive) target flags.
#[must_use]
pub fn output_target(args: &Cli) -> OutputTarget {
    [
        (args.youtube, OutputTarget::PlatformCapped),
        (args.nvidia, OutputTarget::Gpu),
        (args.x264, OutputTarget::X264),
        (args.x265, OutputTarget::X265),
        (args.gif, OutputTarget::Gif),
        (args.apng, OutputTarget::Apng),
        (args.webp, OutputTarget::WebP),
    ]
    .into_iter()
    .find_map(|(set, target)| set.then_some(target))
    .unwrap_or_default()
}

/// The audio mode picked by the (mutually exclusive) audio flags.
#[must_use]
pub fn audio_mode(args: &Cli) -> AudioMode {
    if args.mute {
        AudioMode::Mute
    } else if args.audio_force {
        AudioMode::Reencode
    } else if let Some(factor) = args.volume {
        AudioMode::Volume(factor)
    } else if args.normalize {
        AudioMode::Normalize
    } else {
        AudioMode::Copy
    }
}

/// Raw transcode options from the command line.
#[must_use]
pub fn build_options(args: &Cli) -> TranscodeOptions {
    TranscodeOptions {
        input: args.input.clone(),
        output: args.output.clone(),
        start: Some(args.start.clone()),
        duration: args.duration.clone(),
        end: args.to.clone(),
        fade: args.fade.clone(),
        fade_in: args.fade_in.clone(),
        fade_out: args.fade_out.clone(),
        crop: args.crop.clone(),
        width: args.width.clone(),
        height: args.height.clone(),
        framerate: args.framerate,
        loop_count: args.loop_count,
        slowmo_fps: args.slowmo,
        slowmo_preset: Some(args.slowmo_preset.clone()),
        color: ColorAdjust {
            brightness: args.brightness,
            contrast: args.contrast,
            saturation: args.saturation,
        },
        sharpen: args.sharpen,
        fixrgb: args.fixrgb,
        audio: audio_mode(args),
        title: args.title.clone(),
        target: output_target(args),
        garbage: args.garbage,
        fast_seek: args.fast_seek,
        palette_colors: args.palette_colors,
        dither: args.dither.clone(),
        stats_mode: args.stats_mode.clone(),
        transparency: args.transparency,
        passthrough: args.ffmpeg_args.clone(),
    }
}

/// Runs the encode command.
///
/// # Errors
///
/// Request resolution errors come back before the input is checked or any
/// tool is launched. Encoder failures carry the encoder's exit code.
pub fn run_encode(args: &Cli) -> CoreResult<()> {
    let started = Instant::now();

    let request = build_options(args).resolve()?;
    debug!("Resolved request: {request:?}");

    if !request.input.is_file() {
        return Err(CoreError::InvalidRequest(format!(
            "input file '{}' does not exist",
            request.input.display()
        )));
    }

    let config = CompilerConfigBuilder::new()
        .ffmpeg_path(&args.ffmpeg_path)
        .ffprobe_path(&args.ffprobe_path)
        .build();
    check_tools(&config)?;

    let spawner = SidecarSpawner::new(&config.ffmpeg_path);
    let prober = FfprobeCommandProber::from_config(&config);
    let outcome = transcode(
        &spawner,
        &prober,
        &request,
        &config,
        args.dry_run,
        output::print_encoder_line,
    )?;

    if args.dry_run {
        output::print_dry_run(&config.ffmpeg_path, &outcome.plan);
        return Ok(());
    }

    info!("Finished {}", request.output.display());
    output::print_summary(&outcome, &request.output, started.elapsed());
    Ok(())
}
