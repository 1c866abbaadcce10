// ============================================================================
// cutline-core/src/processing/transcode.rs
// ============================================================================
//
// TRANSCODE ORCHESTRATION: One Request from Probe to Final Output
//
// WORKFLOW:
// 1. Probe the source once
// 2. Reserve the palette artifact for palette exports
// 3. Assemble the command plan
// 4. Stop here for dry runs; otherwise supervise every pass
//
// The request is resolved before this point, so option errors never cost a
// probe or a spawn.

use crate::config::CompilerConfig;
use crate::error::CoreResult;
use crate::external::{EncoderSpawner, MediaProber, check_dependency};
use crate::media::MediaInfo;
use crate::plan::CommandPlan;
use crate::request::TranscodeRequest;
use crate::supervisor::{PassSupervisor, SupervisorReport};
use crate::temp_files::IntermediateArtifact;
use crate::utils::format_decimal;

/// Prefix and extension of the palette image written by pass 1.
const PALETTE_PREFIX: &str = "cutline_palette";
const PALETTE_EXTENSION: &str = "png";

/// Everything known about a finished (or dry) run.
#[derive(Debug)]
pub struct TranscodeOutcome {
    pub media: MediaInfo,
    pub plan: CommandPlan,
    /// `None` for a dry run.
    pub report: Option<SupervisorReport>,
}

/// Verifies that the configured prober and encoder binaries can be launched.
///
/// # Errors
///
/// Returns `CoreError::DependencyNotFound` for the first missing binary.
pub fn check_tools(config: &CompilerConfig) -> CoreResult<()> {
    check_dependency(&config.ffprobe_path)?;
    check_dependency(&config.ffmpeg_path)?;
    Ok(())
}

/// Probes, plans and (unless `dry_run`) executes one request.
///
/// Encoder output lines are passed to `on_line` after trimming and
/// deduplication.
///
/// # Errors
///
/// Any error from probing, plan assembly or pass supervision.
pub fn transcode<S, P, F>(
    spawner: &S,
    prober: &P,
    request: &TranscodeRequest,
    config: &CompilerConfig,
    dry_run: bool,
    on_line: F,
) -> CoreResult<TranscodeOutcome>
where
    S: EncoderSpawner,
    P: MediaProber,
    F: FnMut(&str),
{
    log::info!(
        "Transcoding {} -> {} ({})",
        request.input.display(),
        request.output.display(),
        request.codec
    );

    let media = prober.probe(&request.input)?;
    log::debug!(
        "Source: {}x{} at {}fps, {}s{}",
        media.width,
        media.height,
        format_decimal(media.frame_rate),
        format_decimal(media.duration_secs),
        if media.duration_is_fallback { " (fallback)" } else { "" }
    );

    let artifact = if request.codec.uses_palette() {
        Some(IntermediateArtifact::create(
            config.temp_dir.as_deref(),
            PALETTE_PREFIX,
            PALETTE_EXTENSION,
        )?)
    } else {
        None
    };

    let plan = CommandPlan::assemble(
        request,
        &media,
        config,
        artifact.as_ref().map(IntermediateArtifact::path),
    )?;

    log::debug!(
        "Trim: start {}s, duration {}s, output {}s, {:?} seek",
        format_decimal(plan.timeline.start_secs),
        format_decimal(plan.timeline.duration_secs),
        format_decimal(plan.timeline.output_secs),
        plan.timeline.seek
    );
    if let Some(tier) = &plan.tier {
        log::debug!(
            "Bitrate tier {}fps/{}p: maxrate {}, bufsize {}",
            tier.fps_tier,
            tier.height_tier,
            tier.maxrate,
            tier.bufsize
        );
    }

    if dry_run {
        log::info!("Dry run: {} pass(es) planned, nothing executed", plan.passes.len());
        return Ok(TranscodeOutcome {
            media,
            plan,
            report: None,
        });
    }

    let supervisor = PassSupervisor::new(spawner)
        .with_program_name(config.ffmpeg_path.display().to_string());
    let report = supervisor.run(&plan, artifact, on_line)?;

    Ok(TranscodeOutcome {
        media,
        plan,
        report: Some(report),
    })
}
