// ============================================================================
// cutline-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: Encoder Process Management and Abstraction
//
// This module provides the abstractions the pass supervisor uses to run one
// encoder pass: a spawner that starts ffmpeg with a fully assembled argument
// vector, and a process handle that yields the combined output as lines and
// reports the exit code.
//
// KEY COMPONENTS:
// - EncoderProcess: Trait representing an active encoder process
// - EncoderSpawner: Trait for starting encoder processes
// - SidecarSpawner / SidecarProcess: Implementation using ffmpeg-sidecar

use crate::error::{CoreResult, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::io;
use std::path::PathBuf;

// --- Encoder Execution Abstraction ---

/// Trait representing an active encoder process instance.
pub trait EncoderProcess {
    /// Feeds every output line, in order, to `handler` until the stream closes.
    fn handle_lines<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(&str) -> CoreResult<()>;

    /// Waits for the process to exit. `None` means it was terminated by a signal.
    fn wait(&mut self) -> CoreResult<Option<i32>>;
}

/// Trait representing something that can start an [`EncoderProcess`].
pub trait EncoderSpawner {
    type Process: EncoderProcess;

    /// Starts the encoder with `args` (program name excluded).
    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Extracts the text line carried by an event, if any.
///
/// ffmpeg writes diagnostics and progress to stderr; ffmpeg-sidecar splits
/// that stream into log, error and progress events.
fn event_line(event: FfmpegEvent) -> Option<String> {
    match event {
        FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) => Some(line),
        FfmpegEvent::Progress(progress) => Some(progress.raw_log_message),
        _ => None,
    }
}

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `EncoderProcess`.
pub struct SidecarProcess(FfmpegChild);

impl EncoderProcess for SidecarProcess {
    fn handle_lines<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(&str) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to read ffmpeg output: {e}");
            command_wait_error("ffmpeg (sidecar - get iter)", io::Error::other(e.to_string()))
        })?;
        for line in iterator.filter_map(event_line) {
            handler(&line)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<Option<i32>> {
        self.0
            .wait()
            .map(|status| status.code())
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `EncoderSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone)]
pub struct SidecarSpawner {
    ffmpeg_path: PathBuf,
}

impl SidecarSpawner {
    #[must_use]
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

impl Default for SidecarSpawner {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl EncoderSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        let mut cmd = FfmpegCommand::new_with_path(&self.ffmpeg_path);
        cmd.args(args);
        log::debug!("Spawning encoder: {cmd:?}");

        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error(self.ffmpeg_path.display().to_string(), e))
    }
}
