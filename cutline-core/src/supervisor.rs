// ============================================================================
// cutline-core/src/supervisor.rs
// ============================================================================
//
// PASS SUPERVISOR: Sequential Execution of a Command Plan
//
// Runs each pass of a CommandPlan through an EncoderSpawner, one process at a
// time. Output lines are cleaned before reaching the caller, the exit code
// decides whether the next pass starts, and the palette artifact of a
// two-pass export is released once the run is over.
//
// Pass lifecycle:
//
//   NotStarted -> Running -> Succeeded
//                         -> Failed
//
// Terminal states are final. There are no retries.

use crate::error::{CoreError, CoreResult, SIGNAL_EXIT_CODE};
use crate::external::{EncoderProcess, EncoderSpawner};
use crate::plan::{CommandPlan, Pass, PassKind, display_command};
use crate::temp_files::IntermediateArtifact;
use crate::utils::format_duration;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl PassState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, PassState::Succeeded | PassState::Failed)
    }

    fn advance(&mut self, pass: usize, next: PassState) {
        debug_assert!(!self.is_terminal(), "pass {pass} left terminal state {self:?}");
        log::debug!("Pass {pass}: {self:?} -> {next:?}");
        *self = next;
    }
}

/// Trims lines, drops empty ones and collapses consecutive duplicates.
#[derive(Debug, Default)]
pub struct LineDeduplicator {
    last: Option<String>,
}

impl LineDeduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cleaned line when it should be forwarded.
    pub fn accept<'l>(&mut self, line: &'l str) -> Option<&'l str> {
        let line = line.trim();
        if line.is_empty() || self.last.as_deref() == Some(line) {
            return None;
        }
        self.last = Some(line.to_string());
        Some(line)
    }
}

/// Outcome of one pass whose process ran to termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassResult {
    /// 1-based position in the plan.
    pub index: usize,
    pub kind: PassKind,
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl PassResult {
    fn into_failure(self) -> CoreError {
        CoreError::EncoderProcessFailure {
            pass: self.index,
            exit_code: self.exit_code.unwrap_or(SIGNAL_EXIT_CODE),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Default)]
pub struct SupervisorReport {
    /// One entry per pass, all succeeded.
    pub passes: Vec<PassResult>,
    /// Failure to remove the palette artifact. Never changes the outcome.
    pub cleanup_error: Option<CoreError>,
}

impl SupervisorReport {
    #[must_use]
    pub fn total_elapsed(&self) -> Duration {
        self.passes.iter().map(|p| p.elapsed).sum()
    }
}

/// Closes the artifact, logging and returning a removal failure.
fn release_artifact(artifact: IntermediateArtifact) -> Option<CoreError> {
    let path = artifact.path().display().to_string();
    match artifact.close() {
        Ok(()) => {
            log::debug!("Removed intermediate artifact {path}");
            None
        }
        Err(e) => {
            log::warn!("{e}");
            Some(e)
        }
    }
}

/// Executes command plans with a given spawner.
pub struct PassSupervisor<'a, S: EncoderSpawner> {
    spawner: &'a S,
    program: String,
}

impl<'a, S: EncoderSpawner> PassSupervisor<'a, S> {
    #[must_use]
    pub fn new(spawner: &'a S) -> Self {
        Self {
            spawner,
            program: "ffmpeg".to_string(),
        }
    }

    /// Program name used when logging command lines.
    #[must_use]
    pub fn with_program_name(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Runs every pass in order, stopping at the first failure.
    ///
    /// `artifact` is the palette guard for two-pass exports. If pass 1 fails
    /// the guard is dropped, which removes the file. Once pass 1 has
    /// succeeded the guard is closed explicitly after the last pass
    /// finishes, whatever its outcome.
    ///
    /// # Errors
    ///
    /// - `EncoderProcessFailure` with the 1-based pass index and the exit
    ///   code (`-1` for termination by signal)
    /// - `CommandStart` / `CommandWait` when the process cannot be managed
    pub fn run<F>(
        &self,
        plan: &CommandPlan,
        artifact: Option<IntermediateArtifact>,
        mut on_line: F,
    ) -> CoreResult<SupervisorReport>
    where
        F: FnMut(&str),
    {
        let mut report = SupervisorReport::default();
        let mut artifact = artifact;

        for (position, pass) in plan.passes.iter().enumerate() {
            let index = position + 1;
            let failure = match self.run_pass(index, pass, &mut on_line) {
                Ok(result) if result.success => {
                    report.passes.push(result);
                    continue;
                }
                Ok(result) => result.into_failure(),
                Err(e) => e,
            };

            if index > 1 {
                if let Some(artifact) = artifact.take() {
                    release_artifact(artifact);
                }
            }
            return Err(failure);
        }

        if let Some(artifact) = artifact.take() {
            report.cleanup_error = release_artifact(artifact);
        }

        log::debug!(
            "All {} pass(es) finished in {}",
            report.passes.len(),
            format_duration(report.total_elapsed().as_secs_f64())
        );
        Ok(report)
    }

    fn run_pass<F>(&self, index: usize, pass: &Pass, on_line: &mut F) -> CoreResult<PassResult>
    where
        F: FnMut(&str),
    {
        let mut state = PassState::NotStarted;
        log::debug!(
            "Pass {index} ({:?}): {}",
            pass.kind,
            display_command(&self.program, &pass.args)
        );

        let started = Instant::now();
        let mut process = match self.spawner.spawn(&pass.args) {
            Ok(process) => process,
            Err(e) => {
                state.advance(index, PassState::Failed);
                return Err(e);
            }
        };
        state.advance(index, PassState::Running);

        let mut lines = LineDeduplicator::new();
        let exit_code = process
            .handle_lines(|line| {
                if let Some(line) = lines.accept(line) {
                    on_line(line);
                }
                Ok(())
            })
            .and_then(|()| process.wait());

        let exit_code = match exit_code {
            Ok(code) => code,
            Err(e) => {
                state.advance(index, PassState::Failed);
                return Err(e);
            }
        };
        let elapsed = started.elapsed();
        let success = exit_code == Some(0);

        if success {
            state.advance(index, PassState::Succeeded);
            log::info!(
                "Pass {index} completed in {}",
                format_duration(elapsed.as_secs_f64())
            );
        } else {
            state.advance(index, PassState::Failed);
            log::error!(
                "Pass {index} failed with exit code {} after {}",
                exit_code.unwrap_or(SIGNAL_EXIT_CODE),
                format_duration(elapsed.as_secs_f64())
            );
        }

        Ok(PassResult {
            index,
            kind: pass.kind,
            success,
            exit_code,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::external::mocks::{MockEncoderProcess, MockEncoderSpawner};
    use crate::plan::test_support::{media, options};
    use crate::request::{OutputTarget, TranscodeOptions};
    use std::path::{Path, PathBuf};

    fn single_plan() -> CommandPlan {
        CommandPlan::assemble(
            &options().resolve().unwrap(),
            &media(1280, 720, 30.0, 10.0),
            &CompilerConfig::default(),
            None,
        )
        .unwrap()
    }

    fn gif_plan(dir: &Path) -> (CommandPlan, IntermediateArtifact) {
        let artifact = IntermediateArtifact::create(Some(dir), "palette", "png").unwrap();
        let request = TranscodeOptions {
            target: OutputTarget::Gif,
            output: dir.join("out.gif"),
            ..options()
        }
        .resolve()
        .unwrap();
        let plan = CommandPlan::assemble(
            &request,
            &media(640, 360, 25.0, 4.0),
            &CompilerConfig::default(),
            Some(artifact.path()),
        )
        .unwrap();
        (plan, artifact)
    }

    #[test]
    fn deduplicator_collapses_consecutive_repeats() {
        let mut dedup = LineDeduplicator::new();
        let forwarded: Vec<&str> = ["a", "a", "", "  b ", "b", "   ", "a"]
            .into_iter()
            .filter_map(|line| dedup.accept(line))
            .collect();
        assert_eq!(forwarded, ["a", "b", "a"]);
    }

    #[test]
    fn single_pass_forwards_cleaned_lines() {
        let spawner = MockEncoderSpawner::new();
        spawner.add_success_expectation("libx264", &["frame=1", "frame=1", "", " done "], false);

        let mut seen = Vec::new();
        let report = PassSupervisor::new(&spawner)
            .run(&single_plan(), None, |line| seen.push(line.to_string()))
            .unwrap();

        assert_eq!(seen, ["frame=1", "done"]);
        assert_eq!(report.passes.len(), 1);
        assert_eq!(report.passes[0].index, 1);
        assert!(report.passes[0].success);
        assert_eq!(report.passes[0].exit_code, Some(0));
        assert!(report.cleanup_error.is_none());
    }

    #[test]
    fn encoder_exit_code_is_propagated() {
        let spawner = MockEncoderSpawner::new();
        spawner.add_exit_error_expectation("libx264", &["Conversion failed!"], 187);

        let err = PassSupervisor::new(&spawner)
            .run(&single_plan(), None, |_| {})
            .unwrap_err();
        assert!(matches!(err, CoreError::EncoderProcessFailure { pass: 1, exit_code: 187 }));
        assert_eq!(err.exit_code(), 187);
    }

    #[test]
    fn signal_termination_reports_minus_one() {
        let spawner = MockEncoderSpawner::new();
        spawner.add_expectation(
            "libx264",
            Ok(MockEncoderProcess {
                lines: Vec::new(),
                exit_code: None,
            }),
            false,
        );

        let err = PassSupervisor::new(&spawner)
            .run(&single_plan(), None, |_| {})
            .unwrap_err();
        assert_eq!(err.exit_code(), SIGNAL_EXIT_CODE);
    }

    #[test]
    fn spawn_failure_is_returned() {
        let spawner = MockEncoderSpawner::new();
        spawner.add_spawn_error_expectation("libx264", CoreError::DependencyNotFound("ffmpeg".to_string()));

        let err = PassSupervisor::new(&spawner)
            .run(&single_plan(), None, |_| {})
            .unwrap_err();
        assert!(matches!(err, CoreError::DependencyNotFound(_)));
    }

    #[test]
    fn palette_export_runs_both_passes_and_removes_palette() {
        let dir = tempfile::tempdir().unwrap();
        let (plan, artifact) = gif_plan(dir.path());
        let palette: PathBuf = artifact.path().to_path_buf();

        let spawner = MockEncoderSpawner::new();
        spawner.add_success_expectation("palettegen", &[], true);
        spawner.add_success_expectation("paletteuse", &[], true);

        let report = PassSupervisor::new(&spawner)
            .run(&plan, Some(artifact), |_| {})
            .unwrap();

        let calls = spawner.received_calls();
        assert_eq!(calls.len(), 2);
        let palette_arg = palette.to_string_lossy().into_owned();
        assert_eq!(calls[0].last(), Some(&palette_arg));
        assert!(calls[1].contains(&palette_arg));

        assert_eq!(report.passes.len(), 2);
        assert_eq!(report.passes[1].kind, PassKind::PaletteApplication);
        assert!(report.cleanup_error.is_none());
        assert!(!palette.exists());
        assert!(dir.path().join("out.gif").exists());
    }

    #[test]
    fn first_pass_failure_skips_second_and_removes_palette() {
        let dir = tempfile::tempdir().unwrap();
        let (plan, artifact) = gif_plan(dir.path());
        let palette = artifact.path().to_path_buf();

        let spawner = MockEncoderSpawner::new();
        spawner.add_exit_error_expectation("palettegen", &["Invalid argument"], 1);

        let err = PassSupervisor::new(&spawner)
            .run(&plan, Some(artifact), |_| {})
            .unwrap_err();

        assert!(matches!(err, CoreError::EncoderProcessFailure { pass: 1, exit_code: 1 }));
        assert_eq!(spawner.received_calls().len(), 1);
        assert!(!palette.exists());
    }

    #[test]
    fn second_pass_failure_still_removes_palette() {
        let dir = tempfile::tempdir().unwrap();
        let (plan, artifact) = gif_plan(dir.path());
        let palette = artifact.path().to_path_buf();

        let spawner = MockEncoderSpawner::new();
        spawner.add_success_expectation("palettegen", &[], true);
        spawner.add_exit_error_expectation("paletteuse", &[], 69);

        let err = PassSupervisor::new(&spawner)
            .run(&plan, Some(artifact), |_| {})
            .unwrap_err();

        assert!(matches!(err, CoreError::EncoderProcessFailure { pass: 2, exit_code: 69 }));
        assert!(!palette.exists());
    }

    #[test]
    fn cleanup_failure_does_not_change_the_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let (plan, artifact) = gif_plan(dir.path());
        std::fs::remove_file(artifact.path()).unwrap();

        let spawner = MockEncoderSpawner::new();
        spawner.add_success_expectation("palettegen", &[], false);
        spawner.add_success_expectation("paletteuse", &[], false);

        let report = PassSupervisor::new(&spawner)
            .run(&plan, Some(artifact), |_| {})
            .unwrap();

        assert_eq!(report.passes.len(), 2);
        assert!(matches!(
            report.cleanup_error,
            Some(CoreError::IntermediateArtifactCleanup { .. })
        ));
    }
}
