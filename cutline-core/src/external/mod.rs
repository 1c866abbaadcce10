// ============================================================================
// cutline-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates every interaction with the external command-line
// tools. Both boundaries are expressed as traits so the compiler and the pass
// supervisor can be exercised without real binaries.
//
// KEY COMPONENTS:
// - EncoderSpawner / EncoderProcess: running one encoder pass
// - MediaProber: reading source properties
// - Dependency checking
// - Mock implementations for unit tests

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Traits and the ffmpeg-sidecar implementation for running encoder passes
pub mod ffmpeg_executor;

/// Trait and command implementation for probing source media
pub mod ffprobe_executor;

#[cfg(test)]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{EncoderProcess, EncoderSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{FfprobeCommandProber, MediaProber};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external command is available and executable.
///
/// Runs `<cmd> -version` with output discarded. Only failure to launch counts;
/// the exit status of the version query is ignored.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` - the command does not exist
/// * `CoreError::CommandStart` - the command exists but could not be started
pub fn check_dependency(cmd: &Path) -> CoreResult<()> {
    let cmd_name = cmd.display().to_string();

    let result = Command::new(cmd)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(CoreError::CommandStart(cmd_name, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_reported_as_dependency_not_found() {
        let err = check_dependency(Path::new("cutline-definitely-not-installed")).unwrap_err();
        assert!(matches!(err, CoreError::DependencyNotFound(name) if name == "cutline-definitely-not-installed"));
    }
}
