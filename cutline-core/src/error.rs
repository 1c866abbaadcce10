// ============================================================================
// cutline-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for cutline-core
//
// This module defines the error type shared by every component of the
// library, from timestamp parsing through pass supervision. It uses thiserror
// for the Display and Error implementations.
//
// KEY COMPONENTS:
// - CoreError: Enum of every failure the compiler and supervisor can report
// - CoreResult: Type alias for Result with CoreError
// - Helper functions for building process-related errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code reported when the encoder was terminated without an exit code.
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// Errors produced while compiling or executing a transcode request.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Request resolution ----
    /// A time expression matched neither the bare-seconds form nor any clock format.
    #[error("Unrecognized time expression: '{input}'")]
    TimestampParse { input: String },

    #[error("Invalid crop specification: {0}")]
    InvalidCropSpecification(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ---- Probing ----
    #[error("Probe failed: {0}")]
    ProbeFailure(String),

    // ---- Plan assembly ----
    /// The actual value exceeds every configured ceiling of the bitrate table.
    #[error("No bitrate tier covers {dimension} {value}")]
    BitrateTierNotFound { dimension: &'static str, value: f64 },

    // ---- Execution ----
    #[error("Required external command not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Encoder pass {pass} failed with exit code {exit_code}")]
    EncoderProcessFailure { pass: usize, exit_code: i32 },

    /// Non-fatal: reported by the supervisor, never returned as the outcome.
    #[error("Failed to remove intermediate artifact {}: {source}", path.display())]
    IntermediateArtifactCleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // ---- Wrapped ----
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// Process exit code a binary should terminate with for this error.
    ///
    /// Encoder failures propagate the encoder's own code; everything else is 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::EncoderProcessFailure { exit_code, .. } => *exit_code,
            _ => 1,
        }
    }
}

/// Result type used throughout cutline-core.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a `CommandStart` error for a command that could not be launched.
pub fn command_start_error(cmd_name: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandStart(cmd_name.into(), source)
}

/// Builds a `CommandWait` error for a command whose exit could not be collected.
pub fn command_wait_error(cmd_name: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandWait(cmd_name.into(), source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoder_failure_propagates_its_exit_code() {
        let err = CoreError::EncoderProcessFailure { pass: 2, exit_code: 187 };
        assert_eq!(err.exit_code(), 187);
        assert_eq!(err.to_string(), "Encoder pass 2 failed with exit code 187");
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = CoreError::TimestampParse { input: "later".to_string() };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("later"));
    }
}
