//! Command implementations for the CLI.

/// Maps arguments to a transcode request and runs it.
pub mod encode;
