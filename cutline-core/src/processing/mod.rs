//! Transcode orchestration.
//!
//! Ties the pieces together for one invocation: dependency check, probe,
//! plan assembly and pass supervision. Front ends call [`transcode`] with
//! their own spawner and prober implementations.

/// Probe, assemble and supervise one request
pub mod transcode;

pub use transcode::{TranscodeOutcome, check_tools, transcode};
