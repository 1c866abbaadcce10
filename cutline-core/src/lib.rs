//! Transcode request compiler and pass supervisor built on ffmpeg.
//!
//! The library turns a declarative editing request (trim window, crop, scale,
//! fades, audio handling, output target) into the exact ffmpeg argument
//! vectors that realize it, then runs those vectors one after another.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use cutline_core::config::CompilerConfig;
//! use cutline_core::external::{FfprobeCommandProber, SidecarSpawner};
//! use cutline_core::request::{OutputTarget, TranscodeOptions};
//! use std::path::PathBuf;
//!
//! let config = CompilerConfig::default();
//! let request = TranscodeOptions {
//!     input: PathBuf::from("talk.mkv"),
//!     output: PathBuf::from("clip.mp4"),
//!     start: Some("1:30".to_string()),
//!     duration: Some("45".to_string()),
//!     fade: Some("0.5".to_string()),
//!     target: OutputTarget::PlatformCapped,
//!     ..Default::default()
//! }
//! .resolve()
//! .unwrap();
//!
//! let spawner = SidecarSpawner::new(&config.ffmpeg_path);
//! let prober = FfprobeCommandProber::from_config(&config);
//! let outcome = cutline_core::transcode(&spawner, &prober, &request, &config, false, |line| {
//!     eprintln!("{line}");
//! })
//! .unwrap();
//! println!("{} pass(es)", outcome.plan.passes.len());
//! ```

pub mod bitrate;
pub mod config;
pub mod error;
pub mod external;
pub mod file_logging;
pub mod media;
pub mod plan;
pub mod processing;
pub mod request;
pub mod supervisor;
pub mod temp_files;
pub mod timestamp;
pub mod utils;

// Re-exports for public API
pub use config::{CompilerConfig, CompilerConfigBuilder};
pub use error::{CoreError, CoreResult};
pub use media::MediaInfo;
pub use plan::{CommandPlan, Pass, PassKind, PassOutput};
pub use processing::{TranscodeOutcome, check_tools, transcode};
pub use request::{TranscodeOptions, TranscodeRequest};
pub use supervisor::{PassSupervisor, SupervisorReport};
pub use timestamp::parse_timestamp;
pub use utils::format_duration;
