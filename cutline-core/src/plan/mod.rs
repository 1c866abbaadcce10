//! Command plan compilation.
//!
//! Turns a resolved [`crate::request::TranscodeRequest`] and the probed
//! [`crate::media::MediaInfo`] into one or two ffmpeg argument vectors. The
//! pieces are assembled in a fixed order:
//!
//! - [`timeline`]: trim window, seek placement and fade start times
//! - [`filters`]: ordered video/audio filter chains
//! - [`codec`]: encoder selection and quality options
//! - [`assemble`]: the final argument vectors and the pass list
//!
//! Nothing in this module spawns a process or touches the filesystem.

pub mod assemble;
pub mod codec;
pub mod filters;
pub mod timeline;

pub use assemble::{CommandPlan, Pass, PassKind, PassOutput, display_command};
pub use codec::CodecBlock;
pub use filters::{FilterChain, PaletteStage, build_filter_chain};
pub use timeline::{SeekPlacement, Timeline};
