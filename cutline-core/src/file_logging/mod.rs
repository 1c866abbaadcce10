//! Optional log file output.
//!
//! When a log directory is given, every record goes to a timestamped file in
//! that directory as well as to the console.

pub mod setup;

pub use setup::setup_file_logging;

use std::path::{Path, PathBuf};

/// Path of the log file for one run, e.g. `<dir>/cutline_20240101_120000.log`.
#[must_use]
pub fn log_file_path(log_dir: &Path, timestamp: &str) -> PathBuf {
    log_dir.join(format!("cutline_{timestamp}.log"))
}
