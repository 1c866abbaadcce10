// ============================================================================
// cutline-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and optional file logging
//
// Console output goes through env_logger by default. With --log-dir the
// logger is log4rs instead, writing to the console and a timestamped file.
// RUST_LOG overrides the level chosen from --debug.

use cutline_core::file_logging::{log_file_path, setup_file_logging};
use log::LevelFilter;
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Level implied by the --debug flag.
#[must_use]
pub fn level_for(debug: bool) -> LevelFilter {
    if debug { LevelFilter::Debug } else { LevelFilter::Info }
}

/// Initializes the console logger.
pub fn init_console_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let level = match record.level() {
                log::Level::Error => "error".red().bold().to_string(),
                log::Level::Warn => "warning".yellow().to_string(),
                log::Level::Info => "info".green().to_string(),
                log::Level::Debug => "debug".blue().to_string(),
                log::Level::Trace => "trace".magenta().to_string(),
            };
            writeln!(buf, "{level}: {}", record.args())
        })
        .init();
}

/// Initializes log4rs with a file in `log_dir`. Returns the log file path.
pub fn init_file_logging(log_dir: &Path, level: LevelFilter) -> Result<PathBuf, String> {
    let log_file = log_file_path(log_dir, &get_timestamp());
    setup_file_logging(&log_file, level)
        .map_err(|e| format!("Failed to set up log file {}: {e}", log_file.display()))?;
    Ok(log_file)
}
