// ============================================================================
// cutline-cli/src/main.rs
// ============================================================================
//
// CUTLINE CLI: Entry point
//
// Parses arguments, sets up logging, runs the encode command and maps the
// outcome to the process exit code:
//
// - 0 on success
// - the encoder's own exit code when an ffmpeg pass fails
// - 1 for every other error
// - 2 for usage errors (reported by clap before anything runs)

use clap::Parser;
use cutline_cli::logging::{init_console_logging, init_file_logging, level_for};
use cutline_cli::{Cli, output, run_encode};
use std::process;

fn main() {
    let cli = Cli::parse();
    let level = level_for(cli.debug);

    match &cli.log_dir {
        Some(log_dir) => match init_file_logging(log_dir, level) {
            Ok(log_file) => log::info!("Logging to {}", log_file.display()),
            Err(e) => {
                init_console_logging(level);
                log::warn!("{e}");
            }
        },
        None => init_console_logging(level),
    }

    let code = match run_encode(&cli) {
        Ok(()) => 0,
        Err(e) => {
            log::debug!("Exiting after error: {e:?}");
            output::print_error(&e);
            e.exit_code()
        }
    };

    process::exit(code);
}
