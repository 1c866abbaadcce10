//! Terminal output for the CLI.
//!
//! Encoder lines and errors go to stderr; dry-run command lines and the final
//! summary go to stdout so they can be piped.

use cutline_core::plan::{CommandPlan, display_command};
use cutline_core::{CoreError, TranscodeOutcome, format_duration};
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;

/// Prints one cleaned line of encoder output.
pub fn print_encoder_line(line: &str) {
    eprintln!("{}", line.dimmed());
}

/// Prints every pass of a plan as a shell-like command line.
pub fn print_dry_run(program: &Path, plan: &CommandPlan) {
    let program = program.display().to_string();
    for (index, pass) in plan.passes.iter().enumerate() {
        println!(
            "{} {}",
            format!("# pass {}", index + 1).cyan(),
            format!("({:?})", pass.kind).dimmed()
        );
        println!("{}", display_command(&program, &pass.args));
    }
}

/// Prints the success summary after all passes finished.
pub fn print_summary(outcome: &TranscodeOutcome, output: &Path, elapsed: Duration) {
    let passes = outcome.report.as_ref().map_or(0, |r| r.passes.len());
    println!(
        "{} {} ({} pass{}, {})",
        "Done:".green().bold(),
        output.display(),
        passes,
        if passes == 1 { "" } else { "es" },
        format_duration(elapsed.as_secs_f64())
    );
    if let Some(cleanup) = outcome.report.as_ref().and_then(|r| r.cleanup_error.as_ref()) {
        println!("{} {cleanup}", "Warning:".yellow().bold());
    }
}

/// Prints a fatal error.
pub fn print_error(error: &CoreError) {
    eprintln!("{} {error}", "Error:".red().bold());
}
