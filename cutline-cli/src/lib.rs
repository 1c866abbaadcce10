// cutline-cli/src/lib.rs
//
// Library portion of the cutline CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::Cli;
pub use commands::encode::run_encode;
