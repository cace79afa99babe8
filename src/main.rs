//! repo-stages CLI entry point.
//!
//! Parses arguments, sets up logging, dispatches to the command handler and
//! maps errors onto exit codes.

mod cli;
mod commands;

use cli::Cli;
use repo_stages::{exit_codes, telemetry};
use std::process::ExitCode;
use tracing::Level;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    telemetry::init_tracing(cli.log_json, level);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
