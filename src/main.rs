//! Application entry point.
//!
//! Parses command-line arguments, merges the configuration layers and
//! delegates execution to [`runner::run`].

use petstore_bdd::{cli, runner};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt;

fn main() -> ExitCode {
    let (parsed, matches) = match cli::parse_from(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(err) => err.exit(),
    };
    let merged = cli::merge_with_config(&parsed, &matches);
    let verbose = merged.as_ref().map_or(parsed.verbose, |merged_cli| merged_cli.verbose);
    let max_level = if verbose { Level::DEBUG } else { Level::INFO };
    fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .init();
    let config = match merged {
        Ok(merged_cli) => merged_cli.with_default_command(),
        Err(err) => {
            tracing::error!(error = %err, "configuration merge failed");
            return ExitCode::FAILURE;
        }
    };
    match runner::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("run failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}
