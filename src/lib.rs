pub mod cli;
pub mod config;
pub mod error;
pub mod merge;
pub mod models;
pub mod naming;
pub mod organize;

#[cfg(test)]
mod tests;

pub use config::Settings;
pub use error::{MergeFailure, OrganizerError, Result};
pub use merge::{merge_all, merge_folder, resolve_targets, DocumentMerger, LopdfMerger};
pub use organize::{organize, organize_with_options, OrganizeOptions, OrganizeReport};

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub fn run() -> ExitCode {
    // Load .env file from the working directory, if any
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    // Initialize tracing with RUST_LOG env filter
    // Default: warn for dependencies, info for this crate
    // Use --verbose (or RUST_LOG=debug) for per-file decisions
    let default_filter = if cli.verbose {
        "warn,pdf_organizer_lib=debug"
    } else {
        "warn,pdf_organizer_lib=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match cli::execute(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
