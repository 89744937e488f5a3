// noisewatch: alerts when a room stays loud for longer than a dwell period

// Enable coverage attribute on nightly for explicit exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod alert;
mod app;
pub mod audio;
mod audio_constants;
pub mod cli;
pub mod events;
pub mod monitor;
pub mod presentation;
pub mod shutdown;
pub mod util;

use clap::Parser;

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};

pub use app::simulate::{simulate, SimulationReport};

/// Application entry point - parses arguments and runs the chosen command.
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    info!("Starting noisewatch {}", env!("CARGO_PKG_VERSION"));
    app::execute(cli.into_command())
}
