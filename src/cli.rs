//! Command line interface for noisewatch.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::audio_constants::{DEFAULT_DWELL_SECONDS, DEFAULT_THRESHOLD};

/// Alert when a room stays loud for too long
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The chosen command, defaulting to `monitor` with stored settings
    pub fn into_command(self) -> Commands {
        self.command
            .unwrap_or_else(|| Commands::Monitor(MonitorArgs::default()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Monitor the microphone and alert on sustained noise (default)
    Monitor(MonitorArgs),

    /// List available input devices
    Devices,

    /// Replay a volume pattern through the detector and report alerts
    Simulate(SimulateArgs),
}

/// Options for live monitoring
///
/// Flags override the stored settings for this run; changes made at the
/// prompt are saved back.
#[derive(Args, Debug, Default, Clone)]
pub struct MonitorArgs {
    /// Volume threshold between 0.0 and 1.0
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Seconds the room must stay loud before the alert fires
    #[arg(short, long)]
    pub dwell: Option<f64>,

    /// Input device name (use `devices` to list them)
    #[arg(long)]
    pub device: Option<String>,

    /// Do not play the alert tone
    #[arg(long)]
    pub no_tone: bool,

    /// Settings file to use instead of the default location
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

/// Options for replaying a scripted pattern
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Comma-separated readings, each VOLUME or VOLUME*COUNT, one per 100ms
    /// tick, e.g. "0.5*20,0.1*50"
    #[arg(short, long)]
    pub pattern: String,

    /// Volume threshold between 0.0 and 1.0
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f32,

    /// Dwell period in seconds
    #[arg(short, long, default_value_t = DEFAULT_DWELL_SECONDS)]
    pub dwell: f64,

    /// Print the status line for every tick
    #[arg(long)]
    pub trace: bool,
}
