//! Command dispatch for the noisewatch binary.

pub mod interactive;
pub mod setup;
pub mod simulate;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::audio::list_input_devices;
use crate::audio::scripted::parse_pattern;
use crate::audio_constants::MONITOR_TICK_MS;
use crate::cli::{Commands, MonitorArgs, SimulateArgs};
use crate::monitor::MonitorConfig;
use crate::presentation::{format_countdown, render_line, TerminalPresenter, HELP};
use crate::shutdown;
use crate::util::{Settings, SettingsStore};

/// Run one CLI command to completion
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Monitor(args) => run_monitor(args),
        Commands::Devices => {
            run_devices();
            Ok(())
        }
        Commands::Simulate(args) => run_simulate(args),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn run_monitor(args: MonitorArgs) -> Result<()> {
    let store = match args.settings {
        Some(ref path) => Some(SettingsStore::new(path)),
        None => match SettingsStore::default_location() {
            Ok(store) => Some(store),
            Err(e) => {
                crate::warn!("Settings will not be saved: {}", e);
                None
            }
        },
    };
    let stored = match store {
        Some(ref store) => store.load().unwrap_or_else(|e| {
            crate::warn!("Ignoring unreadable settings: {}", e);
            Settings::default()
        }),
        None => Settings::default(),
    };
    let settings = setup::resolve_settings(stored, &args);

    let presenter = Arc::new(TerminalPresenter::stdout().with_bell(settings.alert_tone));
    let handle = setup::spawn_monitor(&settings, presenter.clone());
    shutdown::install_signal_handler();

    presenter.print_line(&format!(
        "noisewatch: threshold {:.2}, dwell {}s",
        settings.threshold,
        format_countdown(settings.dwell_seconds)
    ));
    presenter.print_line(HELP);

    // A refused microphone is shown by the presenter; the prompt stays up
    // so the user can retry.
    if let Err(e) = handle.start() {
        crate::debug!("Initial start failed: {}", e);
    }

    let lines = interactive::spawn_input_reader();
    interactive::run_session(&handle, presenter.as_ref(), store.as_ref(), lines)
        .context("Monitor thread stopped unexpectedly")?;
    presenter.print_line("Stopped.");
    Ok(())
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn run_devices() {
    let devices = list_input_devices();
    if devices.is_empty() {
        println!("No input devices found");
        return;
    }
    for device in devices {
        let marker = if device.is_default { " (default)" } else { "" };
        println!("{}{}", device.name, marker);
    }
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let readings = parse_pattern(&args.pattern)
        .with_context(|| format!("Invalid pattern '{}'", args.pattern))?;
    let config = MonitorConfig::new(args.threshold, args.dwell);
    let span_secs = (readings.len() as u64 * MONITOR_TICK_MS) as f64 / 1000.0;
    println!(
        "Simulating {} readings (threshold {:.2}, dwell {}s)",
        readings.len(),
        config.threshold(),
        format_countdown(config.dwell_seconds())
    );

    let trace = args.trace;
    let report = simulate::simulate(readings, config, |seconds, snapshot| {
        if trace {
            println!("{:>7.1}s  {}", seconds, render_line(snapshot, false));
        }
    });

    for seconds in &report.alert_times {
        println!("Alert at {:.1}s", seconds);
    }
    println!(
        "{} alert(s) over {:.1}s",
        report.alert_times.len(),
        span_secs
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_rejects_bad_pattern() {
        let args = SimulateArgs {
            pattern: "loud*3".to_string(),
            threshold: 0.2,
            dwell: 2.0,
            trace: false,
        };
        let err = run_simulate(args).unwrap_err();
        assert!(err.to_string().contains("Invalid pattern"));
    }

    #[test]
    fn test_simulate_command_succeeds() {
        let args = SimulateArgs {
            pattern: "0.5*25".to_string(),
            threshold: 0.2,
            dwell: 2.0,
            trace: true,
        };
        assert!(run_simulate(args).is_ok());
    }
}
