//! Interactive monitoring session.
//!
//! Typed commands arrive on a stdin reader thread; the loop applies them to
//! the monitor thread and exits on `q`, Ctrl+C, or a monitor thread failure.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::audio_constants::DWELL_STEP_SECONDS;
use crate::monitor::{MonitorConfig, MonitorThreadError, MonitorThreadHandle};
use crate::presentation::{parse_command, render_line, TerminalPresenter, UserIntent, HELP};
use crate::shutdown;
use crate::util::SettingsStore;

/// How often the loop checks the shutdown flag while waiting for input
const INPUT_POLL: Duration = Duration::from_millis(200);

/// Apply one intent
///
/// Acquisition failures are not returned: the monitor already reported them
/// through its error event. Config changes are saved to `store` when given.
pub fn apply_intent<W: Write + Send>(
    intent: UserIntent,
    handle: &MonitorThreadHandle,
    presenter: &TerminalPresenter<W>,
    store: Option<&SettingsStore>,
) -> Result<ControlFlow<()>, MonitorThreadError> {
    let outcome = match intent {
        UserIntent::Toggle => handle.toggle().map(|_| ()),
        UserIntent::Start => handle.start(),
        UserIntent::Stop => handle.stop(),
        UserIntent::DwellUp => {
            save_config(handle.step_dwell(DWELL_STEP_SECONDS)?, ConfigField::Dwell, store)
        }
        UserIntent::DwellDown => {
            save_config(handle.step_dwell(-DWELL_STEP_SECONDS)?, ConfigField::Dwell, store)
        }
        UserIntent::SetDwell(seconds) => {
            save_config(handle.set_dwell_seconds(seconds)?, ConfigField::Dwell, store)
        }
        UserIntent::SetThreshold(threshold) => save_config(
            handle.set_threshold(threshold)?,
            ConfigField::Threshold,
            store,
        ),
        UserIntent::Status => {
            let snapshot = handle.snapshot()?;
            presenter.print_line(&render_line(&snapshot, false));
            Ok(())
        }
        UserIntent::Help => {
            presenter.print_line(HELP);
            Ok(())
        }
        UserIntent::Quit => return Ok(ControlFlow::Break(())),
    };

    match outcome {
        Ok(()) | Err(MonitorThreadError::Acquisition(_)) => Ok(ControlFlow::Continue(())),
        Err(e) => Err(e),
    }
}

/// Config value changed by an intent
#[derive(Debug, Clone, Copy)]
enum ConfigField {
    Threshold,
    Dwell,
}

/// Echo a new config and persist the field that changed
///
/// The other field keeps its stored value, so one-off command line
/// overrides never reach the settings file.
fn save_config(
    config: MonitorConfig,
    changed: ConfigField,
    store: Option<&SettingsStore>,
) -> Result<(), MonitorThreadError> {
    crate::info!(
        "Threshold {:.2}, dwell {:.1}s",
        config.threshold(),
        config.dwell_seconds()
    );
    if let Some(store) = store {
        let saved = store.update(|settings| match changed {
            ConfigField::Threshold => settings.threshold = config.threshold(),
            ConfigField::Dwell => settings.dwell_seconds = config.dwell_seconds(),
        });
        if let Err(e) = saved {
            crate::warn!("Failed to save settings: {}", e);
        }
    }
    Ok(())
}

/// Read stdin lines on a background thread
///
/// The channel closes when stdin reaches end of file.
pub fn spawn_input_reader() -> Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        crate::warn!("Failed to spawn input reader: {}", e);
    }
    line_rx
}

/// Run until the user quits or Ctrl+C
///
/// When stdin closes the session keeps monitoring until Ctrl+C.
pub fn run_session<W: Write + Send>(
    handle: &MonitorThreadHandle,
    presenter: &TerminalPresenter<W>,
    store: Option<&SettingsStore>,
    lines: Receiver<String>,
) -> Result<(), MonitorThreadError> {
    let mut lines = Some(lines);

    while !shutdown::is_shutting_down() {
        let Some(ref rx) = lines else {
            thread::sleep(INPUT_POLL);
            continue;
        };
        let line = match rx.recv_timeout(INPUT_POLL) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                crate::debug!("stdin closed, monitoring until Ctrl+C");
                lines = None;
                continue;
            }
        };

        match parse_command(&line) {
            Ok(intent) => {
                if apply_intent(intent, handle, presenter, store)?.is_break() {
                    break;
                }
            }
            Err(e) => presenter.print_line(&e.to_string()),
        }
    }

    handle.stop()
}

#[cfg(test)]
#[path = "interactive_test.rs"]
mod tests;
