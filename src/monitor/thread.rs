// Dedicated monitor thread
//
// The NoiseMonitor (and the capture stream behind it) lives on one thread
// that owns it exclusively. Callers talk to it through a Send + Sync handle
// over a command channel; between commands the thread polls the sampler on a
// fixed tick.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::clock::Clock;
use super::config::MonitorConfig;
use super::detector::NoiseMonitor;
use super::state::MonitorSnapshot;
use crate::audio::AcquisitionError;
use crate::audio_constants::{MONITOR_STOP_TIMEOUT, MONITOR_TICK};

/// How long the thread sleeps between commands while Idle
const IDLE_WAIT: Duration = Duration::from_secs(60);

/// Config edit applied on the monitor thread
pub type ConfigUpdate = Box<dyn FnOnce(MonitorConfig) -> MonitorConfig + Send>;

/// Commands sent to the monitor thread
pub enum MonitorCommand {
    /// Begin monitoring
    Start {
        response_tx: Sender<Result<(), AcquisitionError>>,
    },
    /// Stop monitoring; acknowledged once capture is released
    Stop { response_tx: Sender<()> },
    /// Stop when monitoring, start otherwise; replies with the new
    /// monitoring flag
    Toggle {
        response_tx: Sender<Result<bool, AcquisitionError>>,
    },
    /// Derive a new config from the current one
    UpdateConfig {
        update: ConfigUpdate,
        response_tx: Sender<MonitorConfig>,
    },
    /// Read the current state
    Snapshot { response_tx: Sender<MonitorSnapshot> },
    /// Stop monitoring and exit the thread
    Shutdown,
}

/// Errors from monitor thread operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MonitorThreadError {
    /// The monitor thread has exited
    #[error("Monitor thread disconnected")]
    ThreadDisconnected,
    /// The thread did not confirm a stop in time
    #[error("Monitor stop timed out")]
    StopTimedOut,
    /// The microphone could not be opened
    #[error("{0}")]
    Acquisition(#[from] AcquisitionError),
}

/// Handle to the monitor thread
///
/// This handle is Send + Sync and can be shared across threads.
/// When dropped, monitoring stops and the thread exits.
pub struct MonitorThreadHandle {
    command_tx: Sender<MonitorCommand>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorThreadHandle {
    /// Spawn the monitor thread
    ///
    /// `factory` runs on the new thread, so the monitor itself does not need
    /// to be Send.
    pub fn spawn<C, F>(factory: F) -> Self
    where
        C: Clock + 'static,
        F: FnOnce() -> NoiseMonitor<C> + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("noise-monitor".to_string())
            .spawn(move || {
                monitor_thread_main(factory(), command_rx);
            });

        let thread = match thread {
            Ok(thread) => Some(thread),
            Err(e) => {
                // Every command will report ThreadDisconnected
                crate::error!("Failed to spawn monitor thread: {}", e);
                None
            }
        };

        Self { command_tx, thread }
    }

    /// Start monitoring
    ///
    /// Blocks until the microphone is open or acquisition has failed.
    pub fn start(&self) -> Result<(), MonitorThreadError> {
        let (response_tx, response_rx) = mpsc::channel();
        self.send(MonitorCommand::Start { response_tx })?;
        response_rx
            .recv()
            .map_err(|_| MonitorThreadError::ThreadDisconnected)?
            .map_err(MonitorThreadError::Acquisition)
    }

    /// Stop monitoring (synchronous: no alert fires after this returns)
    pub fn stop(&self) -> Result<(), MonitorThreadError> {
        let (response_tx, response_rx) = mpsc::channel();
        self.send(MonitorCommand::Stop { response_tx })?;
        response_rx
            .recv_timeout(MONITOR_STOP_TIMEOUT)
            .map_err(|e| match e {
                RecvTimeoutError::Timeout => MonitorThreadError::StopTimedOut,
                RecvTimeoutError::Disconnected => MonitorThreadError::ThreadDisconnected,
            })
    }

    /// Toggle monitoring, returning whether it is now active
    pub fn toggle(&self) -> Result<bool, MonitorThreadError> {
        let (response_tx, response_rx) = mpsc::channel();
        self.send(MonitorCommand::Toggle { response_tx })?;
        response_rx
            .recv()
            .map_err(|_| MonitorThreadError::ThreadDisconnected)?
            .map_err(MonitorThreadError::Acquisition)
    }

    /// Apply `update` to the current config and return the result
    pub fn update_config<F>(&self, update: F) -> Result<MonitorConfig, MonitorThreadError>
    where
        F: FnOnce(MonitorConfig) -> MonitorConfig + Send + 'static,
    {
        let (response_tx, response_rx) = mpsc::channel();
        self.send(MonitorCommand::UpdateConfig {
            update: Box::new(update),
            response_tx,
        })?;
        response_rx
            .recv()
            .map_err(|_| MonitorThreadError::ThreadDisconnected)
    }

    /// Replace threshold and dwell
    pub fn configure(&self, config: MonitorConfig) -> Result<MonitorConfig, MonitorThreadError> {
        self.update_config(move |_| config)
    }

    pub fn set_threshold(&self, threshold: f32) -> Result<MonitorConfig, MonitorThreadError> {
        self.update_config(move |config| config.with_threshold(threshold))
    }

    pub fn set_dwell_seconds(&self, dwell_seconds: f64) -> Result<MonitorConfig, MonitorThreadError> {
        self.update_config(move |config| config.with_dwell_seconds(dwell_seconds))
    }

    /// Move the dwell period by `delta` seconds
    pub fn step_dwell(&self, delta: f64) -> Result<MonitorConfig, MonitorThreadError> {
        self.update_config(move |config| config.step_dwell(delta))
    }

    pub fn snapshot(&self) -> Result<MonitorSnapshot, MonitorThreadError> {
        let (response_tx, response_rx) = mpsc::channel();
        self.send(MonitorCommand::Snapshot { response_tx })?;
        response_rx
            .recv()
            .map_err(|_| MonitorThreadError::ThreadDisconnected)
    }

    /// Ask the thread to exit without waiting for it
    pub fn shutdown(&self) -> Result<(), MonitorThreadError> {
        self.send(MonitorCommand::Shutdown)
    }

    fn send(&self, command: MonitorCommand) -> Result<(), MonitorThreadError> {
        self.command_tx
            .send(command)
            .map_err(|_| MonitorThreadError::ThreadDisconnected)
    }
}

impl Drop for MonitorThreadHandle {
    fn drop(&mut self) {
        // Send shutdown command - ignore errors if thread already exited
        let _ = self.command_tx.send(MonitorCommand::Shutdown);

        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Main loop for the monitor thread
///
/// Waits for commands with a timeout that lands on the next tick deadline,
/// so polling stays on a fixed cadence no matter how many commands arrive.
fn monitor_thread_main<C: Clock>(mut monitor: NoiseMonitor<C>, command_rx: Receiver<MonitorCommand>) {
    crate::debug!("Monitor thread started");
    let mut next_tick = Instant::now() + MONITOR_TICK;

    loop {
        let timeout = if monitor.is_monitoring() {
            next_tick.saturating_duration_since(Instant::now())
        } else {
            IDLE_WAIT
        };

        match command_rx.recv_timeout(timeout) {
            Ok(MonitorCommand::Start { response_tx }) => {
                let was_monitoring = monitor.is_monitoring();
                let result = monitor.start();
                if !was_monitoring && result.is_ok() {
                    next_tick = Instant::now() + MONITOR_TICK;
                }
                let _ = response_tx.send(result);
            }
            Ok(MonitorCommand::Stop { response_tx }) => {
                monitor.stop();
                let _ = response_tx.send(());
            }
            Ok(MonitorCommand::Toggle { response_tx }) => {
                let result = monitor.toggle().map(|_| monitor.is_monitoring());
                if matches!(result, Ok(true)) {
                    next_tick = Instant::now() + MONITOR_TICK;
                }
                let _ = response_tx.send(result);
            }
            Ok(MonitorCommand::UpdateConfig {
                update,
                response_tx,
            }) => {
                let config = update(monitor.config());
                monitor.configure(config);
                let _ = response_tx.send(monitor.config());
            }
            Ok(MonitorCommand::Snapshot { response_tx }) => {
                let _ = response_tx.send(monitor.snapshot());
            }
            Ok(MonitorCommand::Shutdown) => {
                crate::debug!("Monitor thread received shutdown");
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                crate::debug!("Monitor command channel closed");
                break;
            }
        }

        let now = Instant::now();
        if monitor.is_monitoring() && now >= next_tick {
            // Errors are recorded on the monitor and emitted as events
            let _ = monitor.poll();
            next_tick += MONITOR_TICK;
            if next_tick <= now {
                // Fell behind (e.g. suspended); skip missed ticks
                next_tick = now + MONITOR_TICK;
            }
        }
    }

    monitor.stop();
    crate::debug!("Monitor thread exiting");
}

#[cfg(test)]
#[path = "thread_test.rs"]
mod tests;
