//! Scripted replay through the real detector.
//!
//! Readings are fed one per tick on a virtual clock, so a pattern covering
//! minutes of audio runs instantly and alert times are exact.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::alert::AlertSink;
use crate::audio::ScriptedSampler;
use crate::audio_constants::{MONITOR_TICK, MONITOR_TICK_MS};
use crate::monitor::{ManualClock, MonitorConfig, MonitorSnapshot, NoiseMonitor};

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    /// Seconds from the first reading at which each alert fired
    pub alert_times: Vec<f64>,
    /// Ticks evaluated
    pub ticks: usize,
    /// State after the last tick
    pub final_state: MonitorSnapshot,
}

/// Replay `readings` at the monitor tick rate
///
/// One extra tick is evaluated after the last reading so the time spent on
/// that reading is counted. `on_tick` sees every tick's time and state.
pub fn simulate<F>(readings: Vec<f32>, config: MonitorConfig, mut on_tick: F) -> SimulationReport
where
    F: FnMut(f64, &MonitorSnapshot),
{
    let ticks = readings.len() + 1;
    let clock = ManualClock::new();
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&fired);
    let alert: Arc<dyn AlertSink> = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let mut monitor = NoiseMonitor::with_clock(
        Box::new(ScriptedSampler::new(readings)),
        alert,
        clock.clone(),
    )
    .with_config(config);

    let mut alert_times = Vec::new();
    // The scripted sampler never refuses acquisition
    let _ = monitor.start();

    for tick in 0..ticks {
        let before = fired.load(Ordering::SeqCst);
        let _ = monitor.poll();
        let seconds = tick_seconds(tick);
        if fired.load(Ordering::SeqCst) > before {
            alert_times.push(seconds);
        }
        on_tick(seconds, &monitor.snapshot());
        clock.advance(MONITOR_TICK);
    }

    let final_state = monitor.snapshot();
    monitor.stop();

    SimulationReport {
        alert_times,
        ticks,
        final_state,
    }
}

fn tick_seconds(tick: usize) -> f64 {
    (tick as u64 * MONITOR_TICK_MS) as f64 / 1000.0
}

#[cfg(test)]
#[path = "simulate_test.rs"]
mod tests;
