// Noise monitor: threshold + dwell detection over a stream of volume readings
//
// Owns the monitoring lifecycle (Idle / active), the capture session and the
// dwell countdown. Single-threaded: the monitor thread is the only caller.

use std::sync::Arc;
use std::time::Instant;

use super::clock::{Clock, SystemClock};
use super::config::MonitorConfig;
use super::dwell::{DwellArm, DwellTimer};
use super::state::{MonitorSnapshot, MonitorStatus};
use crate::alert::AlertSink;
use crate::audio::{AcquisitionError, SamplerHandle, VolumeSampler};
use crate::events::{
    current_timestamp, AlertFiredPayload, MonitorErrorPayload, MonitorEventEmitter, NullEmitter,
};
use crate::{debug, info, warn};

/// Resources that only exist while monitoring
struct Session {
    handle: Box<dyn SamplerHandle>,
    dwell: DwellTimer,
    /// Arrival time of the previous reading; None before the first one
    last_sample_at: Option<Instant>,
}

impl Session {
    fn new(handle: Box<dyn SamplerHandle>) -> Self {
        Self {
            handle,
            dwell: DwellTimer::new(),
            last_sample_at: None,
        }
    }

    /// Release capture and discard any countdown
    fn release(&mut self) {
        self.dwell.reset();
        self.handle.release();
    }
}

/// Sustained-noise detector
///
/// Each reading is classified against the threshold. While the room is loud a
/// countdown of `dwell_seconds` runs; quiet readings pause it without losing
/// progress. When it reaches zero the alert fires once and the countdown is
/// cleared, so another full dwell of loudness is needed before the next one.
pub struct NoiseMonitor<C: Clock = SystemClock> {
    config: MonitorConfig,
    sampler: Box<dyn VolumeSampler>,
    alert: Arc<dyn AlertSink>,
    emitter: Arc<dyn MonitorEventEmitter>,
    clock: C,
    session: Option<Session>,
    current_volume: f32,
    status: MonitorStatus,
    last_error: Option<AcquisitionError>,
}

impl NoiseMonitor<SystemClock> {
    /// Create an idle monitor using wall-clock time
    pub fn new(sampler: Box<dyn VolumeSampler>, alert: Arc<dyn AlertSink>) -> Self {
        Self::with_clock(sampler, alert, SystemClock)
    }
}

impl<C: Clock> NoiseMonitor<C> {
    /// Create an idle monitor with an explicit time source
    pub fn with_clock(
        sampler: Box<dyn VolumeSampler>,
        alert: Arc<dyn AlertSink>,
        clock: C,
    ) -> Self {
        Self {
            config: MonitorConfig::default(),
            sampler,
            alert,
            emitter: Arc::new(NullEmitter),
            clock,
            session: None,
            current_volume: 0.0,
            status: MonitorStatus::Idle,
            last_error: None,
        }
    }

    /// Route state, alert and error events to `emitter`
    pub fn with_emitter(mut self, emitter: Arc<dyn MonitorEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Start from `config` instead of the defaults
    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Open the capture session and begin monitoring
    ///
    /// No-op when already monitoring. On failure the monitor stays Idle
    /// with the error recorded and nothing left open.
    pub fn start(&mut self) -> Result<(), AcquisitionError> {
        if self.session.is_some() {
            debug!("[monitor] start() while monitoring, ignoring");
            return Ok(());
        }

        self.last_error = None;
        match self.sampler.acquire() {
            Ok(handle) => {
                self.session = Some(Session::new(handle));
                self.current_volume = 0.0;
                self.status = MonitorStatus::Listening;
                info!(
                    "[monitor] Monitoring started (threshold={:.2}, dwell={:.1}s)",
                    self.config.threshold(),
                    self.config.dwell_seconds()
                );
                self.emit_state();
                Ok(())
            }
            Err(error) => {
                warn!("[monitor] Could not start monitoring: {}", error);
                self.fail(error.clone());
                Err(error)
            }
        }
    }

    /// Stop monitoring and release the capture session
    ///
    /// Discards any countdown, paused or running. Safe to call in any state.
    pub fn stop(&mut self) {
        let was_monitoring = self.session.is_some();
        self.teardown();
        self.last_error = None;
        if was_monitoring {
            info!("[monitor] Monitoring stopped");
        }
        self.emit_state();
    }

    /// Stop when monitoring, start otherwise
    pub fn toggle(&mut self) -> Result<(), AcquisitionError> {
        if self.is_monitoring() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Replace threshold and dwell, effective from the next reading
    ///
    /// A countdown already in progress keeps its remaining time; the new
    /// dwell seeds the next fresh detection.
    pub fn configure(&mut self, config: MonitorConfig) {
        if config == self.config {
            return;
        }
        debug!(
            "[monitor] Config changed: threshold {:.2} -> {:.2}, dwell {:.1}s -> {:.1}s",
            self.config.threshold(),
            config.threshold(),
            self.config.dwell_seconds(),
            config.dwell_seconds()
        );
        self.config = config;
        self.emit_state();
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.configure(self.config.with_threshold(threshold));
    }

    pub fn set_dwell_seconds(&mut self, dwell_seconds: f64) {
        self.configure(self.config.with_dwell_seconds(dwell_seconds));
    }

    /// Pull one reading from the capture session and evaluate it
    ///
    /// A capture failure ends the session: the monitor returns to Idle with
    /// the error recorded. Does nothing while Idle.
    pub fn poll(&mut self) -> Result<(), AcquisitionError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        match session.handle.next_volume() {
            Ok(volume) => {
                self.on_sample(volume);
                Ok(())
            }
            Err(error) => {
                warn!("[monitor] Capture failed mid-session: {}", error);
                self.fail(error.clone());
                Err(error)
            }
        }
    }

    /// Evaluate one volume reading
    ///
    /// The time since the previous reading is credited to the previous
    /// reading's classification before this one is classified. Ignored while
    /// Idle.
    pub fn on_sample(&mut self, volume: f32) {
        let now = self.clock.now();
        let dwell = self.config.dwell();
        let threshold = self.config.threshold();
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let elapsed = session
            .last_sample_at
            .map(|prev| now.saturating_duration_since(prev))
            .unwrap_or_default();
        session.last_sample_at = Some(now);
        let fired = session.dwell.advance(elapsed);

        let volume = sanitize_volume(volume);
        self.current_volume = volume;

        if volume > threshold {
            match session.dwell.arm(dwell) {
                DwellArm::Fresh => {
                    debug!("[dwell] Loud noise detected, counting down {:.1}s", dwell.as_secs_f64())
                }
                DwellArm::Resumed => debug!(
                    "[dwell] Loud again, resuming with {:.1}s left",
                    session.dwell.remaining_secs().unwrap_or_default()
                ),
                DwellArm::AlreadyRunning => {}
            }
            self.status = MonitorStatus::LoudDetected;
        } else {
            if session.dwell.is_running() {
                session.dwell.pause();
                debug!(
                    "[dwell] Quiet, paused with {:.1}s left",
                    session.dwell.remaining_secs().unwrap_or_default()
                );
            }
            self.status = MonitorStatus::Listening;
        }

        if fired {
            self.fire_alert();
        }
        self.emit_state();
    }

    pub fn status(&self) -> MonitorStatus {
        self.status
    }

    /// Latest normalized volume; 0 while Idle
    pub fn volume(&self) -> f32 {
        self.current_volume
    }

    /// Seconds left before the alert, if a countdown exists
    pub fn countdown(&self) -> Option<f64> {
        self.session
            .as_ref()
            .and_then(|session| session.dwell.remaining_secs())
    }

    pub fn is_monitoring(&self) -> bool {
        self.session.is_some()
    }

    pub fn last_error(&self) -> Option<&AcquisitionError> {
        self.last_error.as_ref()
    }

    pub fn config(&self) -> MonitorConfig {
        self.config
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            status: self.status.label().to_string(),
            countdown: self.countdown(),
            volume: self.current_volume,
            is_monitoring: self.is_monitoring(),
            error: self.last_error.as_ref().map(|e| e.to_string()),
        }
    }

    fn fire_alert(&mut self) {
        info!(
            "[dwell] Loud for {:.1}s, firing alert",
            self.config.dwell_seconds()
        );
        self.alert.fire();
        self.emitter.emit_alert_fired(AlertFiredPayload {
            timestamp: current_timestamp(),
            dwell_seconds: self.config.dwell_seconds(),
            threshold: self.config.threshold(),
        });
    }

    /// End the session because of a capture error
    fn fail(&mut self, error: AcquisitionError) {
        self.teardown();
        self.emitter.emit_monitor_error(MonitorErrorPayload {
            kind: error.kind().to_string(),
            message: error.to_string(),
        });
        self.last_error = Some(error);
        self.emit_state();
    }

    /// Release capture and return to Idle
    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.release();
        }
        self.current_volume = 0.0;
        self.status = MonitorStatus::Idle;
    }

    fn emit_state(&self) {
        self.emitter.emit_monitor_state(self.snapshot());
    }
}

impl<C: Clock> Drop for NoiseMonitor<C> {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.release();
        }
    }
}

/// Clamp a reading into [0, 1]; NaN counts as silence
fn sanitize_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "detector_test.rs"]
mod tests;
