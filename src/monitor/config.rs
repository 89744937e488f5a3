// Threshold and dwell configuration for the noise monitor

use serde::Serialize;
use std::time::Duration;

use crate::audio_constants::{
    DEFAULT_DWELL_SECONDS, DEFAULT_THRESHOLD, MAX_DWELL_SECONDS, MIN_DWELL_SECONDS,
};

/// Loudness threshold and dwell period
///
/// Fields are private so every instance satisfies the invariants:
/// `threshold ∈ [0, 1]` and `MIN_DWELL_SECONDS <= dwell_seconds <= MAX_DWELL_SECONDS`,
/// with dwell rounded to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    threshold: f32,
    dwell_seconds: f64,
}

impl MonitorConfig {
    /// Create a configuration, clamping both values into range
    pub fn new(threshold: f32, dwell_seconds: f64) -> Self {
        Self {
            threshold: clamp_threshold(threshold),
            dwell_seconds: normalize_dwell_seconds(dwell_seconds),
        }
    }

    /// Normalized volume above which the room counts as loud
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Seconds of cumulative loudness before the alert fires
    pub fn dwell_seconds(&self) -> f64 {
        self.dwell_seconds
    }

    /// Dwell period as a Duration
    pub fn dwell(&self) -> Duration {
        Duration::from_secs_f64(self.dwell_seconds)
    }

    /// Copy with a new threshold
    pub fn with_threshold(self, threshold: f32) -> Self {
        Self::new(threshold, self.dwell_seconds)
    }

    /// Copy with a new dwell period
    pub fn with_dwell_seconds(self, dwell_seconds: f64) -> Self {
        Self::new(self.threshold, dwell_seconds)
    }

    /// Copy with the dwell period moved by `delta` seconds
    pub fn step_dwell(self, delta: f64) -> Self {
        self.with_dwell_seconds(self.dwell_seconds + delta)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_DWELL_SECONDS)
    }
}

/// Clamp a threshold into [0, 1]; NaN falls back to the default
pub fn clamp_threshold(threshold: f32) -> f32 {
    if threshold.is_nan() {
        return DEFAULT_THRESHOLD;
    }
    threshold.clamp(0.0, 1.0)
}

/// Floor, cap, and round a dwell period to one decimal place
///
/// NaN and anything below the floor become `MIN_DWELL_SECONDS`.
pub fn normalize_dwell_seconds(dwell_seconds: f64) -> f64 {
    if dwell_seconds.is_nan() || dwell_seconds < MIN_DWELL_SECONDS {
        return MIN_DWELL_SECONDS;
    }
    let capped = dwell_seconds.min(MAX_DWELL_SECONDS);
    ((capped * 10.0).round() / 10.0).max(MIN_DWELL_SECONDS)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
