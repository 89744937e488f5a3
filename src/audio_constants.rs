//! Centralized constants for audio processing and monitoring.
//!
//! All audio-related magic numbers are defined here with documentation
//! explaining their purpose and constraints.

use std::time::Duration;

// =============================================================================
// MONITOR TIMING
// =============================================================================

/// Interval between monitor ticks (milliseconds).
///
/// The monitor thread polls the sampler and advances the dwell timer at this
/// cadence. The dwell timer measures real elapsed time between samples, so
/// a late tick never shortens or stretches the dwell period.
pub const MONITOR_TICK_MS: u64 = 100;

/// Monitor tick interval as a Duration.
pub const MONITOR_TICK: Duration = Duration::from_millis(MONITOR_TICK_MS);

/// How long `stop()` waits for the monitor thread to confirm release.
pub const MONITOR_STOP_TIMEOUT: Duration = Duration::from_secs(2);

// =============================================================================
// THRESHOLD AND DWELL
// =============================================================================

/// Default loudness threshold (0.0 - 1.0).
///
/// 0 is most sensitive, 1 is least sensitive. A normalized volume strictly
/// above this value counts as loud.
pub const DEFAULT_THRESHOLD: f32 = 0.2;

/// Default dwell period before an alert fires (seconds).
pub const DEFAULT_DWELL_SECONDS: f64 = 11.0;

/// Smallest dwell period accepted by the configuration (seconds).
///
/// Anything lower (including NaN) is clamped up to this floor.
pub const MIN_DWELL_SECONDS: f64 = 0.1;

/// Largest dwell period accepted by the configuration (seconds).
///
/// Keeps the value representable as a Duration; one day is far beyond any
/// practical use.
pub const MAX_DWELL_SECONDS: f64 = 86_400.0;

/// Step used by the interactive dwell increment/decrement (seconds).
pub const DWELL_STEP_SECONDS: f64 = 0.1;

// =============================================================================
// SPECTRAL VOLUME ESTIMATION
// =============================================================================

/// FFT size used by the spectrum analyser (samples).
///
/// Produces `FFT_SIZE / 2` frequency bins. Audio is analysed in consecutive
/// frames of this size, so at 48kHz the estimate updates every ~11ms, well
/// above the monitor tick rate.
pub const FFT_SIZE: usize = 512;

/// Number of frequency bins produced per analysis frame.
pub const FREQUENCY_BIN_COUNT: usize = FFT_SIZE / 2;

/// Temporal smoothing between analysis frames (0.0 - 1.0).
///
/// Each bin keeps this fraction of its previous magnitude, applied once per
/// analysed frame, which keeps the volume estimate from flickering on
/// transients.
pub const SMOOTHING_TIME_CONSTANT: f32 = 0.8;

/// Lower end of the dB range mapped onto byte magnitudes.
pub const MIN_DECIBELS: f32 = -100.0;

/// Upper end of the dB range mapped onto byte magnitudes.
pub const MAX_DECIBELS: f32 = -30.0;

/// Divisor that maps the RMS of byte magnitudes onto the 0-1 volume scale.
pub const VOLUME_NORMALIZATION: f32 = 128.0;

/// Ring buffer capacity between the capture callback and the analyser.
///
/// ~1 second at 48kHz. The monitor drains it every tick, so it only fills
/// if the monitor thread stalls; overflow drops the newest samples.
pub const CAPTURE_RING_CAPACITY: usize = 48000;

// =============================================================================
// ALERT TONE
// =============================================================================

/// Alert tone frequency (Hz).
pub const ALERT_TONE_FREQUENCY_HZ: f32 = 1500.0;

/// Alert tone length (seconds).
pub const ALERT_TONE_DURATION_SECS: f32 = 0.5;

/// Linear attack from silence to peak gain (seconds).
pub const ALERT_TONE_ATTACK_SECS: f32 = 0.01;

/// Peak gain of the alert tone.
pub const ALERT_TONE_PEAK_GAIN: f32 = 1.0;

/// Gain the exponential release reaches at the end of the tone.
///
/// Exponential ramps cannot reach zero, so the tone decays to this floor.
pub const ALERT_TONE_FLOOR_GAIN: f32 = 0.00001;

/// How long the output stream is kept open (milliseconds).
///
/// Slightly longer than the tone so the tail is not cut off.
pub const ALERT_STREAM_HOLD_MS: u64 = 600;

/// How long the visual alert flash stays on screen (milliseconds).
pub const ALERT_FLASH_MS: u64 = 500;

#[cfg(test)]
#[path = "audio_constants_test.rs"]
mod tests;
