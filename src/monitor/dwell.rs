// Dwell timer with pause-preserving countdown
//
// The timer counts down the configured dwell period while the room is loud.
// A dip below the threshold pauses it; the remaining time is kept so the
// next loud stretch resumes where the last one stopped. Reaching zero
// consumes the countdown, so the next episode starts from a full dwell.

use std::time::Duration;

/// How a countdown was started by `arm()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellArm {
    /// No countdown existed; seeded with the full dwell period
    Fresh,
    /// A paused countdown was resumed with its remaining time
    Resumed,
    /// The countdown was already running
    AlreadyRunning,
}

/// Countdown-to-alert accumulator
///
/// Advanced explicitly with the elapsed time between samples; it never
/// reads a clock itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DwellTimer {
    /// Time left before the alert; None when no countdown exists
    remaining: Option<Duration>,
    /// Whether elapsed time currently counts down
    running: bool,
}

impl DwellTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down, resuming paused progress if there is any
    pub fn arm(&mut self, dwell: Duration) -> DwellArm {
        if self.running {
            return DwellArm::AlreadyRunning;
        }
        self.running = true;
        match self.remaining {
            Some(_) => DwellArm::Resumed,
            None => {
                self.remaining = Some(dwell);
                DwellArm::Fresh
            }
        }
    }

    /// Stop counting down but keep the remaining time
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Count down by `elapsed` if running
    ///
    /// Returns true exactly when the countdown reaches zero; the countdown
    /// is then cleared and the timer stops.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.running {
            return false;
        }
        let left = self.remaining.unwrap_or_default().saturating_sub(elapsed);
        if left.is_zero() {
            self.remaining = None;
            self.running = false;
            true
        } else {
            self.remaining = Some(left);
            false
        }
    }

    /// Discard any countdown, running or paused
    pub fn reset(&mut self) {
        self.remaining = None;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a countdown exists but is paused
    pub fn is_paused(&self) -> bool {
        !self.running && self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    /// Remaining time in seconds, for display
    pub fn remaining_secs(&self) -> Option<f64> {
        self.remaining.map(|r| r.as_secs_f64())
    }
}

#[cfg(test)]
#[path = "dwell_test.rs"]
mod tests;
