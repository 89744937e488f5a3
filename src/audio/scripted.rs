// Scripted volume source
//
// Replays a fixed sequence of volume readings in place of a microphone.
// Used by the `simulate` command and by monitor tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{AcquisitionError, SamplerHandle, VolumeSampler};

/// Counters shared between a ScriptedSampler and whoever inspects it
#[derive(Debug, Default)]
pub struct ScriptProbe {
    acquired: AtomicUsize,
    released: AtomicUsize,
    polled: AtomicUsize,
}

impl ScriptProbe {
    /// Number of successful `acquire()` calls
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Number of sessions released
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Number of readings requested across all sessions
    pub fn polled(&self) -> usize {
        self.polled.load(Ordering::SeqCst)
    }
}

/// Volume sampler that replays a scripted sequence
///
/// Once the script runs out the last reading is held (0.0 for an empty
/// script).
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    readings: Vec<f32>,
    acquire_error: Option<AcquisitionError>,
    lose_after: Option<usize>,
    probe: Arc<ScriptProbe>,
}

impl ScriptedSampler {
    /// Create a sampler replaying the given readings
    pub fn new(readings: Vec<f32>) -> Self {
        Self {
            readings,
            acquire_error: None,
            lose_after: None,
            probe: Arc::new(ScriptProbe::default()),
        }
    }

    /// Create a sampler whose `acquire()` always fails
    pub fn failing(error: AcquisitionError) -> Self {
        Self {
            acquire_error: Some(error),
            ..Self::new(Vec::new())
        }
    }

    /// Report the device as lost after `readings` successful readings
    pub fn lose_after(mut self, readings: usize) -> Self {
        self.lose_after = Some(readings);
        self
    }

    /// Shared counters for this sampler's sessions
    pub fn probe(&self) -> Arc<ScriptProbe> {
        Arc::clone(&self.probe)
    }
}

impl VolumeSampler for ScriptedSampler {
    fn acquire(&mut self) -> Result<Box<dyn SamplerHandle>, AcquisitionError> {
        if let Some(ref error) = self.acquire_error {
            crate::debug!("[scripted] Refusing acquisition: {}", error);
            return Err(error.clone());
        }
        self.probe.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedHandle {
            readings: self.readings.clone(),
            position: 0,
            lose_after: self.lose_after,
            released: false,
            probe: Arc::clone(&self.probe),
        }))
    }
}

struct ScriptedHandle {
    readings: Vec<f32>,
    position: usize,
    lose_after: Option<usize>,
    released: bool,
    probe: Arc<ScriptProbe>,
}

impl SamplerHandle for ScriptedHandle {
    fn next_volume(&mut self) -> Result<f32, AcquisitionError> {
        if self.released {
            return Err(AcquisitionError::Lost("capture already released".to_string()));
        }
        if self.lose_after.is_some_and(|limit| self.position >= limit) {
            return Err(AcquisitionError::Lost("scripted device unplugged".to_string()));
        }
        self.probe.polled.fetch_add(1, Ordering::SeqCst);
        let reading = self
            .readings
            .get(self.position)
            .or_else(|| self.readings.last())
            .copied()
            .unwrap_or(0.0);
        self.position += 1;
        Ok(reading)
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.probe.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Errors from parsing a volume pattern
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    /// A segment was not a number or `volume*count`
    #[error("Invalid pattern segment '{0}', expected VOLUME or VOLUME*COUNT")]
    InvalidSegment(String),
    /// A volume fell outside 0-1
    #[error("Volume {0} is outside 0.0-1.0")]
    VolumeOutOfRange(f32),
    /// The pattern contained no readings
    #[error("Pattern contains no readings")]
    Empty,
}

/// Parse a volume pattern such as `"0.5*20,0.1*50,0.5"` into readings
///
/// Each comma-separated segment is a volume, optionally repeated `count`
/// times. Whitespace around segments is ignored.
pub fn parse_pattern(pattern: &str) -> Result<Vec<f32>, PatternError> {
    let mut readings = Vec::new();
    for segment in pattern.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (volume, count) = match segment.split_once('*') {
            Some((volume, count)) => (volume.trim(), count.trim()),
            None => (segment, "1"),
        };
        let volume: f32 = volume
            .parse()
            .map_err(|_| PatternError::InvalidSegment(segment.to_string()))?;
        let count: usize = count
            .parse()
            .map_err(|_| PatternError::InvalidSegment(segment.to_string()))?;
        if !(0.0..=1.0).contains(&volume) {
            return Err(PatternError::VolumeOutOfRange(volume));
        }
        readings.extend(std::iter::repeat(volume).take(count));
    }
    if readings.is_empty() {
        return Err(PatternError::Empty);
    }
    Ok(readings)
}

#[cfg(test)]
#[path = "scripted_test.rs"]
mod tests;
