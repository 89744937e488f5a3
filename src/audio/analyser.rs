// Spectral volume estimation
//
// Turns raw PCM into a normalized 0-1 loudness estimate. The estimate is
// built from the byte-scaled magnitude spectrum of the most recent FFT
// frame: RMS over all bins divided by 128, capped at 1. It is a relative
// loudness measure, not a calibrated sound-pressure level.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::audio_constants::{
    FFT_SIZE, FREQUENCY_BIN_COUNT, MAX_DECIBELS, MIN_DECIBELS, SMOOTHING_TIME_CONSTANT,
    VOLUME_NORMALIZATION,
};

/// Frame-based spectrum analyser producing a 0-1 volume estimate
///
/// Incoming audio is cut into consecutive `FFT_SIZE` frames. Every complete
/// frame is transformed and advances the smoothing by one step, so the
/// estimate reflects all captured audio regardless of how often it is read.
pub struct SpectrumAnalyser {
    fft: Arc<dyn Fft<f32>>,
    /// Blackman window coefficients
    window: Vec<f32>,
    /// Most recent complete frame, oldest sample first
    history: Vec<f32>,
    /// Mono samples still waiting for a complete frame
    pending: Vec<f32>,
    /// Smoothed linear magnitude per bin
    smoothed: Vec<f32>,
    /// Scratch buffer reused for each transform
    scratch: Vec<Complex<f32>>,
    smoothing: f32,
    /// Volume of the last analysed frame
    last_volume: f32,
}

impl SpectrumAnalyser {
    /// Create an analyser with the default smoothing constant
    pub fn new() -> Self {
        Self::with_smoothing(SMOOTHING_TIME_CONSTANT)
    }

    /// Create an analyser with a custom smoothing constant (clamped to 0-1)
    pub fn with_smoothing(smoothing: f32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        Self {
            fft,
            window: blackman_window(FFT_SIZE),
            history: vec![0.0; FFT_SIZE],
            pending: Vec::with_capacity(FFT_SIZE),
            smoothed: vec![0.0; FREQUENCY_BIN_COUNT],
            scratch: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            smoothing: smoothing.clamp(0.0, 1.0),
            last_volume: 0.0,
        }
    }

    /// Analyse mono samples and return the latest volume
    ///
    /// Each complete frame is analysed in order. A trailing partial frame is
    /// carried over to the next call; if no frame completes, the previous
    /// volume is returned unchanged.
    pub fn process(&mut self, samples: &[f32]) -> f32 {
        self.pending.extend_from_slice(samples);
        let complete = self.pending.len() / FFT_SIZE * FFT_SIZE;
        for start in (0..complete).step_by(FFT_SIZE) {
            self.history
                .copy_from_slice(&self.pending[start..start + FFT_SIZE]);
            let bytes = self.byte_frequency_data();
            self.last_volume = volume_from_bytes(&bytes);
        }
        self.pending.drain(..complete);
        self.last_volume
    }

    /// Analyse interleaved samples, averaging channels down to mono
    pub fn process_interleaved(&mut self, samples: &[f32], channels: usize) -> f32 {
        if channels <= 1 {
            return self.process(samples);
        }
        let mono: Vec<f32> = samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();
        self.process(&mono)
    }

    /// Volume of the most recently analysed frame
    pub fn volume(&self) -> f32 {
        self.last_volume
    }

    /// Compute byte-scaled magnitudes (0-255) for each frequency bin of the
    /// current frame, advancing the temporal smoothing by one step
    fn byte_frequency_data(&mut self) -> Vec<u8> {
        for (slot, (sample, w)) in self
            .scratch
            .iter_mut()
            .zip(self.history.iter().zip(self.window.iter()))
        {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let scale = 1.0 / FFT_SIZE as f32;
        let range = MAX_DECIBELS - MIN_DECIBELS;
        let mut bytes = Vec::with_capacity(FREQUENCY_BIN_COUNT);
        for (bin, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.scratch[bin].norm() * scale;
            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * magnitude;
            bytes.push(magnitude_to_byte(*smoothed, range));
        }
        bytes
    }
}

impl Default for SpectrumAnalyser {
    fn default() -> Self {
        Self::new()
    }
}

/// Blackman window of the given length
fn blackman_window(len: usize) -> Vec<f32> {
    let (a0, a1, a2) = (0.42_f32, 0.5_f32, 0.08_f32);
    (0..len)
        .map(|n| {
            let x = n as f32 / len as f32;
            a0 - a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos()
        })
        .collect()
}

/// Map a linear magnitude onto 0-255 across the configured dB range
fn magnitude_to_byte(magnitude: f32, range: f32) -> u8 {
    let db = 20.0 * magnitude.log10();
    if !db.is_finite() {
        return 0;
    }
    let scaled = (255.0 / range) * (db - MIN_DECIBELS);
    scaled.floor().clamp(0.0, 255.0) as u8
}

/// RMS of byte magnitudes normalized to 0-1
pub fn volume_from_bytes(bytes: &[u8]) -> f32 {
    if bytes.is_empty() {
        return 0.0;
    }
    let sum: f32 = bytes.iter().map(|&b| (b as f32) * (b as f32)).sum();
    let rms = (sum / bytes.len() as f32).sqrt();
    (rms / VOLUME_NORMALIZATION).min(1.0)
}

#[cfg(test)]
#[path = "analyser_test.rs"]
mod tests;
