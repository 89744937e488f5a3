// cpal-based microphone sampler
// This code interacts with hardware and is excluded from coverage measurement
//
// Note: All impl blocks here are excluded from coverage because they
// interact with hardware and cannot be unit tested.
#![cfg_attr(coverage_nightly, coverage(off))]

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample, Stream};

use super::{AcquisitionError, AudioBuffer, SamplerHandle, SpectrumAnalyser, VolumeSampler};
use crate::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Microphone sampler backed by cpal
///
/// Each `acquire()` opens a fresh input stream on the requested device (or
/// the default one) and returns a handle that owns it.
pub struct CpalSampler {
    device_name: Option<String>,
}

impl CpalSampler {
    /// Create a sampler for the default input device
    pub fn new() -> Self {
        Self { device_name: None }
    }

    /// Create a sampler for a named input device
    ///
    /// Falls back to the default device if no device has that name.
    pub fn with_device(device_name: Option<String>) -> Self {
        Self { device_name }
    }
}

impl Default for CpalSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Find an audio input device by name
///
/// Searches through all input devices and returns the one matching the given name.
/// Returns None if no device with that name is found.
fn find_device_by_name(host: &cpal::Host, name: &str) -> Option<cpal::Device> {
    host.input_devices()
        .ok()?
        .find(|d| d.name().map(|n| n == name).unwrap_or(false))
}

/// Failure shared between the stream error callback and the handle
#[derive(Default)]
struct StreamFailure {
    signaled: AtomicBool,
    reason: Mutex<Option<String>>,
}

impl StreamFailure {
    /// Record the first failure; later ones are ignored
    fn signal(&self, reason: String) {
        if !self.signaled.swap(true, Ordering::SeqCst) {
            if let Ok(mut slot) = self.reason.lock() {
                *slot = Some(reason);
            }
        }
    }

    fn take(&self) -> Option<String> {
        if !self.signaled.load(Ordering::SeqCst) {
            return None;
        }
        let reason = self
            .reason
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
            .unwrap_or_else(|| "audio stream failed".to_string());
        Some(reason)
    }
}

/// Build an input stream for any sample format, converting to f32
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    buffer: AudioBuffer,
    failure: Arc<StreamFailure>,
) -> Result<Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let samples: Vec<f32> = data.iter().map(|&s| s.to_sample::<f32>()).collect();
            buffer.push_samples(&samples);
        },
        move |err: cpal::StreamError| {
            error!("Audio stream error: {}", err);
            failure.signal(err.to_string());
        },
        None,
    )
}

impl VolumeSampler for CpalSampler {
    fn acquire(&mut self) -> Result<Box<dyn SamplerHandle>, AcquisitionError> {
        info!("Opening microphone...");

        let host = cpal::default_host();
        debug!("Host: {:?}", host.id());

        // Find the requested device or fall back to default
        let device = match self.device_name.as_deref() {
            Some(name) => match find_device_by_name(&host, name) {
                Some(d) => {
                    info!("Using requested device: {}", name);
                    Some(d)
                }
                None => {
                    warn!("Requested device '{}' not found, falling back to default", name);
                    host.default_input_device()
                }
            },
            None => host.default_input_device(),
        }
        .ok_or_else(|| {
            error!("No input device available!");
            AcquisitionError::Unavailable("no input device found".to_string())
        })?;
        debug!(
            "Input device: {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported = device.default_input_config().map_err(|e| {
            error!("Failed to get input config: {}", e);
            AcquisitionError::from_backend_message(e.to_string())
        })?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        debug!(
            "Config: {} Hz, {:?}, {} channels",
            config.sample_rate.0, sample_format, config.channels
        );

        let buffer = AudioBuffer::new();
        let failure = Arc::new(StreamFailure::default());

        let stream = match sample_format {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config, buffer.clone(), failure.clone())
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config, buffer.clone(), failure.clone())
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config, buffer.clone(), failure.clone())
            }
            other => {
                return Err(AcquisitionError::Unavailable(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        }
        .map_err(|e| {
            error!("Failed to build input stream: {}", e);
            match e {
                cpal::BuildStreamError::DeviceNotAvailable => {
                    AcquisitionError::Unavailable(e.to_string())
                }
                other => AcquisitionError::from_backend_message(other.to_string()),
            }
        })?;

        // On failure the stream is dropped here, releasing the device
        stream.play().map_err(|e| {
            error!("Failed to start stream: {}", e);
            AcquisitionError::from_backend_message(e.to_string())
        })?;

        info!("Microphone stream started at {}Hz", config.sample_rate.0);
        Ok(Box::new(CpalSamplerHandle {
            stream: Some(stream),
            buffer,
            analyser: SpectrumAnalyser::new(),
            channels: config.channels as usize,
            failure,
        }))
    }
}

/// Live cpal capture session
struct CpalSamplerHandle {
    stream: Option<Stream>,
    buffer: AudioBuffer,
    analyser: SpectrumAnalyser,
    channels: usize,
    failure: Arc<StreamFailure>,
}

impl SamplerHandle for CpalSamplerHandle {
    fn next_volume(&mut self) -> Result<f32, AcquisitionError> {
        if let Some(reason) = self.failure.take() {
            return Err(AcquisitionError::Lost(reason));
        }
        if self.stream.is_none() {
            return Err(AcquisitionError::Lost("capture already released".to_string()));
        }
        let samples = self.buffer.drain_samples();
        Ok(self.analyser.process_interleaved(&samples, self.channels))
    }

    fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                debug!("Pausing stream before release failed: {}", e);
            }
            // Stream will be dropped here, stopping capture
            drop(stream);
            let dropped = self.buffer.dropped_samples();
            if dropped > 0 {
                debug!("Capture dropped {} samples over the session", dropped);
            }
            debug!("Microphone released");
        }
    }
}

impl Drop for CpalSamplerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

