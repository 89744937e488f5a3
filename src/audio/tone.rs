// Alert tone playback
//
// A short square-wave beep played on the default output device. Playback
// happens on a throwaway thread so firing the alert never blocks the
// monitor loop.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::alert::AlertSink;
use crate::audio_constants::{
    ALERT_STREAM_HOLD_MS, ALERT_TONE_ATTACK_SECS, ALERT_TONE_DURATION_SECS,
    ALERT_TONE_FLOOR_GAIN, ALERT_TONE_FREQUENCY_HZ, ALERT_TONE_PEAK_GAIN,
};
use crate::{debug, warn};

/// Gain of the alert envelope at `t` seconds after the tone starts
///
/// Linear attack from 0 to peak, then an exponential ramp from peak down to
/// the floor gain at the end of the tone. Silent outside the tone.
pub fn envelope_gain(t: f32) -> f32 {
    if !(0.0..ALERT_TONE_DURATION_SECS).contains(&t) {
        return 0.0;
    }
    if t < ALERT_TONE_ATTACK_SECS {
        return ALERT_TONE_PEAK_GAIN * (t / ALERT_TONE_ATTACK_SECS);
    }
    let progress = (t - ALERT_TONE_ATTACK_SECS) / (ALERT_TONE_DURATION_SECS - ALERT_TONE_ATTACK_SECS);
    ALERT_TONE_PEAK_GAIN * (ALERT_TONE_FLOOR_GAIN / ALERT_TONE_PEAK_GAIN).powf(progress)
}

/// Unit square wave at `frequency` Hz
pub fn square_wave(t: f32, frequency: f32) -> f32 {
    if (t * frequency).fract() < 0.5 {
        1.0
    } else {
        -1.0
    }
}

/// Mono sample of the alert tone at `t` seconds
pub fn tone_sample(t: f32) -> f32 {
    square_wave(t, ALERT_TONE_FREQUENCY_HZ) * envelope_gain(t)
}

/// Alert sink that beeps through the default output device
#[derive(Debug, Clone, Default)]
pub struct ToneAlert {
    /// Set while a tone is playing; overlapping alerts are skipped
    playing: Arc<AtomicBool>,
}

impl ToneAlert {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlertSink for ToneAlert {
    fn fire(&self) {
        if self.playing.swap(true, Ordering::SeqCst) {
            debug!("[tone] Alert tone already playing, skipping");
            return;
        }
        let playing = Arc::clone(&self.playing);
        let spawned = thread::Builder::new()
            .name("alert-tone".to_string())
            .spawn(move || {
                if let Err(e) = play_tone() {
                    warn!("[tone] Failed to play alert tone: {}", e);
                }
                playing.store(false, Ordering::SeqCst);
            });
        if let Err(e) = spawned {
            warn!("[tone] Failed to spawn tone thread: {}", e);
            self.playing.store(false, Ordering::SeqCst);
        }
    }
}

/// Open the default output device, play the tone, and close the device
#[cfg_attr(coverage_nightly, coverage(off))]
fn play_tone() -> Result<(), String> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| "no output device available".to_string())?;
    let supported = device.default_output_config().map_err(|e| e.to_string())?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_tone_stream::<f32>(&device, &config),
        cpal::SampleFormat::I16 => build_tone_stream::<i16>(&device, &config),
        cpal::SampleFormat::U16 => build_tone_stream::<u16>(&device, &config),
        other => return Err(format!("unsupported output format {:?}", other)),
    }
    .map_err(|e| e.to_string())?;

    stream.play().map_err(|e| e.to_string())?;
    thread::sleep(Duration::from_millis(ALERT_STREAM_HOLD_MS));
    // Stream will be dropped here, closing the device
    Ok(())
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn build_tone_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;
    let mut frame_index: u64 = 0;

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let t = frame_index as f32 / sample_rate;
                let value: T = tone_sample(t).to_sample();
                for slot in frame.iter_mut() {
                    *slot = value;
                }
                frame_index += 1;
            }
        },
        |err: cpal::StreamError| warn!("[tone] Output stream error: {}", err),
        None,
    )
}

#[cfg(test)]
#[path = "tone_test.rs"]
mod tests;
