// Audio capture and volume estimation for the noise monitor

use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapRb,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::audio_constants::CAPTURE_RING_CAPACITY;

pub mod analyser;
pub use analyser::SpectrumAnalyser;

mod cpal_backend;
pub use cpal_backend::CpalSampler;

mod device;
pub use device::{list_input_devices, AudioInputDevice};

mod error;
pub use error::AcquisitionError;

pub mod scripted;
pub use scripted::ScriptedSampler;

pub mod tone;
pub use tone::ToneAlert;

/// Thread-safe buffer between the capture callback and the analyser
///
/// Uses a SPSC ring buffer for low-contention audio capture:
/// - Producer (audio callback) writes via `push_samples()`
/// - Consumer (monitor thread) reads via `drain_samples()`
///
/// Samples that do not fit are dropped and counted. The analyser frames
/// whatever arrives, so a lost burst only means those frames are never
/// analysed.
pub struct AudioBuffer {
    /// Ring buffer producer half
    producer: Arc<Mutex<RingProducer>>,
    /// Ring buffer consumer half
    consumer: Arc<Mutex<RingConsumer>>,
    /// Samples dropped because the ring was full
    dropped: Arc<AtomicUsize>,
}

impl AudioBuffer {
    /// Create a new empty audio buffer with default capacity
    pub fn new() -> Self {
        Self::with_capacity(CAPTURE_RING_CAPACITY)
    }

    /// Create a new audio buffer with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let rb = HeapRb::<f32>::new(capacity);
        let (producer, consumer) = rb.split();
        Self {
            producer: Arc::new(Mutex::new(producer)),
            consumer: Arc::new(Mutex::new(consumer)),
            dropped: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Push samples to the buffer (used by audio callback)
    ///
    /// Returns the number of samples actually written.
    pub fn push_samples(&self, samples: &[f32]) -> usize {
        let pushed = match self.producer.lock() {
            Ok(mut prod) => prod.push_slice(samples),
            Err(_) => 0,
        };
        if pushed < samples.len() {
            self.dropped
                .fetch_add(samples.len() - pushed, Ordering::Relaxed);
        }
        pushed
    }

    /// Drain all available samples from the ring buffer
    pub fn drain_samples(&self) -> Vec<f32> {
        let mut drained = Vec::new();
        if let Ok(mut cons) = self.consumer.lock() {
            let available = cons.occupied_len();
            if available > 0 {
                drained.resize(available, 0.0);
                let read = cons.pop_slice(&mut drained);
                drained.truncate(read);
            }
        }
        drained
    }

    /// Total number of samples dropped because the ring was full
    pub fn dropped_samples(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for AudioBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AudioBuffer {
    fn clone(&self) -> Self {
        Self {
            producer: Arc::clone(&self.producer),
            consumer: Arc::clone(&self.consumer),
            dropped: Arc::clone(&self.dropped),
        }
    }
}

impl std::fmt::Debug for AudioBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioBuffer")
            .field("dropped_samples", &self.dropped_samples())
            .finish()
    }
}

/// Type alias for ring buffer producer half
type RingProducer = ringbuf::HeapProd<f32>;

/// Type alias for ring buffer consumer half
type RingConsumer = ringbuf::HeapCons<f32>;

/// Source of volume readings (allows mocking in tests)
///
/// `acquire()` opens the microphone (or whatever stands in for it) and
/// returns a handle that produces readings until released. On failure the
/// implementation must not leave a partially opened capture session behind.
pub trait VolumeSampler {
    /// Open a capture session
    fn acquire(&mut self) -> Result<Box<dyn SamplerHandle>, AcquisitionError>;
}

/// A live capture session
pub trait SamplerHandle {
    /// Latest normalized volume in [0, 1]
    ///
    /// Returns an error once the underlying device has failed; the session
    /// is unusable after that.
    fn next_volume(&mut self) -> Result<f32, AcquisitionError>;

    /// Stop capture and free all underlying resources
    ///
    /// Must be idempotent.
    fn release(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_then_drain_preserves_order() {
        let buffer = AudioBuffer::with_capacity(8);
        assert_eq!(buffer.push_samples(&[0.1, 0.2, 0.3]), 3);
        assert_eq!(buffer.drain_samples(), vec![0.1, 0.2, 0.3]);
        assert!(buffer.drain_samples().is_empty());
    }

    #[test]
    fn test_overflow_counts_dropped_samples() {
        let buffer = AudioBuffer::with_capacity(4);
        let pushed = buffer.push_samples(&[0.0; 6]);
        assert_eq!(pushed, 4);
        assert_eq!(buffer.dropped_samples(), 2);

        // Draining frees space again
        buffer.drain_samples();
        assert_eq!(buffer.push_samples(&[0.5; 2]), 2);
    }

    #[test]
    fn test_clone_shares_ring() {
        let producer_side = AudioBuffer::with_capacity(4);
        let consumer_side = producer_side.clone();
        producer_side.push_samples(&[0.7]);
        assert_eq!(consumer_side.drain_samples(), vec![0.7]);
    }
}
