use super::*;

/// Deterministic white noise in [-amplitude, amplitude]
fn noise(len: usize, amplitude: f32, seed: u32) -> Vec<f32> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let unit = (state >> 8) as f32 / (1u32 << 24) as f32;
            (unit * 2.0 - 1.0) * amplitude
        })
        .collect()
}

/// Samples per 100ms monitor tick at 48kHz
const TICK_SAMPLES: usize = 4800;

/// Sine that completes `cycles_per_frame` whole cycles in every analysis
/// frame, so each frame has the same spectrum
fn steady_tone(len: usize, amplitude: f32, cycles_per_frame: usize) -> Vec<f32> {
    (0..len)
        .map(|n| {
            let phase = 2.0 * PI * cycles_per_frame as f32 * n as f32 / FFT_SIZE as f32;
            amplitude * phase.sin()
        })
        .collect()
}

#[test]
fn test_silence_is_zero_volume() {
    let mut analyser = SpectrumAnalyser::new();
    assert_eq!(analyser.process(&vec![0.0; FFT_SIZE]), 0.0);
}

#[test]
fn test_fresh_analyser_reads_zero() {
    let mut analyser = SpectrumAnalyser::new();
    assert_eq!(analyser.volume(), 0.0);
    assert!(analyser.byte_frequency_data().iter().all(|&b| b == 0));
}

#[test]
fn test_loud_noise_saturates_towards_one() {
    let mut analyser = SpectrumAnalyser::new();
    let mut volume = 0.0;
    for frame in 0..10 {
        volume = analyser.process(&noise(FFT_SIZE, 0.5, frame + 1));
    }
    assert!(volume > 0.5, "loud noise should read loud, got {}", volume);
    assert!(volume <= 1.0);
}

#[test]
fn test_quiet_noise_reads_quieter_than_loud_noise() {
    let mut quiet = SpectrumAnalyser::new();
    let mut loud = SpectrumAnalyser::new();
    let (mut quiet_volume, mut loud_volume) = (0.0, 0.0);
    for frame in 0..10 {
        quiet_volume = quiet.process(&noise(FFT_SIZE, 0.0005, frame + 1));
        loud_volume = loud.process(&noise(FFT_SIZE, 0.5, frame + 1));
    }
    assert!(quiet_volume < loud_volume);
}

#[test]
fn test_smoothing_ramps_up_over_frames() {
    let mut analyser = SpectrumAnalyser::new();
    let loud = noise(FFT_SIZE, 0.05, 7);
    let first = analyser.process(&loud);
    let second = analyser.process(&loud);
    assert!(second >= first, "smoothed reading should not drop: {} -> {}", first, second);
}

#[test]
fn test_sound_ending_before_read_still_counts() {
    let mut analyser = SpectrumAnalyser::new();
    let mut chunk = steady_tone(TICK_SAMPLES - FFT_SIZE, 0.5, 10);
    chunk.extend(vec![0.0; FFT_SIZE]);

    let volume = analyser.process(&chunk);
    assert!(volume > 0.0, "loud audio earlier in the chunk was ignored");
}

#[test]
fn test_every_complete_frame_is_analysed() {
    let audio = steady_tone(TICK_SAMPLES, 0.5, 10);

    let mut whole = SpectrumAnalyser::new();
    let at_once = whole.process(&audio);

    let mut piecewise = SpectrumAnalyser::new();
    let mut in_pieces = 0.0;
    for piece in audio.chunks(100) {
        in_pieces = piecewise.process(piece);
    }

    assert_eq!(at_once, in_pieces);
}

#[test]
fn test_steady_tone_settles_within_a_few_ticks() {
    let mut analyser = SpectrumAnalyser::new();
    let audio = steady_tone(TICK_SAMPLES * 15, 0.5, 10);
    let readings: Vec<f32> = audio
        .chunks(TICK_SAMPLES)
        .map(|tick| analyser.process(tick))
        .collect();

    let settled = readings[14];
    assert!(settled > 0.0);
    assert!(
        readings.windows(2).all(|pair| pair[1] >= pair[0]),
        "steady tone should only ramp up: {:?}",
        readings
    );
    assert!(
        (settled - readings[0]).abs() < 0.05,
        "first tick {} too far from settled {}",
        readings[0],
        settled
    );
    assert!((settled - readings[2]).abs() < 0.01);
}

#[test]
fn test_partial_frame_is_carried_over() {
    let mut analyser = SpectrumAnalyser::new();
    assert_eq!(analyser.process(&vec![0.5; 100]), 0.0);
    assert!(analyser.history.iter().all(|&s| s == 0.0));
    assert_eq!(analyser.pending.len(), 100);

    analyser.process(&vec![0.5; FFT_SIZE - 100]);
    assert!(analyser.history.iter().all(|&s| s == 0.5));
    assert!(analyser.pending.is_empty());
}

#[test]
fn test_interleaved_is_downmixed() {
    let mut analyser = SpectrumAnalyser::new();
    let stereo: Vec<f32> = (0..FFT_SIZE).flat_map(|_| [1.0, 0.0]).collect();
    analyser.process_interleaved(&stereo, 2);
    assert!(analyser.history.iter().all(|&s| s == 0.5));
}

#[test]
fn test_volume_from_bytes_caps_at_one() {
    assert_eq!(volume_from_bytes(&[]), 0.0);
    assert_eq!(volume_from_bytes(&[255; 16]), 1.0);
    let half = volume_from_bytes(&[64; 16]);
    assert!((half - 0.5).abs() < 1e-6);
}

#[test]
fn test_blackman_window_shape() {
    let window = blackman_window(FFT_SIZE);
    assert!(window[0].abs() < 1e-6);
    assert!((window[FFT_SIZE / 2] - 1.0).abs() < 1e-3);
}
