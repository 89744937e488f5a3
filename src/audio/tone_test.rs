use super::*;

#[test]
fn test_envelope_attack_is_linear() {
    assert_eq!(envelope_gain(0.0), 0.0);
    let half_attack = envelope_gain(ALERT_TONE_ATTACK_SECS / 2.0);
    assert!((half_attack - ALERT_TONE_PEAK_GAIN / 2.0).abs() < 1e-4);
}

#[test]
fn test_envelope_peaks_after_attack_then_decays() {
    let peak = envelope_gain(ALERT_TONE_ATTACK_SECS);
    assert!((peak - ALERT_TONE_PEAK_GAIN).abs() < 1e-4);

    let mid = envelope_gain(0.25);
    let late = envelope_gain(0.45);
    assert!(mid < peak);
    assert!(late < mid);
    assert!(late > 0.0);
}

#[test]
fn test_envelope_silent_outside_tone() {
    assert_eq!(envelope_gain(-0.1), 0.0);
    assert_eq!(envelope_gain(ALERT_TONE_DURATION_SECS), 0.0);
    assert_eq!(envelope_gain(1.0), 0.0);
}

#[test]
fn test_envelope_reaches_floor_at_end() {
    let almost_end = envelope_gain(ALERT_TONE_DURATION_SECS - 1e-4);
    assert!(almost_end < 0.001);
}

#[test]
fn test_square_wave_alternates_each_half_period() {
    let period = 1.0 / 1000.0;
    assert_eq!(square_wave(0.0, 1000.0), 1.0);
    assert_eq!(square_wave(period * 0.25, 1000.0), 1.0);
    assert_eq!(square_wave(period * 0.75, 1000.0), -1.0);
}

#[test]
fn test_tone_sample_is_bounded() {
    for i in 0..24_000 {
        let t = i as f32 / 48_000.0;
        assert!(tone_sample(t).abs() <= ALERT_TONE_PEAK_GAIN);
    }
}
