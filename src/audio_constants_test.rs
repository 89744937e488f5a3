use super::*;

#[test]
fn test_bin_count_is_half_fft_size() {
    assert_eq!(FREQUENCY_BIN_COUNT, FFT_SIZE / 2);
    assert!(FFT_SIZE.is_power_of_two());
}

#[test]
fn test_decibel_range_is_ordered() {
    assert!(MIN_DECIBELS < MAX_DECIBELS);
    assert!(MAX_DECIBELS <= 0.0);
}

#[test]
fn test_default_config_respects_floors() {
    assert!((0.0..=1.0).contains(&DEFAULT_THRESHOLD));
    assert!(DEFAULT_DWELL_SECONDS >= MIN_DWELL_SECONDS);
    assert_eq!(DWELL_STEP_SECONDS, MIN_DWELL_SECONDS);
}

#[test]
fn test_tone_envelope_fits_in_duration() {
    assert!(ALERT_TONE_ATTACK_SECS < ALERT_TONE_DURATION_SECS);
    assert!(ALERT_TONE_FLOOR_GAIN > 0.0);
    assert!(ALERT_TONE_FLOOR_GAIN < ALERT_TONE_PEAK_GAIN);
    // Stream must outlive the tone itself
    assert!(ALERT_STREAM_HOLD_MS as f32 / 1000.0 > ALERT_TONE_DURATION_SECS);
}

#[test]
fn test_monitor_tick_matches_millis() {
    assert_eq!(MONITOR_TICK.as_millis() as u64, MONITOR_TICK_MS);
    assert!(MONITOR_STOP_TIMEOUT > MONITOR_TICK);
}
