use super::*;

#[test]
fn test_default_config() {
    let config = MonitorConfig::default();
    assert_eq!(config.threshold(), DEFAULT_THRESHOLD);
    assert_eq!(config.dwell_seconds(), DEFAULT_DWELL_SECONDS);
    assert_eq!(config.dwell(), Duration::from_secs(11));
}

#[test]
fn test_threshold_is_clamped() {
    assert_eq!(MonitorConfig::new(1.5, 2.0).threshold(), 1.0);
    assert_eq!(MonitorConfig::new(-0.3, 2.0).threshold(), 0.0);
    assert_eq!(MonitorConfig::new(f32::NAN, 2.0).threshold(), DEFAULT_THRESHOLD);
    assert_eq!(MonitorConfig::new(0.35, 2.0).threshold(), 0.35);
}

#[test]
fn test_dwell_floor_and_rounding() {
    assert_eq!(normalize_dwell_seconds(0.0), MIN_DWELL_SECONDS);
    assert_eq!(normalize_dwell_seconds(-4.0), MIN_DWELL_SECONDS);
    assert_eq!(normalize_dwell_seconds(f64::NAN), MIN_DWELL_SECONDS);
    assert_eq!(normalize_dwell_seconds(0.14), 0.1);
    assert_eq!(normalize_dwell_seconds(2.36), 2.4);
    assert_eq!(normalize_dwell_seconds(f64::INFINITY), MAX_DWELL_SECONDS);
}

#[test]
fn test_step_dwell_stops_at_floor() {
    let config = MonitorConfig::new(0.2, 0.2);
    let down = config.step_dwell(-0.1);
    assert_eq!(down.dwell_seconds(), 0.1);
    let still_floor = down.step_dwell(-0.1);
    assert_eq!(still_floor.dwell_seconds(), 0.1);
    let up = still_floor.step_dwell(0.1).step_dwell(0.1);
    assert_eq!(up.dwell_seconds(), 0.3);
}

#[test]
fn test_with_methods_keep_other_field() {
    let config = MonitorConfig::new(0.2, 2.0);
    let louder = config.with_threshold(0.6);
    assert_eq!(louder.threshold(), 0.6);
    assert_eq!(louder.dwell_seconds(), 2.0);

    let longer = config.with_dwell_seconds(5.0);
    assert_eq!(longer.threshold(), 0.2);
    assert_eq!(longer.dwell_seconds(), 5.0);
}

#[test]
fn test_dwell_duration_conversion() {
    assert_eq!(MonitorConfig::new(0.2, 2.0).dwell(), Duration::from_secs(2));
    assert_eq!(
        MonitorConfig::new(0.2, 0.5).dwell(),
        Duration::from_millis(500)
    );
}
