use super::*;
use crate::audio::scripted::parse_pattern;

fn run(pattern: &str, threshold: f32, dwell: f64) -> SimulationReport {
    let readings = parse_pattern(pattern).unwrap();
    simulate(readings, MonitorConfig::new(threshold, dwell), |_, _| {})
}

#[test]
fn test_continuous_loud_alerts_at_dwell() {
    let report = run("0.5*20", 0.2, 2.0);
    assert_eq!(report.alert_times, vec![2.0]);
    assert_eq!(report.ticks, 21);
}

#[test]
fn test_dip_resumes_countdown() {
    let report = run("0.5*10,0.1*50,0.5*10", 0.2, 2.0);
    assert_eq!(report.alert_times, vec![7.0]);
}

#[test]
fn test_quiet_pattern_has_no_alerts() {
    let report = run("0.1*100,0.2*100", 0.2, 2.0);
    assert!(report.alert_times.is_empty());
    assert_eq!(report.final_state.status, "Listening...");
}

#[test]
fn test_long_loud_stretch_alerts_every_dwell() {
    let report = run("0.8*60", 0.2, 2.0);
    assert_eq!(report.alert_times, vec![2.0, 4.0, 6.0]);
}

#[test]
fn test_on_tick_sees_every_tick() {
    let readings = parse_pattern("0.5*5").unwrap();
    let mut seen = Vec::new();
    simulate(readings, MonitorConfig::new(0.2, 2.0), |seconds, snapshot| {
        seen.push((seconds, snapshot.countdown));
    });

    assert_eq!(seen.len(), 6);
    assert_eq!(seen[0], (0.0, Some(2.0)));
    assert_eq!(seen[5], (0.5, Some(1.5)));
}
