use super::*;
use std::sync::{Arc, Mutex};

/// Mock emitter that records all emitted events for testing
#[derive(Default, Clone)]
pub struct MockEventEmitter {
    pub state_events: Arc<Mutex<Vec<MonitorSnapshot>>>,
    pub alert_events: Arc<Mutex<Vec<AlertFiredPayload>>>,
    pub error_events: Arc<Mutex<Vec<MonitorErrorPayload>>>,
    /// Event names in emission order
    pub emitted: Arc<Mutex<Vec<&'static str>>>,
}

impl MockEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alert_count(&self) -> usize {
        self.alert_events.lock().unwrap().len()
    }

    pub fn last_state(&self) -> Option<MonitorSnapshot> {
        self.state_events.lock().unwrap().last().cloned()
    }

    /// The last `n` event names, oldest first
    pub fn last_events(&self, n: usize) -> Vec<&'static str> {
        let emitted = self.emitted.lock().unwrap();
        emitted[emitted.len().saturating_sub(n)..].to_vec()
    }
}

impl MonitorEventEmitter for MockEventEmitter {
    fn emit_monitor_state(&self, payload: MonitorSnapshot) {
        self.emitted.lock().unwrap().push(event_names::MONITOR_STATE);
        self.state_events.lock().unwrap().push(payload);
    }

    fn emit_alert_fired(&self, payload: AlertFiredPayload) {
        self.emitted.lock().unwrap().push(event_names::ALERT_FIRED);
        self.alert_events.lock().unwrap().push(payload);
    }

    fn emit_monitor_error(&self, payload: MonitorErrorPayload) {
        self.emitted.lock().unwrap().push(event_names::MONITOR_ERROR);
        self.error_events.lock().unwrap().push(payload);
    }
}

#[test]
fn test_current_timestamp_is_iso8601() {
    let timestamp = current_timestamp();
    assert!(timestamp.contains("T"));
    assert!(timestamp.contains("-"));
    assert!(chrono::DateTime::parse_from_rfc3339(&timestamp).is_ok());
}

#[test]
fn test_serde_camel_case_rename() {
    let payload = AlertFiredPayload {
        timestamp: current_timestamp(),
        dwell_seconds: 2.0,
        threshold: 0.2,
    };
    let json = serde_json::to_string(&payload).unwrap();
    assert!(json.contains("dwellSeconds"));
    assert!(!json.contains("dwell_seconds"));

    let error = MonitorErrorPayload {
        kind: "acquisitionDenied".to_string(),
        message: "nope".to_string(),
    };
    let json = serde_json::to_string(&error).unwrap();
    assert!(json.contains("\"kind\":\"acquisitionDenied\""));
}

#[test]
fn test_mock_emitter_records_events() {
    let emitter = MockEventEmitter::new();
    emitter.emit_alert_fired(AlertFiredPayload {
        timestamp: current_timestamp(),
        dwell_seconds: 1.0,
        threshold: 0.5,
    });
    assert_eq!(emitter.alert_count(), 1);
    assert!(emitter.last_state().is_none());
    assert_eq!(emitter.last_events(5), vec![event_names::ALERT_FIRED]);
}
