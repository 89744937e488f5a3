// Monitor events for the presentation layer
// Defines event payloads and emission trait for testability

use serde::Serialize;

use crate::monitor::MonitorSnapshot;

/// Event names as constants for consistency
pub mod event_names {
    pub const MONITOR_STATE: &str = "monitor_state";
    pub const ALERT_FIRED: &str = "alert_fired";
    pub const MONITOR_ERROR: &str = "monitor_error";
}

/// Payload for alert_fired event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertFiredPayload {
    /// ISO 8601 timestamp when the alert fired
    pub timestamp: String,
    /// Dwell period (seconds) configured when the alert fired
    pub dwell_seconds: f64,
    /// Threshold in force when the alert fired
    pub threshold: f32,
}

/// Payload for monitor_error event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitorErrorPayload {
    /// Error kind, e.g. "acquisitionDenied"
    pub kind: String,
    /// Human-readable error message
    pub message: String,
}

/// Trait for emitting monitor events
/// Allows mocking in tests while using the terminal presenter in production
pub trait MonitorEventEmitter: Send + Sync {
    /// Emit monitor_state event (after every evaluation and lifecycle change)
    fn emit_monitor_state(&self, payload: MonitorSnapshot);

    /// Emit alert_fired event
    fn emit_alert_fired(&self, payload: AlertFiredPayload);

    /// Emit monitor_error event
    fn emit_monitor_error(&self, payload: MonitorErrorPayload);
}

/// Emitter that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmitter;

impl MonitorEventEmitter for NullEmitter {
    fn emit_monitor_state(&self, _payload: MonitorSnapshot) {}

    fn emit_alert_fired(&self, _payload: AlertFiredPayload) {}

    fn emit_monitor_error(&self, _payload: MonitorErrorPayload) {}
}

/// Get the current timestamp in ISO 8601 format
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[path = "events_test.rs"]
pub(crate) mod tests;
