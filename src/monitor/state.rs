// Observable monitor state

use serde::Serialize;

/// What the monitor is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MonitorStatus {
    /// Not monitoring; no capture session is open
    #[default]
    Idle,
    /// Monitoring, room at or below the threshold
    Listening,
    /// Monitoring, room above the threshold and the countdown running
    LoudDetected,
}

impl MonitorStatus {
    /// Status line text shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            MonitorStatus::Idle => "Idle",
            MonitorStatus::Listening => "Listening...",
            MonitorStatus::LoudDetected => "Loud noise detected!",
        }
    }
}

impl std::fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Point-in-time view of the monitor for presentation
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    /// Status text ("Idle", "Listening...", "Loud noise detected!")
    pub status: String,
    /// Seconds left before the alert, if a countdown exists
    pub countdown: Option<f64>,
    /// Latest normalized volume
    pub volume: f32,
    pub is_monitoring: bool,
    /// Human-readable message of the last acquisition error
    pub error: Option<String>,
}
