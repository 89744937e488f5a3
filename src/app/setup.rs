//! Monitor construction from settings and command line flags.

use std::sync::Arc;

use crate::alert::{AlertFanout, AlertSink, LogAlert};
use crate::audio::{CpalSampler, ToneAlert};
use crate::cli::MonitorArgs;
use crate::events::MonitorEventEmitter;
use crate::monitor::{MonitorThreadHandle, NoiseMonitor};
use crate::util::Settings;

/// Apply command line overrides on top of stored settings
pub fn resolve_settings(stored: Settings, args: &MonitorArgs) -> Settings {
    let mut settings = stored;
    if let Some(threshold) = args.threshold {
        settings.threshold = threshold;
    }
    if let Some(dwell) = args.dwell {
        settings.dwell_seconds = dwell;
    }
    if args.device.is_some() {
        settings.device = args.device.clone();
    }
    if args.no_tone {
        settings.alert_tone = false;
    }

    // Store what the monitor will actually use
    let config = settings.monitor_config();
    settings.set_monitor_config(config);
    settings
}

/// Alert sinks for a live session: always log, tone when enabled
pub fn build_alert(settings: &Settings) -> Arc<dyn AlertSink> {
    let mut fanout = AlertFanout::new().with_sink(Arc::new(LogAlert));
    if settings.alert_tone {
        fanout = fanout.with_sink(Arc::new(ToneAlert::new()));
    }
    Arc::new(fanout)
}

/// Spawn the monitor thread capturing from the configured device
///
/// The capture stream is created on the monitor thread; only the settings
/// cross over.
pub fn spawn_monitor(
    settings: &Settings,
    emitter: Arc<dyn MonitorEventEmitter>,
) -> MonitorThreadHandle {
    let device = settings.device.clone();
    let config = settings.monitor_config();
    let alert = build_alert(settings);

    crate::info!(
        "Using input device: {}",
        device.as_deref().unwrap_or("system default")
    );

    MonitorThreadHandle::spawn(move || {
        NoiseMonitor::new(Box::new(CpalSampler::with_device(device)), alert)
            .with_emitter(emitter)
            .with_config(config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_stored_settings() {
        let stored = Settings {
            threshold: 0.3,
            dwell_seconds: 8.0,
            device: Some("Built-in".to_string()),
            alert_tone: true,
        };
        let args = MonitorArgs {
            threshold: Some(0.6),
            device: Some("USB".to_string()),
            no_tone: true,
            ..MonitorArgs::default()
        };

        let settings = resolve_settings(stored, &args);
        assert_eq!(settings.threshold, 0.6);
        assert_eq!(settings.dwell_seconds, 8.0);
        assert_eq!(settings.device.as_deref(), Some("USB"));
        assert!(!settings.alert_tone);
    }

    #[test]
    fn test_no_flags_keeps_stored_settings() {
        let stored = Settings {
            dwell_seconds: 3.0,
            ..Settings::default()
        };
        let settings = resolve_settings(stored.clone(), &MonitorArgs::default());
        assert_eq!(settings, stored);
    }

    #[test]
    fn test_resolved_values_are_clamped() {
        let args = MonitorArgs {
            threshold: Some(2.0),
            dwell: Some(-1.0),
            ..MonitorArgs::default()
        };
        let settings = resolve_settings(Settings::default(), &args);
        assert_eq!(settings.threshold, 1.0);
        assert_eq!(settings.dwell_seconds, 0.1);
    }
}
