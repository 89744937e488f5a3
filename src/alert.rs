// Alert sinks
//
// The monitor only knows that an alert should fire; what that means (a beep,
// a flash, a log line) is decided by the sink it was built with.

use std::sync::Arc;

/// Consumer of "alert fired" signals
///
/// `fire()` must not block: the monitor calls it from its tick loop.
pub trait AlertSink: Send + Sync {
    fn fire(&self);
}

impl<F> AlertSink for F
where
    F: Fn() + Send + Sync,
{
    fn fire(&self) {
        self()
    }
}

/// Alert sink that fans out to several sinks in order
#[derive(Default, Clone)]
pub struct AlertFanout {
    sinks: Vec<Arc<dyn AlertSink>>,
}

impl AlertFanout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink to the fanout
    pub fn with_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl AlertSink for AlertFanout {
    fn fire(&self) {
        for sink in &self.sinks {
            sink.fire();
        }
    }
}

/// Alert sink that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlert;

impl AlertSink for LogAlert {
    fn fire(&self) {
        crate::info!("Sustained loud noise, alert fired");
    }
}

#[cfg(test)]
#[path = "alert_test.rs"]
mod tests;
