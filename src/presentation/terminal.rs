// Terminal rendering of monitor state
//
// Redraws a single status line (volume meter, status, countdown) in place and
// shows an alert banner for a short flash when the alert fires.

use parking_lot::Mutex;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crate::audio_constants::ALERT_FLASH_MS;
use crate::events::{event_names, AlertFiredPayload, MonitorErrorPayload, MonitorEventEmitter};
use crate::monitor::MonitorSnapshot;

/// Width of the volume meter in characters
pub const METER_WIDTH: usize = 20;

/// Carriage return plus "erase line" so the status line redraws in place
const CLEAR_LINE: &str = "\r\x1b[2K";

const BELL: &str = "\x07";

/// Emitter that draws monitor events on a terminal
pub struct TerminalPresenter<W: Write + Send = Stdout> {
    out: Mutex<W>,
    flash_until: Mutex<Option<Instant>>,
    bell: bool,
}

impl TerminalPresenter<Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            flash_until: Mutex::new(None),
            bell: true,
        }
    }

    /// Enable or disable the terminal bell on alerts
    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }

    /// Whether the alert banner is showing at `now`
    pub fn is_flashing(&self, now: Instant) -> bool {
        self.flash_until.lock().is_some_and(|until| now < until)
    }

    /// Print a line above the status line
    pub fn print_line(&self, line: &str) {
        self.write(&format!("{CLEAR_LINE}{line}\n"));
    }

    pub fn into_writer(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock();
        // Terminal output is best effort
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl<W: Write + Send> MonitorEventEmitter for TerminalPresenter<W> {
    fn emit_monitor_state(&self, payload: MonitorSnapshot) {
        crate::trace!("[{}] {:?}", event_names::MONITOR_STATE, payload);
        let flashing = self.is_flashing(Instant::now());
        self.write(&format!("{CLEAR_LINE}{}", render_line(&payload, flashing)));
    }

    fn emit_alert_fired(&self, payload: AlertFiredPayload) {
        crate::debug!("[{}] {:?}", event_names::ALERT_FIRED, payload);
        *self.flash_until.lock() = Some(Instant::now() + Duration::from_millis(ALERT_FLASH_MS));
        let bell = if self.bell { BELL } else { "" };
        self.write(&format!(
            "{CLEAR_LINE}{bell}*** ALERT *** loud for {:.1}s (at {})\n",
            payload.dwell_seconds, payload.timestamp
        ));
    }

    fn emit_monitor_error(&self, payload: MonitorErrorPayload) {
        crate::debug!("[{}] {}: {}", event_names::MONITOR_ERROR, payload.kind, payload.message);
        self.print_line(&format!("Error: {}", payload.message));
    }
}

/// Render the status line for a snapshot
///
/// e.g. `[#######-------------]  35%  Loud noise detected!  alert in 4.2s`
pub fn render_line(snapshot: &MonitorSnapshot, flashing: bool) -> String {
    let mut line = format!(
        "{} {:>3}%  {}",
        volume_bar(snapshot.volume, METER_WIDTH),
        (snapshot.volume.clamp(0.0, 1.0) * 100.0).round() as u32,
        snapshot.status
    );
    if let Some(countdown) = snapshot.countdown {
        line.push_str(&format!("  alert in {}s", format_countdown(countdown)));
    }
    if let Some(ref error) = snapshot.error {
        line.push_str(&format!("  [{}]", error));
    }
    if flashing {
        line.push_str("  *** ALERT ***");
    }
    line
}

/// Countdown with one decimal place
pub fn format_countdown(seconds: f64) -> String {
    format!("{:.1}", seconds.max(0.0))
}

/// Horizontal meter, `#` for the filled part
pub fn volume_bar(volume: f32, width: usize) -> String {
    let filled = ((volume.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;
