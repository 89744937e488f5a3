// Sustained-noise monitoring: configuration, dwell logic and the monitor thread

pub mod clock;
mod config;
mod detector;
pub mod dwell;
mod state;
mod thread;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{clamp_threshold, normalize_dwell_seconds, MonitorConfig};
pub use detector::NoiseMonitor;
pub use dwell::DwellTimer;
pub use state::{MonitorSnapshot, MonitorStatus};
pub use thread::{MonitorCommand, MonitorThreadError, MonitorThreadHandle};
