// Shutdown coordination module
// Provides a global flag so the run loop can exit cleanly on Ctrl+C

use std::sync::atomic::{AtomicBool, Ordering};

/// Global shutdown flag - set to true when the app is shutting down
static APP_SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

/// Signal that the app is shutting down
pub fn signal_shutdown() {
    APP_SHUTTING_DOWN.store(true, Ordering::SeqCst);
    crate::info!("App shutdown signaled");
}

/// Check if the app is shutting down
/// Returns true after signal_shutdown() has been called
pub fn is_shutting_down() -> bool {
    APP_SHUTTING_DOWN.load(Ordering::SeqCst)
}

/// Route Ctrl+C to `signal_shutdown()`
///
/// The run loop notices the flag, stops monitoring and releases the
/// microphone before the process exits.
pub fn install_signal_handler() {
    if let Err(e) = ctrlc::set_handler(signal_shutdown) {
        crate::warn!("Failed to set Ctrl+C handler: {}", e);
    }
}

#[cfg(test)]
pub(crate) fn reset_for_test() {
    APP_SHUTTING_DOWN.store(false, Ordering::SeqCst);
}

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod tests;
