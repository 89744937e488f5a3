//! Shared utilities for noisewatch.
//!
//! - `settings`: JSON settings file under the user config directory

mod settings;

pub use settings::{Settings, SettingsError, SettingsStore, APP_DIR_NAME, SETTINGS_FILE_NAME};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
