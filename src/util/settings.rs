//! Persisted user settings.
//!
//! Threshold, dwell and preferred input device are stored as JSON in
//! `{config_dir}/noisewatch/settings.json`. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio_constants::{DEFAULT_DWELL_SECONDS, DEFAULT_THRESHOLD};
use crate::monitor::MonitorConfig;

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "noisewatch";

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Errors from reading or writing the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The platform has no config directory
    #[error("User config directory not found")]
    ConfigDirNotFound,
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// User settings as stored on disk
///
/// Unknown keys are ignored and missing keys fall back to defaults, so older
/// and newer files both load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub threshold: f32,
    pub dwell_seconds: f64,
    /// Preferred input device; None uses the system default
    pub device: Option<String>,
    /// Play the alert tone
    pub alert_tone: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            dwell_seconds: DEFAULT_DWELL_SECONDS,
            device: None,
            alert_tone: true,
        }
    }
}

impl Settings {
    /// Monitor configuration, clamped into range
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::new(self.threshold, self.dwell_seconds)
    }

    /// Record a monitor configuration
    pub fn set_monitor_config(&mut self, config: MonitorConfig) {
        self.threshold = config.threshold();
        self.dwell_seconds = config.dwell_seconds();
    }
}

/// Settings file location with load/save
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `{config_dir}/noisewatch/settings.json`
    pub fn default_location() -> Result<Self, SettingsError> {
        let config_dir = dirs::config_dir().ok_or(SettingsError::ConfigDirNotFound)?;
        Ok(Self::new(config_dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings, returning defaults when the file does not exist
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                crate::debug!("No settings at {:?}, using defaults", self.path);
                return Ok(Settings::default());
            }
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Write settings, creating the parent directory if needed
    ///
    /// Writes to a sibling temp file first so a crash never leaves a
    /// truncated settings file behind.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let json = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|source| self.io_error(source))?;
        fs::rename(&tmp_path, &self.path).map_err(|source| self.io_error(source))?;
        crate::debug!("Saved settings to {:?}", self.path);
        Ok(())
    }

    /// Load, apply `update`, and save
    pub fn update<F>(&self, update: F) -> Result<Settings, SettingsError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.load()?;
        update(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
