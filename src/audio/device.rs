// Audio device enumeration module
// Provides types and functions for listing available audio input devices

use cpal::traits::{DeviceTrait, HostTrait};
use serde::{Deserialize, Serialize};

/// Represents an audio input device with its properties
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioInputDevice {
    /// Human-readable name of the device
    pub name: String,
    /// Whether this is the system's default input device
    pub is_default: bool,
}

/// List all available audio input devices using cpal.
///
/// Returns a vector of audio input devices sorted with the default device first.
/// Returns an empty vector if no devices are available or if an error occurs.
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn list_input_devices() -> Vec<AudioInputDevice> {
    crate::debug!("Listing input devices via cpal");

    let host = cpal::default_host();
    let default_name = host
        .default_input_device()
        .and_then(|d| d.name().ok());

    let names: Vec<String> = match host.input_devices() {
        Ok(devices) => devices.filter_map(|d| d.name().ok()).collect(),
        Err(e) => {
            crate::warn!("Failed to enumerate input devices: {}", e);
            Vec::new()
        }
    };

    let device_list = sort_default_first(names, default_name.as_deref());
    crate::debug!("Found {} input devices", device_list.len());
    device_list
}

/// Build the device list with the default device first, keeping the
/// backend's order otherwise
fn sort_default_first(names: Vec<String>, default_name: Option<&str>) -> Vec<AudioInputDevice> {
    let mut devices: Vec<AudioInputDevice> = names
        .into_iter()
        .map(|name| AudioInputDevice {
            is_default: Some(name.as_str()) == default_name,
            name,
        })
        .collect();
    // Stable sort keeps the backend's order among non-default devices
    devices.sort_by(|a, b| b.is_default.cmp(&a.is_default));
    devices
}

#[cfg(test)]
#[path = "device_test.rs"]
mod tests;
