// Errors from microphone acquisition and capture sessions

use serde::Serialize;

/// Errors that end a capture session
///
/// Every variant is terminal to the current monitoring session: the monitor
/// tears down and returns to Idle. Retrying means calling `start()` again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum AcquisitionError {
    /// The user or the OS refused microphone access
    #[error("Could not access microphone. Please check permissions.")]
    Denied(String),
    /// No input device, or the device could not be opened
    #[error("No microphone available: {0}")]
    Unavailable(String),
    /// The device went away or the stream failed mid-session
    #[error("Microphone disconnected: {0}")]
    Lost(String),
}

impl AcquisitionError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AcquisitionError::Denied(_) => "acquisitionDenied",
            AcquisitionError::Unavailable(_) => "acquisitionUnavailable",
            AcquisitionError::Lost(_) => "acquisitionLost",
        }
    }

    /// Classify a backend error message as a permission denial or an
    /// unavailable device.
    ///
    /// Audio backends report permission problems as free-form text, so the
    /// message is the only signal available.
    pub fn from_backend_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("permission")
            || lower.contains("denied")
            || lower.contains("not authorized")
            || lower.contains("not permitted")
        {
            AcquisitionError::Denied(message)
        } else {
            AcquisitionError::Unavailable(message)
        }
    }
}
