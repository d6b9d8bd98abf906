/// Beacon response model, classification, formatting and rendering.
pub mod beacon;
/// Front-end settings loaded from the JSON configuration document.
pub mod config;
/// Contact-form mail relay.
pub mod contact;

/// Logging verbosity for client operations.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Emit request URLs and response sizes.
    Debug,
    /// Emit standard informational output.
    Information,
}

impl Default for LogLevel {
    /// Defaults to `Information` logging.
    fn default() -> Self {
        LogLevel::Information
    }
}
