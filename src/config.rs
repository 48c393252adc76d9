//! Console configuration parameters
//!
//! All tunable parameters for the HomeControl console.
//! Defaults match the reference board firmware; every field can be
//! overridden from a JSON config file or the command line.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest accepted `max_line_len`. Must fit a `TEMP:` line with headroom.
pub const MIN_LINE_LEN: usize = 16;

/// Largest accepted `max_line_len` (capacity of the framer's line buffer).
pub const MAX_LINE_LEN: usize = crate::protocol::codec::LINE_CAPACITY;

/// Core console configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    // --- Link ---
    /// Serial device identifier (`/dev/ttyACM0`, `COM17`, ...)
    pub port: String,
    /// Baud rate of the board UART
    pub baud_rate: u32,
    /// Read timeout (milliseconds). Also bounds shutdown latency.
    pub read_timeout_ms: u64,
    /// Longest accepted inbound line (bytes, excluding terminator)
    pub max_line_len: usize,

    // --- Temperature ---
    /// Readings strictly above this value (Celsius) raise the warning
    pub warning_threshold_c: f32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            // Link
            port: default_port().to_owned(),
            baud_rate: 9600,
            read_timeout_ms: 1000,
            max_line_len: 256,

            // Temperature
            warning_threshold_c: 27.0,
        }
    }
}

impl ConsoleConfig {
    /// Read timeout as a [`Duration`](core::time::Duration).
    pub fn read_timeout(&self) -> core::time::Duration {
        core::time::Duration::from_millis(self.read_timeout_ms)
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("port must not be empty"));
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ValidationFailed("baud_rate must be non-zero"));
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "read_timeout_ms must be non-zero",
            ));
        }
        if !(MIN_LINE_LEN..=MAX_LINE_LEN).contains(&self.max_line_len) {
            return Err(ConfigError::ValidationFailed(
                "max_line_len must be between 16 and 1024",
            ));
        }
        if !self.warning_threshold_c.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "warning_threshold_c must be finite",
            ));
        }
        Ok(())
    }
}

#[cfg(target_os = "windows")]
fn default_port() -> &'static str {
    "COM17"
}

#[cfg(not(target_os = "windows"))]
fn default_port() -> &'static str {
    "/dev/ttyACM0"
}
