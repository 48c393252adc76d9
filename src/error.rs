//! Unified error types for the HomeControl console.
//!
//! Every fallible operation in the library funnels into one of three enums,
//! one per failure class:
//!
//! - [`TransportError`] — the serial link (open, read, write).
//! - [`CommandError`] — a user-initiated actuator command.
//! - [`ConfigError`] — loading, validating or saving configuration.
//!
//! Malformed protocol lines are *not* errors: the decoder maps them to
//! [`Event::Malformed`](crate::protocol::Event::Malformed) and the service
//! counts and discards them.

use thiserror::Error;

use crate::app::commands::Actuator;

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures of the serial link.
///
/// [`TransportError::Timeout`] and [`TransportError::LineTooLong`] are
/// recoverable; the listener treats every other variant as a lost connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The port could not be opened (missing device, busy, bad settings).
    #[error("failed to open {port}: {reason}")]
    Open { port: String, reason: String },
    /// No complete line arrived within the read timeout.
    #[error("read timed out")]
    Timeout,
    /// A line exceeded `limit` bytes and was dropped by the framer.
    #[error("line longer than {limit} bytes dropped")]
    LineTooLong { limit: usize },
    /// The OS reported an I/O failure on the device.
    #[error("I/O error: {0}")]
    Io(String),
    /// The device went away (EOF on the handle).
    #[error("device disconnected")]
    Disconnected,
}

impl TransportError {
    /// Whether the listener should keep reading after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout | Self::LineTooLong { .. })
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => Self::Timeout,
            std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::NotConnected => Self::Disconnected,
            _ => Self::Io(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Failures of [`Console::request_toggle`](crate::console::Console::request_toggle).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The listener has lost the link; actuator controls are disabled.
    #[error("link is down: {0}")]
    LinkDown(String),
    /// The command line could not be written. The in-memory actuator state
    /// has already been flipped and is left as is.
    #[error("failed to send {actuator} command: {source}")]
    Write {
        actuator: Actuator,
        #[source]
        source: TransportError,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from [`ConfigPort`](crate::app::ports::ConfigPort) operations and
/// [`ConsoleConfig::validate`](crate::config::ConsoleConfig::validate).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("config not found: {0}")]
    NotFound(String),
    /// The file exists but is not valid JSON for [`ConsoleConfig`](crate::config::ConsoleConfig).
    #[error("config corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
    /// A field failed range validation. The message names the field.
    #[error("validation failed: {0}")]
    ValidationFailed(&'static str),
    /// Generic I/O error from the filesystem.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Library-wide `Result` alias for transport operations.
pub type Result<T> = core::result::Result<T, TransportError>;
