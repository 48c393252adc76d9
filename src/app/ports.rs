//! Port traits — the hexagonal boundary between console logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ConsoleService (domain)
//! ```
//!
//! Driven adapters (serial link, simulator, event sinks, config files)
//! implement these traits. The service and the listener consume them via
//! generics or trait objects, so the core never touches a device directly.

use core::time::Duration;

use crate::config::ConsoleConfig;
use crate::error::{ConfigError, Result};

// ───────────────────────────────────────────────────────────────
// Link ports (driven adapter: device ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Read half of the line transport. Owned by the listener thread.
pub trait LineReader: Send {
    /// Block until one complete line is available or `timeout` elapses.
    ///
    /// The returned line has its terminator and surrounding whitespace
    /// stripped. [`TransportError::Timeout`](crate::error::TransportError::Timeout)
    /// means no complete line arrived; any bytes of a partial line are kept
    /// for the next call.
    fn read_line(&mut self, timeout: Duration) -> Result<String>;
}

/// Write half of the line transport. Shared behind a mutex by the console.
pub trait LineWriter: Send {
    /// Write `line` followed by `\n` as one uninterrupted write.
    fn write_line(&mut self, line: &str) -> Result<()>;
}

impl<T: LineReader + ?Sized> LineReader for Box<T> {
    fn read_line(&mut self, timeout: Duration) -> Result<String> {
        (**self).read_line(timeout)
    }
}

impl<T: LineWriter + ?Sized> LineWriter for Box<T> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → presentation / logging)
// ───────────────────────────────────────────────────────────────

/// The core emits [`ConsoleEvent`](super::events::ConsoleEvent)s through
/// this port. Adapters decide where they go.
pub trait EventSink: Send {
    fn emit(&mut self, event: &super::events::ConsoleEvent);
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&mut self, event: &super::events::ConsoleEvent) {
        (**self).emit(event);
    }
}

/// Fan-out: every event goes to both sinks, left first.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::ConsoleEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists console configuration.
///
/// Implementations MUST validate before persisting and after loading.
/// Invalid values are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from the backing store.
    fn load(&self) -> core::result::Result<ConsoleConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &ConsoleConfig) -> core::result::Result<(), ConfigError>;
}
