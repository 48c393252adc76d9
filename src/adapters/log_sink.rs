//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every console event to the `log`
//! facade. The terminal front-end pairs it with a channel sink so there is
//! always a record of what the UI was told.

use log::{info, warn};

use crate::app::events::ConsoleEvent;
use crate::app::ports::EventSink;
use crate::app::state::TIMESTAMP_FORMAT;

/// Adapter that logs every [`ConsoleEvent`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ConsoleEvent) {
        match event {
            ConsoleEvent::Temperature {
                celsius,
                warning_active,
            } => {
                info!(
                    "TEMP  | T={:.1}\u{00b0}C | warning={}",
                    celsius,
                    if *warning_active { "ON" } else { "off" }
                );
            }
            ConsoleEvent::DoorStatus { timestamp, status } => {
                info!(
                    "DOOR  | {} | status={:?}",
                    timestamp.format(TIMESTAMP_FORMAT),
                    status
                );
            }
            ConsoleEvent::ActuatorChanged { actuator, state } => {
                info!("ACT   | {} -> {}", actuator, state);
            }
            ConsoleEvent::CommandFailed { actuator, error } => {
                warn!("ACT   | {} command failed: {}", actuator, error);
            }
            ConsoleEvent::WarningAcknowledged => {
                info!("TEMP  | warning acknowledged");
            }
            ConsoleEvent::ConnectivityLost(reason) => {
                warn!("LINK  | lost: {}", reason);
            }
        }
    }
}
