//! Outbound console events.
//!
//! The [`ConsoleService`](super::service::ConsoleService) and the listener
//! emit these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them — forward to a UI
//! thread over a channel, print to a terminal, or write to the log.

use chrono::{DateTime, Local};

use super::commands::{Actuator, ActuatorState};

/// Structured notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// A new temperature reading arrived.
    Temperature { celsius: f32, warning_active: bool },

    /// A door status line arrived and was appended to the log.
    DoorStatus {
        timestamp: DateTime<Local>,
        status: String,
    },

    /// An actuator was flipped by the operator (optimistic, before the write).
    ActuatorChanged {
        actuator: Actuator,
        state: ActuatorState,
    },

    /// The command line for a toggle could not be written.
    CommandFailed { actuator: Actuator, error: String },

    /// The operator dismissed the active temperature warning.
    WarningAcknowledged,

    /// The serial link is gone; actuator controls must be disabled.
    /// Emitted at most once per console.
    ConnectivityLost(String),
}
