//! Inbound commands to the console service.
//!
//! These represent actions requested by the operator through the
//! presentation layer. The [`ConsoleService`](super::service::ConsoleService)
//! interprets them; the [`Console`](crate::console::Console) facade wires
//! them to the serial writer.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A controllable output on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actuator {
    Lamp,
    Plug,
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lamp => write!(f, "lamp"),
            Self::Plug => write!(f, "plug"),
        }
    }
}

/// Binary actuator state. Both actuators start `Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActuatorState {
    #[default]
    Off,
    On,
}

impl ActuatorState {
    /// The opposite state.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

impl fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "OFF"),
            Self::On => write!(f, "ON"),
        }
    }
}

/// Commands the presentation layer can send into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Flip an actuator and send the matching command line.
    Toggle(Actuator),

    /// Dismiss the current over-temperature warning until the next reading.
    AcknowledgeWarning,
}
