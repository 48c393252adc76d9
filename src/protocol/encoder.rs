//! Outbound command encoder.

use crate::app::commands::{Actuator, ActuatorState};

/// Map an actuator and its target state to the fixed command token.
///
/// The line terminator is added by the
/// [`LineWriter`](crate::app::ports::LineWriter), not here.
pub const fn encode(actuator: Actuator, target: ActuatorState) -> &'static str {
    match (actuator, target) {
        (Actuator::Lamp, ActuatorState::On) => "LAMP_ON",
        (Actuator::Lamp, ActuatorState::Off) => "LAMP_OFF",
        (Actuator::Plug, ActuatorState::On) => "PLUG_ON",
        (Actuator::Plug, ActuatorState::Off) => "PLUG_OFF",
    }
}
