//! Console state — everything the presentation layer renders.
//!
//! Owned by [`ConsoleService`](super::service::ConsoleService) and mutated
//! only through it. Readers get a cloned [`ConsoleState`] so a render never
//! observes a half-applied update.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::commands::{Actuator, ActuatorState};
use crate::diagnostics::LinkMetrics;

/// Display format for door log timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Last temperature reading plus the fixed warning threshold.
///
/// The warning flag is derived on every query, never stored, so it can
/// not drift from the reading that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureState {
    last_reading: Option<f32>,
    threshold_c: f32,
    /// Operator dismissed the warning; cleared by the next reading.
    acknowledged: bool,
}

impl TemperatureState {
    pub fn new(threshold_c: f32) -> Self {
        Self {
            last_reading: None,
            threshold_c,
            acknowledged: false,
        }
    }

    pub fn last_reading(&self) -> Option<f32> {
        self.last_reading
    }

    pub fn threshold(&self) -> f32 {
        self.threshold_c
    }

    /// `true` iff the last reading is strictly above the threshold.
    pub fn warning_active(&self) -> bool {
        self.last_reading.is_some_and(|c| c > self.threshold_c)
    }

    /// Active and not dismissed by the operator.
    pub fn warning_visible(&self) -> bool {
        self.warning_active() && !self.acknowledged
    }

    pub(crate) fn record(&mut self, celsius: f32) {
        self.last_reading = Some(celsius);
        self.acknowledged = false;
    }

    /// Returns `false` if there was nothing to acknowledge.
    pub(crate) fn acknowledge(&mut self) -> bool {
        if !self.warning_visible() {
            return false;
        }
        self.acknowledged = true;
        true
    }
}

/// One row of the door log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoorLogEntry {
    pub timestamp: DateTime<Local>,
    pub status: String,
}

impl DoorLogEntry {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Whether the serial link is still usable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum LinkStatus {
    #[default]
    Connected,
    Lost(String),
}

/// Aggregate console state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleState {
    pub lamp: ActuatorState,
    pub plug: ActuatorState,
    pub temperature: TemperatureState,
    /// Append-only, arrival order.
    door_log: Vec<DoorLogEntry>,
    pub link: LinkStatus,
    pub metrics: LinkMetrics,
}

impl ConsoleState {
    pub fn new(warning_threshold_c: f32) -> Self {
        Self {
            lamp: ActuatorState::Off,
            plug: ActuatorState::Off,
            temperature: TemperatureState::new(warning_threshold_c),
            door_log: Vec::new(),
            link: LinkStatus::Connected,
            metrics: LinkMetrics::default(),
        }
    }

    pub fn actuator(&self, actuator: Actuator) -> ActuatorState {
        match actuator {
            Actuator::Lamp => self.lamp,
            Actuator::Plug => self.plug,
        }
    }

    pub(crate) fn actuator_mut(&mut self, actuator: Actuator) -> &mut ActuatorState {
        match actuator {
            Actuator::Lamp => &mut self.lamp,
            Actuator::Plug => &mut self.plug,
        }
    }

    pub fn door_log(&self) -> &[DoorLogEntry] {
        &self.door_log
    }

    /// Status of the most recent door log entry.
    pub fn door_status(&self) -> Option<&str> {
        self.door_log.last().map(|e| e.status.as_str())
    }

    pub(crate) fn append_door(&mut self, entry: DoorLogEntry) {
        self.door_log.push(entry);
    }

    pub fn link_up(&self) -> bool {
        self.link == LinkStatus::Connected
    }
}
