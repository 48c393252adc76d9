//! Console service — the hexagonal core.
//!
//! [`ConsoleService`] owns the [`ConsoleState`] and applies the mutation
//! rules for decoded events and operator commands. All I/O flows through
//! port traits injected at call sites, so the whole service is testable
//! with mock adapters.
//!
//! ```text
//!  Listener ── Event ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                        │    ConsoleService     │
//!  UI ── ConsoleCommand ▶│ state · warning · log │ ──▶ LineWriter
//!                        └──────────────────────┘
//! ```
//!
//! Actuator toggles are optimistic: the state flips before the command is
//! written and a failed write does not revert it. The board sends no
//! acknowledgement, so the displayed state can drift from the hardware.

use chrono::Local;
use log::{debug, info, warn};

use super::commands::{Actuator, ActuatorState, ConsoleCommand};
use super::events::ConsoleEvent;
use super::ports::{EventSink, LineWriter};
use super::state::{ConsoleState, DoorLogEntry, LinkStatus};
use crate::config::ConsoleConfig;
use crate::error::CommandError;
use crate::protocol::{Event, encode};

/// The console service orchestrates all state mutation.
pub struct ConsoleService {
    state: ConsoleState,
}

impl ConsoleService {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            state: ConsoleState::new(config.warning_threshold_c),
        }
    }

    // ── Inbound events (listener thread) ──────────────────────

    /// Apply one decoded line.
    pub fn handle_event(&mut self, event: Event, sink: &mut impl EventSink) {
        self.state.metrics.lines_received += 1;

        match event {
            Event::TemperatureReading { celsius } => {
                let was_active = self.state.temperature.warning_active();
                self.state.temperature.record(celsius);
                let warning_active = self.state.temperature.warning_active();

                if warning_active && !was_active {
                    warn!(
                        "Temperature {:.1}\u{00b0}C above threshold {:.1}\u{00b0}C",
                        celsius,
                        self.state.temperature.threshold()
                    );
                } else if was_active && !warning_active {
                    info!("Temperature back to {:.1}\u{00b0}C", celsius);
                }

                sink.emit(&ConsoleEvent::Temperature {
                    celsius,
                    warning_active,
                });
            }
            Event::DoorStatus { status } => {
                let entry = DoorLogEntry {
                    timestamp: Local::now(),
                    status,
                };
                debug!("Door: {} at {}", entry.status, entry.formatted_timestamp());
                sink.emit(&ConsoleEvent::DoorStatus {
                    timestamp: entry.timestamp,
                    status: entry.status.clone(),
                });
                self.state.append_door(entry);
            }
            Event::Malformed { raw } => {
                self.state.metrics.lines_discarded += 1;
                warn!("Discarding malformed line {:?}", raw);
            }
        }
    }

    /// Count a line the reader dropped for exceeding `limit` bytes.
    /// It is received and discarded like a malformed line.
    pub fn record_overlong(&mut self, limit: usize) {
        let metrics = &mut self.state.metrics;
        metrics.lines_received += 1;
        metrics.lines_discarded += 1;
        metrics.lines_overlong += 1;
        warn!("Discarding line longer than {} bytes", limit);
    }

    /// Record that the listener lost the link.
    ///
    /// Emits [`ConsoleEvent::ConnectivityLost`] the first time only and
    /// returns whether this call changed the status.
    pub fn mark_link_lost(&mut self, reason: &str, sink: &mut impl EventSink) -> bool {
        if !self.state.link_up() {
            return false;
        }
        self.state.link = LinkStatus::Lost(reason.to_owned());
        sink.emit(&ConsoleEvent::ConnectivityLost(reason.to_owned()));
        true
    }

    // ── Operator commands (presentation thread) ───────────────

    /// Process a command from the presentation layer.
    pub fn handle_command(
        &mut self,
        cmd: ConsoleCommand,
        link: &mut impl LineWriter,
        sink: &mut impl EventSink,
    ) -> Result<(), CommandError> {
        match cmd {
            ConsoleCommand::Toggle(actuator) => self.toggle(actuator, link, sink).map(|_| ()),
            ConsoleCommand::AcknowledgeWarning => {
                self.acknowledge_warning(sink);
                Ok(())
            }
        }
    }

    /// Flip `actuator` and send the matching command line.
    ///
    /// Returns the new state. On a write failure the flip is kept and the
    /// error is both emitted as [`ConsoleEvent::CommandFailed`] and returned.
    pub fn toggle(
        &mut self,
        actuator: Actuator,
        link: &mut impl LineWriter,
        sink: &mut impl EventSink,
    ) -> Result<ActuatorState, CommandError> {
        if let LinkStatus::Lost(reason) = &self.state.link {
            return Err(CommandError::LinkDown(reason.clone()));
        }

        let slot = self.state.actuator_mut(actuator);
        *slot = slot.toggled();
        let target = *slot;
        sink.emit(&ConsoleEvent::ActuatorChanged {
            actuator,
            state: target,
        });

        let line = encode(actuator, target);
        match link.write_line(line) {
            Ok(()) => {
                self.state.metrics.commands_sent += 1;
                info!("Sent {}", line);
                Ok(target)
            }
            Err(source) => {
                self.state.metrics.command_failures += 1;
                warn!("Failed to send {}: {} (state left {})", line, source, target);
                sink.emit(&ConsoleEvent::CommandFailed {
                    actuator,
                    error: source.to_string(),
                });
                Err(CommandError::Write { actuator, source })
            }
        }
    }

    /// Dismiss the visible warning until the next reading.
    /// Returns `false` if no warning was showing.
    pub fn acknowledge_warning(&mut self, sink: &mut impl EventSink) -> bool {
        if !self.state.temperature.acknowledge() {
            return false;
        }
        info!("Temperature warning acknowledged");
        sink.emit(&ConsoleEvent::WarningAcknowledged);
        true
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    /// Owned copy for rendering outside the lock.
    pub fn snapshot(&self) -> ConsoleState {
        self.state.clone()
    }
}
