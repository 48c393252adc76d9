//! Console facade — wires link, service, listener and sinks together.
//!
//! ```text
//!                 ┌──────────── Console ─────────────┐
//!  LineReader ──▶ │ Listener thread ──▶ ConsoleService │ ──▶ EventSink
//!                 │                         ▲          │
//!  UI ──────────▶ │ request_toggle ─────────┘          │
//!                 │        └──▶ Mutex<LineWriter> ─────│──▶ device
//!                 └────────────────────────────────────┘
//! ```
//!
//! Lock order is always service → writer → sink. The listener only takes
//! the service lock, so the two threads can not deadlock.

use std::sync::{Arc, Mutex, PoisonError};

use log::info;

use crate::adapters::serial::SerialLink;
use crate::adapters::simulated::SimulatedDevice;
use crate::app::commands::{Actuator, ActuatorState, ConsoleCommand};
use crate::app::ports::{EventSink, LineReader, LineWriter};
use crate::app::service::ConsoleService;
use crate::app::state::ConsoleState;
use crate::config::ConsoleConfig;
use crate::error::{CommandError, TransportError};
use crate::listener::{Listener, ListenerExit, ListenerHandle};

/// A running console: one link, one listener thread.
pub struct Console {
    service: Arc<Mutex<ConsoleService>>,
    writer: Mutex<Box<dyn LineWriter>>,
    sink: Mutex<Box<dyn EventSink>>,
    listener: Option<ListenerHandle>,
}

impl Console {
    /// Start a console over an already-open link.
    ///
    /// `sink` is cloned: one copy goes to the listener thread, the other
    /// receives events caused by operator commands.
    pub fn start<R, W, S>(
        config: &ConsoleConfig,
        reader: R,
        writer: W,
        sink: S,
    ) -> Result<Self, TransportError>
    where
        R: LineReader + 'static,
        W: LineWriter + 'static,
        S: EventSink + Clone + 'static,
    {
        let service = Arc::new(Mutex::new(ConsoleService::new(config)));
        let listener = Listener::new(
            reader,
            Arc::clone(&service),
            sink.clone(),
            config.read_timeout(),
        )
        .spawn()?;

        info!(
            "Console started (warning above {:.1}\u{00b0}C)",
            config.warning_threshold_c
        );

        Ok(Self {
            service,
            writer: Mutex::new(Box::new(writer)),
            sink: Mutex::new(Box::new(sink)),
            listener: Some(listener),
        })
    }

    /// Open the serial port named in `config` and start.
    pub fn open_serial<S>(config: &ConsoleConfig, sink: S) -> Result<Self, TransportError>
    where
        S: EventSink + Clone + 'static,
    {
        let (reader, writer) = SerialLink::open(config)?;
        Self::start(config, reader, writer, sink)
    }

    /// Start against an in-process simulated board.
    pub fn simulated<S>(
        config: &ConsoleConfig,
        device: &SimulatedDevice,
        period: std::time::Duration,
        sink: S,
    ) -> Result<Self, TransportError>
    where
        S: EventSink + Clone + 'static,
    {
        let (reader, writer) = device.split(period);
        Self::start(config, reader, writer, sink)
    }

    // ── Presentation boundary (inbound) ───────────────────────

    /// Flip `actuator` and send its command. See
    /// [`ConsoleService::toggle`] for the optimistic-update semantics.
    pub fn request_toggle(&self, actuator: Actuator) -> Result<ActuatorState, CommandError> {
        let mut service = self.lock_service();
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        service.toggle(actuator, &mut *writer, &mut *sink)
    }

    /// Dismiss the visible temperature warning until the next reading.
    pub fn acknowledge_warning(&self) -> bool {
        let mut service = self.lock_service();
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        service.acknowledge_warning(&mut *sink)
    }

    /// Dispatch a [`ConsoleCommand`].
    pub fn execute(&self, cmd: ConsoleCommand) -> Result<(), CommandError> {
        let mut service = self.lock_service();
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        service.handle_command(cmd, &mut *writer, &mut *sink)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Consistent copy of the whole state for rendering.
    pub fn snapshot(&self) -> ConsoleState {
        self.lock_service().snapshot()
    }

    /// `false` once the listener has lost the link.
    pub fn link_up(&self) -> bool {
        self.lock_service().state().link_up()
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Stop the listener, wait for it, and release the link.
    pub fn shutdown(mut self) -> ListenerExit {
        self.stop_listener().unwrap_or(ListenerExit::Shutdown)
    }

    fn stop_listener(&mut self) -> Option<ListenerExit> {
        let handle = self.listener.take()?;
        handle.stop();
        let exit = handle.join();
        info!("Console shut down ({:?})", exit);
        Some(exit)
    }

    fn lock_service(&self) -> std::sync::MutexGuard<'_, ConsoleService> {
        self.service.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        let _ = self.stop_listener();
    }
}
