//! Listener loop — reads lines off the link and dispatches them.
//!
//! Runs on its own thread so a slow UI never stalls reading and a blocked
//! read never stalls the UI.
//!
//! ```text
//!   Idle ──start──▶ Reading ──stop flag──▶ Stopped (Shutdown)
//!                     │  ▲
//!                     │  └── line → decode → service, or timeout
//!                     └──── I/O error ─────▶ Stopped (LinkLost)
//! ```
//!
//! Timeouts are the normal idle case, not errors. An overlong line is
//! counted and skipped. They are also the only
//! point where the stop flag is observed, so the read timeout bounds
//! shutdown latency.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{error, info, trace};

use crate::app::ports::{EventSink, LineReader};
use crate::app::service::ConsoleService;
use crate::error::TransportError;
use crate::protocol::decode;

/// Listener lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Idle,
    Reading,
    Stopped,
}

/// Why the listener stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerExit {
    /// The stop flag was raised.
    Shutdown,
    /// The link failed; the service has been told and actuator commands
    /// are now refused.
    LinkLost(TransportError),
    /// The listener thread panicked.
    Panicked,
}

/// Background reader bound to one link, one service and one sink.
pub struct Listener<R, S> {
    reader: R,
    service: Arc<Mutex<ConsoleService>>,
    sink: S,
    timeout: Duration,
    stop: Arc<AtomicBool>,
    state: ListenerState,
    exit: Option<ListenerExit>,
}

impl<R: LineReader, S: EventSink> Listener<R, S> {
    pub fn new(
        reader: R,
        service: Arc<Mutex<ConsoleService>>,
        sink: S,
        timeout: Duration,
    ) -> Self {
        Self {
            reader,
            service,
            sink,
            timeout,
            stop: Arc::new(AtomicBool::new(false)),
            state: ListenerState::Idle,
            exit: None,
        }
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    /// Shared flag; storing `true` stops the loop at the next timeout.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Perform one read and dispatch its result.
    ///
    /// Returns `Some(exit)` once the listener has stopped; every later call
    /// returns the same exit without touching the link.
    pub fn poll_once(&mut self) -> Option<ListenerExit> {
        if let Some(exit) = &self.exit {
            return Some(exit.clone());
        }
        if self.state == ListenerState::Idle {
            info!("Listener: reading");
            self.state = ListenerState::Reading;
        }
        if self.stop.load(Ordering::Acquire) {
            return Some(self.finish(ListenerExit::Shutdown));
        }

        match self.reader.read_line(self.timeout) {
            Ok(line) => {
                let event = decode(&line);
                trace!("Listener: {:?} -> {:?}", line, event);
                self.service
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .handle_event(event, &mut self.sink);
                None
            }
            Err(TransportError::LineTooLong { limit }) => {
                self.service
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .record_overlong(limit);
                None
            }
            Err(e) if e.is_recoverable() => None,
            Err(e) => {
                error!("Listener: link lost: {}", e);
                self.service
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .mark_link_lost(&e.to_string(), &mut self.sink);
                Some(self.finish(ListenerExit::LinkLost(e)))
            }
        }
    }

    /// Loop until shutdown or link loss.
    pub fn run(mut self) -> ListenerExit {
        loop {
            if let Some(exit) = self.poll_once() {
                return exit;
            }
        }
    }

    fn finish(&mut self, exit: ListenerExit) -> ListenerExit {
        info!("Listener: stopped ({:?})", exit);
        self.state = ListenerState::Stopped;
        self.exit = Some(exit.clone());
        exit
    }
}

impl<R, S> Listener<R, S>
where
    R: LineReader + 'static,
    S: EventSink + 'static,
{
    /// Move the listener onto its own thread.
    pub fn spawn(self) -> std::io::Result<ListenerHandle> {
        let stop = self.stop_flag();
        let thread = std::thread::Builder::new()
            .name("homecontrol-listener".into())
            .spawn(move || self.run())?;
        Ok(ListenerHandle { stop, thread })
    }
}

/// Owner's handle on a spawned listener.
pub struct ListenerHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<ListenerExit>,
}

impl ListenerHandle {
    /// Ask the listener to stop; it exits after the current read.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Wait for the thread. Does not request a stop on its own.
    pub fn join(self) -> ListenerExit {
        self.thread.join().unwrap_or(ListenerExit::Panicked)
    }
}
