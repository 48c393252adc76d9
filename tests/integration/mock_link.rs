//! Mock link adapters for integration tests.
//!
//! Records every command line and every emitted event so tests can assert
//! on the full history without a serial device.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use homecontrol::app::events::ConsoleEvent;
use homecontrol::app::ports::{EventSink, LineReader, LineWriter};
use homecontrol::error::TransportError;

// ── ScriptedReader ────────────────────────────────────────────

/// Replays a fixed script, then reports the device as gone.
pub struct ScriptedReader {
    script: VecDeque<Result<String, TransportError>>,
}

impl ScriptedReader {
    pub fn lines(lines: &[&str]) -> Self {
        Self {
            script: lines.iter().map(|l| Ok((*l).to_owned())).collect(),
        }
    }

    pub fn then(mut self, step: Result<String, TransportError>) -> Self {
        self.script.push_back(step);
        self
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _timeout: Duration) -> Result<String, TransportError> {
        self.script
            .pop_front()
            .unwrap_or(Err(TransportError::Disconnected))
    }
}

// ── FeedReader ────────────────────────────────────────────────

/// Reader fed from the test thread; an empty feed times out like a quiet
/// serial port, and dropping the feeder looks like an unplugged device.
pub struct FeedReader {
    rx: Receiver<Result<String, TransportError>>,
}

pub fn feed() -> (Sender<Result<String, TransportError>>, FeedReader) {
    let (tx, rx) = bounded(16);
    (tx, FeedReader { rx })
}

impl LineReader for FeedReader {
    fn read_line(&mut self, timeout: Duration) -> Result<String, TransportError> {
        match self.rx.recv_timeout(timeout) {
            Ok(step) => step,
            Err(RecvTimeoutError::Timeout) => Err(TransportError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(TransportError::Disconnected),
        }
    }
}

// ── RecordingWriter ───────────────────────────────────────────

/// Writer that records lines; `fail_after(n)` makes writes fail once `n`
/// lines have been accepted.
#[derive(Clone, Default)]
pub struct RecordingWriter {
    lines: Arc<Mutex<Vec<String>>>,
    fail_after: Option<usize>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LineWriter for RecordingWriter {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let mut lines = self.lines.lock().unwrap();
        if self.fail_after.is_some_and(|n| lines.len() >= n) {
            return Err(TransportError::Io("write failed".into()));
        }
        lines.push(line.to_owned());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ConsoleEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConsoleEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ConsoleEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
