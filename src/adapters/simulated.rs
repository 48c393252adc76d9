//! Simulated board.
//!
//! Reproduces the reference firmware's behaviour so the console can run
//! without hardware (`--simulate`):
//!
//! - every `period` it sends `DOOR:CLOSED` followed by `TEMP:<n>`;
//! - `n` starts at 25, increments after each report, and wraps from 40
//!   back to 25, so the warning threshold is crossed every cycle;
//! - command lines written to it are recorded, never answered.
//!
//! Output goes through the same [`LineFramer`] as the real serial adapter.
//! [`SimulatedDevice::disconnect`] makes the next read fail, which exercises
//! the listener's connectivity-loss path.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::info;

use crate::app::ports::{LineReader, LineWriter};
use crate::error::{Result, TransportError};
use crate::protocol::codec::{LINE_CAPACITY, LineFramer};

const TEMP_START: u32 = 25;
const TEMP_WRAP_ABOVE: u32 = 40;

#[derive(Default)]
struct Shared {
    received: Mutex<Vec<String>>,
    disconnected: AtomicBool,
}

/// Handle to a simulated board. Cheap to clone.
#[derive(Clone, Default)]
pub struct SimulatedDevice {
    shared: Arc<Shared>,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the read and write halves, reporting every `period`.
    /// The first report is sent immediately.
    pub fn split(&self, period: Duration) -> (SimulatedReader, SimulatedWriter) {
        (
            SimulatedReader {
                shared: Arc::clone(&self.shared),
                period,
                next_report: Instant::now(),
                temperature: TEMP_START,
                framer: LineFramer::new(LINE_CAPACITY),
                pending: VecDeque::new(),
            },
            SimulatedWriter {
                shared: Arc::clone(&self.shared),
            },
        )
    }

    /// Command lines the board has received, in order.
    pub fn received(&self) -> Vec<String> {
        self.shared
            .received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Unplug the board: subsequent reads and writes fail.
    pub fn disconnect(&self) {
        self.shared.disconnected.store(true, Ordering::Release);
    }

    fn is_disconnected(shared: &Shared) -> bool {
        shared.disconnected.load(Ordering::Acquire)
    }
}

/// Read half of the simulated board.
pub struct SimulatedReader {
    shared: Arc<Shared>,
    period: Duration,
    next_report: Instant,
    temperature: u32,
    framer: LineFramer,
    pending: VecDeque<String>,
}

impl SimulatedReader {
    fn report(&mut self) {
        let bytes = format!("DOOR:CLOSED\nTEMP:{}\n", self.temperature);
        self.framer.feed(bytes.as_bytes(), &mut self.pending);

        self.temperature += 1;
        if self.temperature > TEMP_WRAP_ABOVE {
            self.temperature = TEMP_START;
        }
        self.next_report += self.period;
    }
}

impl LineReader for SimulatedReader {
    fn read_line(&mut self, timeout: Duration) -> Result<String> {
        if SimulatedDevice::is_disconnected(&self.shared) {
            return Err(TransportError::Disconnected);
        }
        if let Some(line) = self.pending.pop_front() {
            return Ok(line);
        }

        let now = Instant::now();
        let deadline = now + timeout;
        if self.next_report > now {
            std::thread::sleep(self.next_report.min(deadline) - now);
        }
        if Instant::now() < self.next_report {
            return Err(TransportError::Timeout);
        }

        self.report();
        self.pending.pop_front().ok_or(TransportError::Timeout)
    }
}

/// Write half of the simulated board.
pub struct SimulatedWriter {
    shared: Arc<Shared>,
}

impl LineWriter for SimulatedWriter {
    fn write_line(&mut self, line: &str) -> Result<()> {
        if SimulatedDevice::is_disconnected(&self.shared) {
            return Err(TransportError::Disconnected);
        }
        info!("sim: board received {}", line);
        self.shared
            .received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
        Ok(())
    }
}
