//! Serial port adapter.
//!
//! Implements [`LineReader`] and [`LineWriter`] on top of the `serialport`
//! crate. [`SerialLink::open`] opens the device once and clones the handle:
//! the listener thread owns the reader, the console owns the writer. The
//! two handles never share a buffer, so a read in progress can not split a
//! command write. Dropping both releases the device.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::time::{Duration, Instant};

use log::{debug, info};
use serialport::{FlowControl, SerialPort, SerialPortInfo};

use crate::app::ports::{LineReader, LineWriter};
use crate::config::ConsoleConfig;
use crate::error::{Result, TransportError};
use crate::protocol::codec::LineFramer;

const READ_CHUNK: usize = 64;

/// Opens the board's serial device.
pub struct SerialLink;

impl SerialLink {
    /// Open `config.port` and return the read and write halves.
    pub fn open(config: &ConsoleConfig) -> Result<(SerialReader, SerialWriter)> {
        let port_name = platform_port_name(&config.port);
        let open_err = |e: serialport::Error| TransportError::Open {
            port: config.port.clone(),
            reason: e.to_string(),
        };

        let port = serialport::new(&port_name, config.baud_rate)
            .timeout(config.read_timeout())
            .flow_control(FlowControl::None)
            .open()
            .map_err(open_err)?;
        let write_half = port.try_clone().map_err(open_err)?;

        info!(
            "Opened {} at {} baud (timeout {} ms)",
            port_name, config.baud_rate, config.read_timeout_ms
        );

        Ok((
            SerialReader {
                port,
                lines: LineSource::new(config.max_line_len),
                timeout: config.read_timeout(),
            },
            SerialWriter { port: write_half },
        ))
    }
}

/// Enumerate the serial ports the OS knows about.
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    serialport::available_ports().map_err(map_serial_error)
}

// ── Read half ─────────────────────────────────────────────────

/// Read half of an open serial port.
pub struct SerialReader {
    port: Box<dyn SerialPort>,
    lines: LineSource,
    /// Timeout currently programmed into the port.
    timeout: Duration,
}

impl LineReader for SerialReader {
    fn read_line(&mut self, timeout: Duration) -> Result<String> {
        if timeout != self.timeout {
            self.port.set_timeout(timeout).map_err(map_serial_error)?;
            self.timeout = timeout;
        }
        self.lines.read_from(&mut self.port, Instant::now() + timeout)
    }
}

/// Byte stream to line conversion for any [`Read`] source.
struct LineSource {
    framer: LineFramer,
    /// Lines already framed but not yet returned.
    pending: VecDeque<String>,
    /// Overlong drops already reported as [`TransportError::LineTooLong`].
    reported: u64,
}

impl LineSource {
    fn new(limit: usize) -> Self {
        Self {
            framer: LineFramer::new(limit),
            pending: VecDeque::new(),
            reported: 0,
        }
    }

    /// Next buffered result. Drops are reported ahead of lines framed from
    /// the same chunk.
    fn buffered(&mut self) -> Option<Result<String>> {
        if self.framer.dropped() > self.reported {
            self.reported += 1;
            return Some(Err(TransportError::LineTooLong {
                limit: self.framer.limit(),
            }));
        }
        self.pending.pop_front().map(Ok)
    }

    fn read_from(&mut self, src: &mut impl Read, deadline: Instant) -> Result<String> {
        if let Some(next) = self.buffered() {
            return next;
        }

        // Bytes without a newline must not keep us here past the deadline,
        // otherwise the listener would never observe a shutdown request.
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match src.read(&mut chunk) {
                Ok(0) => return Err(TransportError::Disconnected),
                Ok(n) => self.framer.feed(&chunk[..n], &mut self.pending),
                Err(e) => return Err(e.into()),
            }

            if let Some(next) = self.buffered() {
                return next;
            }
            if Instant::now() >= deadline {
                debug!("serial: partial line of {} bytes", self.framer.pending());
                return Err(TransportError::Timeout);
            }
        }
    }
}

// ── Write half ────────────────────────────────────────────────

/// Write half of an open serial port.
pub struct SerialWriter {
    port: Box<dyn SerialPort>,
}

impl LineWriter for SerialWriter {
    fn write_line(&mut self, line: &str) -> Result<()> {
        write_frame(&mut self.port, line)
    }
}

/// Write `line` plus its newline in a single `write_all`.
fn write_frame(out: &mut impl Write, line: &str) -> Result<()> {
    let mut frame = Vec::with_capacity(line.len() + 1);
    frame.extend_from_slice(line.as_bytes());
    frame.push(b'\n');

    out.write_all(&frame)?;
    out.flush()?;
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────

fn map_serial_error(e: serialport::Error) -> TransportError {
    match e.kind() {
        serialport::ErrorKind::NoDevice => TransportError::Disconnected,
        serialport::ErrorKind::Io(kind) => std::io::Error::new(kind, e.description).into(),
        _ => TransportError::Io(e.to_string()),
    }
}

/// On Windows, COM ports >= 10 need the `\\.\COMxx` form.
#[cfg(target_os = "windows")]
fn platform_port_name(port: &str) -> String {
    if port.starts_with("COM") && !port.starts_with(r"\\") {
        format!(r"\\.\{}", port)
    } else {
        port.to_owned()
    }
}

#[cfg(not(target_os = "windows"))]
fn platform_port_name(port: &str) -> String {
    port.to_owned()
}
