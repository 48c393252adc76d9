//! Newline line framer.
//!
//! The framer accumulates incoming bytes and yields complete lines. This
//! handles partial reads gracefully — a single serial read may return part
//! of a line, one line, or several lines concatenated, and a line may
//! straddle a read timeout.
//!
//! Lines are decoded as lossy UTF-8 and trimmed, so `\r\n` endings and
//! stray whitespace never reach the decoder. A line longer than the
//! configured limit is dropped up to its terminating newline and counted;
//! readers surface each drop to the listener. A trailing `\r` does not
//! count against the limit.

use log::debug;

/// Capacity of the line buffer (upper bound for `max_line_len`).
pub const LINE_CAPACITY: usize = 1024;

const DELIMITER: u8 = b'\n';
const CR: u8 = b'\r';

/// Streaming line framer.
pub struct LineFramer {
    buf: heapless::Vec<u8, LINE_CAPACITY>,
    limit: usize,
    /// Set once the current line exceeded `limit`; cleared at the next newline.
    overflowed: bool,
    /// A `\r` arrived with the buffer already full; only a newline may follow.
    trailing_cr: bool,
    dropped: u64,
}

impl LineFramer {
    /// `limit` is clamped to [`LINE_CAPACITY`].
    pub fn new(limit: usize) -> Self {
        Self {
            buf: heapless::Vec::new(),
            limit: limit.min(LINE_CAPACITY),
            overflowed: false,
            trailing_cr: false,
            dropped: 0,
        }
    }

    /// Feed one byte. Returns `Some(line)` when `byte` completes a line.
    pub fn push(&mut self, byte: u8) -> Option<String> {
        if byte == DELIMITER {
            self.trailing_cr = false;
            if core::mem::take(&mut self.overflowed) {
                self.dropped += 1;
                debug!("framer: dropped line longer than {} bytes", self.limit);
                self.buf.clear();
                return None;
            }
            let line = String::from_utf8_lossy(&self.buf).trim().to_owned();
            self.buf.clear();
            return Some(line);
        }

        if self.overflowed {
            return None;
        }
        if self.trailing_cr {
            self.overflowed = true;
            return None;
        }
        if self.buf.len() >= self.limit {
            if byte == CR {
                self.trailing_cr = true;
            } else {
                self.overflowed = true;
            }
            return None;
        }
        if self.buf.push(byte).is_err() {
            self.overflowed = true;
        }
        None
    }

    /// Feed a chunk, appending every completed line to `out` in order.
    pub fn feed(&mut self, data: &[u8], out: &mut impl Extend<String>) {
        out.extend(data.iter().filter_map(|&b| self.push(b)));
    }

    /// Bytes of the current, not yet terminated line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Longest line accepted, in bytes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of overlong lines dropped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Forget any partial line.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflowed = false;
        self.trailing_cr = false;
    }
}
