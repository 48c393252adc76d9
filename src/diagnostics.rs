//! Link diagnostics.
//!
//! Counters kept alongside the console state. They are informational only:
//! nothing in the core changes behaviour based on them. The terminal
//! front-end prints them as JSON on `status`.

use serde::{Deserialize, Serialize};

/// Running totals for the serial link since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetrics {
    /// Every line the listener handed to the decoder.
    pub lines_received: u64,
    /// Lines decoded as `Malformed` or dropped as overlong.
    pub lines_discarded: u64,
    /// Lines longer than `max_line_len`, a subset of `lines_discarded`.
    pub lines_overlong: u64,
    /// Command lines written successfully.
    pub commands_sent: u64,
    /// Command lines whose write failed.
    pub command_failures: u64,
}

impl LinkMetrics {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }
}
