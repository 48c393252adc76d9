//! Board wire protocol.
//!
//! Newline-delimited ASCII in both directions:
//!
//! ```text
//!  board ──▶ host   TEMP:<decimal>\n     e.g. TEMP:28.5
//!                   DOOR:<string>\n      e.g. DOOR:OPEN
//!  host ──▶ board   LAMP_ON | LAMP_OFF | PLUG_ON | PLUG_OFF \n
//! ```
//!
//! There is no framing beyond the newline and no acknowledgement. Any
//! inbound line that does not match the grammar is reported as
//! [`Event::Malformed`] and discarded by the service.

pub mod codec;
mod decoder;
mod encoder;

pub use decoder::decode;
pub use encoder::encode;

/// A decoded, typed unit of information derived from one inbound line.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `TEMP:<decimal>`
    TemperatureReading { celsius: f32 },
    /// `DOOR:<string>`, status taken verbatim (may be empty).
    DoorStatus { status: String },
    /// Anything else, kept verbatim for diagnostics.
    Malformed { raw: String },
}
