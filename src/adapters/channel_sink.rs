//! Channel event sink adapter.
//!
//! Forwards console events to the presentation thread over a bounded
//! crossbeam channel, so UI code never runs on the listener thread.
//!
//! Sends never block: the listener emits while holding the service lock,
//! and a stalled UI must not stall reading or operator commands. When the
//! queue is full the event is dropped and logged; the console state stays
//! authoritative and can always be re-read with a snapshot.
//!
//! ```text
//! ┌──────────────┐  ConsoleEvent  ┌──────────────┐
//! │   Listener   │──────────────▶│ Presentation │
//! │   (thread)   │               │   (thread)   │
//! └──────────────┘               └──────────────┘
//! ```

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use log::{debug, warn};

use crate::app::events::ConsoleEvent;
use crate::app::ports::EventSink;

/// Events queued for the presentation thread before new ones are dropped.
pub const EVENT_QUEUE_DEPTH: usize = 256;

/// Sending side of the presentation channel.
#[derive(Clone)]
pub struct ChannelSink {
    tx: Sender<ConsoleEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver the presentation layer drains.
    pub fn new() -> (Self, Receiver<ConsoleEvent>) {
        Self::with_capacity(EVENT_QUEUE_DEPTH)
    }

    pub fn with_capacity(depth: usize) -> (Self, Receiver<ConsoleEvent>) {
        let (tx, rx) = bounded(depth);
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: &ConsoleEvent) {
        match self.tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("presentation channel full, dropping {:?}", event);
            }
            // The UI is gone; the core keeps running.
            Err(TrySendError::Disconnected(event)) => {
                debug!("presentation channel closed, dropping {:?}", event);
            }
        }
    }
}
