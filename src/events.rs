//! Mint lifecycle notifications
//!
//! The core emits exactly two externally observable signals: a request was
//! accepted, and a collectible was minted. Downstream listeners subscribe
//! through a broadcast channel and must tolerate arbitrary delay between
//! the two - fulfillment timing belongs to the oracle.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

/// Default broadcast channel capacity
const DEFAULT_CAPACITY: usize = 256;

/// Externally observable mint lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MintEvent {
    /// A fee-paying mint request was accepted and forwarded to the oracle
    Requested {
        request_id: u64,
        requester: String,
    },
    /// A collectible was issued from a fulfilled request
    Minted {
        token_id: u64,
        trait_index: usize,
        trait_name: String,
        owner: String,
    },
}

/// Broadcast hub for mint events
pub struct EventHub {
    tx: broadcast::Sender<MintEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to mint events
    pub fn subscribe(&self) -> broadcast::Receiver<MintEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Events are fire-and-forget; with no subscribers the event is dropped.
    pub fn emit(&self, event: MintEvent) {
        if self.tx.receiver_count() > 0 {
            if let Err(e) = self.tx.send(event) {
                warn!(error = %e, "Failed to broadcast mint event");
            }
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
