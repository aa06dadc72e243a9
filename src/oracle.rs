//! Randomness oracle collaborator
//!
//! The oracle is a black box: the ledger submits a request and gets back an
//! oracle-assigned request id; at some arbitrary later time the oracle
//! delivers exactly one callback with the random words. Delivery enters the
//! core through [`crate::engine::MintEngine::fulfill_random_words`] - the
//! core never polls or blocks waiting on the oracle.

use crate::error::MintError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// Submission side of the oracle protocol
#[async_trait]
pub trait RandomnessOracle: Send + Sync {
    /// Request `num_words` random words; returns the oracle's request id
    async fn request_random_words(&self, num_words: u32) -> Result<u64, MintError>;
}

/// In-process oracle coordinator for tests and local runs
///
/// Assigns sequential request ids and tracks which requests are still
/// awaiting delivery. Tests drive delivery themselves by calling the
/// engine's inbound handler with an id taken from here, which mirrors how
/// a coordinator mock pushes callbacks in the original protocol.
#[derive(Default)]
pub struct MockCoordinator {
    next_id: AtomicU64,
    outstanding: Mutex<HashMap<u64, u32>>,
}

impl MockCoordinator {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            outstanding: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a request id was issued and not yet delivered
    pub async fn is_outstanding(&self, request_id: u64) -> bool {
        self.outstanding.lock().await.contains_key(&request_id)
    }

    /// Number of requests awaiting delivery
    pub async fn outstanding_count(&self) -> usize {
        self.outstanding.lock().await.len()
    }

    /// Mark a request as delivered; returns its `num_words` if it was
    /// outstanding. Second delivery of the same id returns `None`, matching
    /// the exactly-once contract.
    pub async fn take_request(&self, request_id: u64) -> Option<u32> {
        self.outstanding.lock().await.remove(&request_id)
    }
}

#[async_trait]
impl RandomnessOracle for MockCoordinator {
    async fn request_random_words(&self, num_words: u32) -> Result<u64, MintError> {
        let request_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.outstanding.lock().await.insert(request_id, num_words);

        debug!(request_id = request_id, num_words = num_words, "Random words requested");
        Ok(request_id)
    }
}
