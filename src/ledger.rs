//! Request ledger
//!
//! Tracks every outstanding randomness request from submission until its
//! fulfillment callback arrives, linking the oracle's request id back to the
//! fee-paying requester. The ledger is the single shared mutable resource
//! on the request path; all mutation goes through one lock so that exactly
//! one fulfillment wins a race against duplicate or replayed callbacks.
//!
//! A request id with no record here is rejected, never silently ignored:
//! it is either a replay, a forged callback, or an already-fulfilled
//! request, and the caller should treat it as an integrity signal.

use crate::error::MintError;
use crate::events::{EventHub, MintEvent};
use crate::oracle::RandomnessOracle;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// One outstanding randomness request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    /// Oracle-assigned request id, unique among outstanding records
    pub request_id: u64,
    /// Identity of the fee-paying caller
    pub requester: String,
}

/// Ledger of outstanding requests, keyed by request id
pub struct RequestLedger {
    oracle: Arc<dyn RandomnessOracle>,
    events: Arc<EventHub>,
    /// Fee required per mint request, fixed at construction
    mint_fee: u64,
    /// Random words requested from the oracle per mint
    num_words: u32,
    /// Outstanding records; the single lock serializes submit and consume
    pending: Mutex<HashMap<u64, RequestRecord>>,
}

impl RequestLedger {
    pub fn new(
        oracle: Arc<dyn RandomnessOracle>,
        events: Arc<EventHub>,
        mint_fee: u64,
        num_words: u32,
    ) -> Self {
        Self {
            oracle,
            events,
            mint_fee,
            num_words,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Accept a mint request.
    ///
    /// Rejects with `InsufficientFee` before any state mutation when the
    /// attached payment is below the configured fee. On success, obtains a
    /// fresh request id from the oracle, records the requester, emits a
    /// `Requested` event, and returns the id.
    pub async fn submit(&self, requester: &str, fee_paid: u64) -> Result<u64, MintError> {
        if fee_paid < self.mint_fee {
            return Err(MintError::InsufficientFee {
                paid: fee_paid,
                required: self.mint_fee,
            });
        }

        let request_id = self.oracle.request_random_words(self.num_words).await?;

        {
            let mut pending = self.pending.lock().await;
            pending.insert(
                request_id,
                RequestRecord {
                    request_id,
                    requester: requester.to_string(),
                },
            );
        }

        info!(request_id = request_id, requester = %requester, "Mint request accepted");

        self.events.emit(MintEvent::Requested {
            request_id,
            requester: requester.to_string(),
        });

        Ok(request_id)
    }

    /// Read-only lookup of an outstanding record
    pub async fn lookup(&self, request_id: u64) -> Option<RequestRecord> {
        self.pending.lock().await.get(&request_id).cloned()
    }

    /// Atomically remove and return a record.
    ///
    /// Used exactly once per successful fulfillment: concurrent consumes of
    /// the same id race on the lock, at most one gets the record, the rest
    /// see `None`.
    pub async fn consume(&self, request_id: u64) -> Option<RequestRecord> {
        self.pending.lock().await.remove(&request_id)
    }

    /// Put a consumed record back.
    ///
    /// Compensating rollback for a fulfillment that failed after consume;
    /// keeps the ledger consistent with "no asset issued".
    pub async fn reinstate(&self, record: RequestRecord) {
        warn!(request_id = record.request_id, "Reinstating consumed request after failed fulfillment");
        self.pending.lock().await.insert(record.request_id, record);
    }

    /// Number of outstanding requests
    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.is_empty()
    }

    /// The configured mint fee
    pub fn mint_fee(&self) -> u64 {
        self.mint_fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MockCoordinator;

    fn ledger_with(fee: u64) -> (RequestLedger, Arc<MockCoordinator>) {
        let oracle = Arc::new(MockCoordinator::new());
        let ledger = RequestLedger::new(oracle.clone(), Arc::new(EventHub::new()), fee, 1);
        (ledger, oracle)
    }

    #[tokio::test]
    async fn test_submit_records_requester() {
        let (ledger, oracle) = ledger_with(100);

        let id = ledger.submit("alice", 100).await.unwrap();

        assert_eq!(ledger.len().await, 1);
        assert!(oracle.is_outstanding(id).await);
        let record = ledger.lookup(id).await.unwrap();
        assert_eq!(record.requester, "alice");
        assert_eq!(record.request_id, id);
    }

    #[tokio::test]
    async fn test_insufficient_fee_leaves_ledger_unmodified() {
        let (ledger, oracle) = ledger_with(100);

        let err = ledger.submit("alice", 99).await.unwrap_err();
        assert!(matches!(
            err,
            MintError::InsufficientFee { paid: 99, required: 100 }
        ));
        assert!(ledger.is_empty().await);
        // Fee check happens before the oracle is contacted
        assert_eq!(oracle.outstanding_count().await, 0);
    }

    #[tokio::test]
    async fn test_overpaying_is_accepted() {
        let (ledger, _) = ledger_with(100);
        assert!(ledger.submit("alice", 250).await.is_ok());
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_consume_is_exactly_once() {
        let (ledger, _) = ledger_with(0);
        let id = ledger.submit("alice", 0).await.unwrap();

        let record = ledger.consume(id).await.unwrap();
        assert_eq!(record.requester, "alice");
        assert!(ledger.consume(id).await.is_none());
        assert!(ledger.lookup(id).await.is_none());
    }

    #[tokio::test]
    async fn test_consume_unknown_id() {
        let (ledger, _) = ledger_with(0);
        assert!(ledger.consume(12345).await.is_none());
    }

    #[tokio::test]
    async fn test_reinstate_restores_record() {
        let (ledger, _) = ledger_with(0);
        let id = ledger.submit("alice", 0).await.unwrap();

        let record = ledger.consume(id).await.unwrap();
        ledger.reinstate(record.clone()).await;

        assert_eq!(ledger.lookup(id).await, Some(record));
    }

    #[tokio::test]
    async fn test_concurrent_consume_single_winner() {
        let (ledger, _) = ledger_with(0);
        let ledger = Arc::new(ledger);
        let id = ledger.submit("alice", 0).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move { ledger.consume(id).await }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
