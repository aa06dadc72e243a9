//! Fulfillment engine
//!
//! Consumes oracle callbacks and turns them into issued collectibles:
//!
//! ```text
//! onFulfilled(request_id, words)
//!       │
//!       ├─ consume(request_id)        reject UnknownRequest
//!       ├─ resolve(words[0])          weighted bucket -> trait index
//!       ├─ catalog[trait_index]       trait URI
//!       ├─ token_id = counter++       atomic, monotonic, gapless
//!       ├─ bind token_id -> URI       write-once
//!       └─ emit Minted
//! ```
//!
//! Each request is `Submitted -> Fulfilled` or `Submitted -> Rejected`,
//! nothing else. The consume step is exactly-once, so no request can be
//! fulfilled twice. A defensive failure after consume (misconfigured
//! buckets, undersized catalog) reinstates the record and leaves the token
//! counter untouched, so the ledger never shows a consumed request with no
//! issued asset.

use crate::catalog::Catalog;
use crate::config::MintConfig;
use crate::error::MintError;
use crate::events::{EventHub, MintEvent};
use crate::ledger::{RequestLedger, RequestRecord};
use crate::oracle::RandomnessOracle;
use crate::resolver::TraitTable;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// A finalized collectible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAsset {
    /// Sequential id assigned at issuance, starting from 0
    pub token_id: u64,
    /// Resolved trait index
    pub trait_index: usize,
    /// Display name of the resolved trait
    pub trait_name: String,
    /// The original requester
    pub owner: String,
    /// Content-addressed locator bound to the token
    pub uri: String,
}

/// The mint engine: request ledger, trait resolution, catalog lookup, and
/// token issuance behind one constructor-validated pairing.
pub struct MintEngine {
    ledger: RequestLedger,
    table: TraitTable,
    catalog: Catalog,
    events: Arc<EventHub>,
    /// Sole source of token ids; post-increment per issuance
    token_counter: AtomicU64,
    /// Write-once token id -> URI bindings
    token_uris: DashMap<u64, String>,
}

impl std::fmt::Debug for MintEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MintEngine")
            .field("table", &self.table)
            .field("catalog", &self.catalog)
            .field("token_counter", &self.token_counter)
            .finish_non_exhaustive()
    }
}

impl MintEngine {
    /// Construct an engine from one configuration object.
    ///
    /// The trait table and catalog are validated as a pair here: a catalog
    /// whose size differs from the trait count is a configuration bug and
    /// is rejected before any request can be accepted.
    pub fn new(
        config: &MintConfig,
        catalog: Catalog,
        oracle: Arc<dyn RandomnessOracle>,
    ) -> Result<Self, MintError> {
        config.validate()?;
        let table = TraitTable::from_config(config)?;
        catalog.validate_complete(table.len())?;

        let events = Arc::new(EventHub::new());
        let ledger = RequestLedger::new(
            oracle,
            Arc::clone(&events),
            config.mint_fee,
            config.num_words,
        );

        info!(
            traits = table.len(),
            modulus = table.modulus(),
            mint_fee = config.mint_fee,
            "Mint engine initialized"
        );

        Ok(Self {
            ledger,
            table,
            catalog,
            events,
            token_counter: AtomicU64::new(0),
            token_uris: DashMap::new(),
        })
    }

    /// Accept a mint request; returns the oracle's request id.
    ///
    /// Thin passthrough to [`RequestLedger::submit`].
    pub async fn request_mint(&self, requester: &str, fee_paid: u64) -> Result<u64, MintError> {
        self.ledger.submit(requester, fee_paid).await
    }

    /// Inbound oracle callback: issue a collectible for a fulfilled request.
    ///
    /// Rejects with `UnknownRequest` when the id has no outstanding record
    /// (duplicate, replayed, or forged callback). The first random word
    /// drives trait resolution; defensive failures past the consume step
    /// roll the record back.
    pub async fn fulfill_random_words(
        &self,
        request_id: u64,
        words: &[u64],
    ) -> Result<IssuedAsset, MintError> {
        let record = match self.ledger.consume(request_id).await {
            Some(record) => record,
            None => {
                warn!(
                    request_id = request_id,
                    "Rejected fulfillment for unknown request (duplicate, replayed, or forged callback)"
                );
                return Err(MintError::UnknownRequest(request_id));
            }
        };

        match self.issue(&record, words) {
            Ok(asset) => {
                info!(
                    token_id = asset.token_id,
                    trait_index = asset.trait_index,
                    trait_name = %asset.trait_name,
                    owner = %asset.owner,
                    "Minted collectible"
                );

                self.events.emit(MintEvent::Minted {
                    token_id: asset.token_id,
                    trait_index: asset.trait_index,
                    trait_name: asset.trait_name.clone(),
                    owner: asset.owner.clone(),
                });

                Ok(asset)
            }
            Err(e) => {
                // Ledger must not show a consumed request with no asset
                self.ledger.reinstate(record).await;
                Err(e)
            }
        }
    }

    /// Resolve, look up, assign, and bind. The counter only moves once
    /// every fallible step has succeeded, so failures leave no gap.
    fn issue(&self, record: &RequestRecord, words: &[u64]) -> Result<IssuedAsset, MintError> {
        let raw_random = words
            .first()
            .copied()
            .ok_or(MintError::EmptyRandomWords(record.request_id))?;

        let trait_index = self.table.resolve(raw_random)?;
        let uri = self.catalog.uri(trait_index)?.to_string();
        let trait_name = self
            .table
            .trait_name(trait_index)
            .unwrap_or_default()
            .to_string();

        let token_id = self.token_counter.fetch_add(1, Ordering::SeqCst);
        self.token_uris.insert(token_id, uri.clone());

        Ok(IssuedAsset {
            token_id,
            trait_index,
            trait_name,
            owner: record.requester.clone(),
            uri,
        })
    }

    /// Subscribe to mint lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<MintEvent> {
        self.events.subscribe()
    }

    /// The request ledger
    pub fn ledger(&self) -> &RequestLedger {
        &self.ledger
    }

    /// The trait table
    pub fn trait_table(&self) -> &TraitTable {
        &self.table
    }

    /// The configured mint fee
    pub fn mint_fee(&self) -> u64 {
        self.ledger.mint_fee()
    }

    /// Next token id to be assigned (equals the number of issued assets)
    pub fn token_counter(&self) -> u64 {
        self.token_counter.load(Ordering::SeqCst)
    }

    /// The URI bound to an issued token
    pub fn token_uri(&self, token_id: u64) -> Option<String> {
        self.token_uris.get(&token_id).map(|u| u.clone())
    }

    /// The catalog URI for a trait index
    pub fn trait_uri(&self, trait_index: usize) -> Result<&str, MintError> {
        self.catalog.uri(trait_index)
    }
}
