//! Kennel Mint - randomized collectible mint engine
//!
//! Issues unique collectibles whose visual trait is picked by an external
//! randomness oracle and whose display URI comes from a content-addressed
//! trait catalog.
//!
//! ## Architecture
//!
//! ```text
//! caller ──submit(fee)──► RequestLedger ──request──► oracle (external)
//!                              │                        │
//!                              │  record {id, requester}│ callback
//!                              ▼                        ▼
//!                         MintEngine ◄──fulfill_random_words(id, words)
//!                              │
//!                              ├─► TraitTable   (weighted buckets)
//!                              ├─► Catalog      (trait -> ipfs:// URI)
//!                              └─► MintEvent    (Requested / Minted)
//! ```
//!
//! The catalog is built once through a [`content_store::ContentStore`]
//! collaborator and is immutable afterwards. The resolver's bucket table and
//! the catalog are constructed from the same [`config::MintConfig`], so a
//! size mismatch between them is rejected at startup instead of surfacing
//! as a bad lookup mid-fulfillment.
//!
//! ## Collaborator boundaries
//!
//! | Collaborator    | Consumed as                              |
//! |-----------------|------------------------------------------|
//! | Randomness oracle | [`oracle::RandomnessOracle`] trait     |
//! | Content store     | [`content_store::ContentStore`] trait  |
//!
//! Both are black boxes: the oracle delivers exactly one callback per
//! accepted request at some arbitrary later time, and the store maps bytes
//! to content identifiers.

pub mod catalog;
pub mod config;
pub mod content_store;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod oracle;
pub mod resolver;

// Re-exports
pub use catalog::{Catalog, CatalogBuilder, CatalogBuilderConfig, CatalogEntry, ImageSource};
pub use config::{MintConfig, TraitSpec};
pub use content_store::{ContentStore, MemoryStore, PinningStore, PinningStoreConfig};
pub use engine::{IssuedAsset, MintEngine};
pub use error::MintError;
pub use events::{EventHub, MintEvent};
pub use ledger::{RequestLedger, RequestRecord};
pub use oracle::{MockCoordinator, RandomnessOracle};
pub use resolver::{TraitBucket, TraitTable};
