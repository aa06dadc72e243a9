//! End-to-end mint flow tests
//!
//! Drives the full pipeline without external services: catalog build
//! through the in-memory content store, request submission against the mock
//! coordinator, and oracle callback delivery into the engine.

use kennel_mint::{
    Catalog, CatalogBuilder, CatalogBuilderConfig, ImageSource, MemoryStore, MintConfig,
    MintEngine, MintError, MintEvent, MockCoordinator,
};
use std::sync::Arc;

const MINT_FEE: u64 = 10_000_000;

/// Install the test tracing subscriber once; later calls are no-ops.
/// Run with RUST_LOG=kennel_mint=debug to see the pipeline's logging.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn build_catalog(store: Arc<MemoryStore>) -> Catalog {
    let builder = CatalogBuilder::new(store, CatalogBuilderConfig::default());
    builder
        .build(&[
            ImageSource::new("pug.png", b"pug image".to_vec()),
            ImageSource::new("shiba-inu.png", b"shiba image".to_vec()),
            ImageSource::new("st-bernard.png", b"bernard image".to_vec()),
        ])
        .await
}

async fn build_engine() -> (MintEngine, Arc<MockCoordinator>) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let catalog = build_catalog(store).await;
    let oracle = Arc::new(MockCoordinator::new());
    let engine = MintEngine::new(&MintConfig::default(), catalog, oracle.clone()).unwrap();
    (engine, oracle)
}

#[tokio::test]
async fn test_catalog_serves_ipfs_uris() {
    let (engine, _) = build_engine().await;

    for trait_index in 0..3 {
        assert!(engine.trait_uri(trait_index).unwrap().starts_with("ipfs://"));
    }
}

#[tokio::test]
async fn test_end_to_end_mint() {
    let (engine, oracle) = build_engine().await;
    let mut events = engine.subscribe();

    // Caller pays the fee and submits
    let request_id = engine.request_mint("alice", MINT_FEE).await.unwrap();
    assert!(oracle.is_outstanding(request_id).await);

    // Oracle delivers its one callback; 39 lands in the st-bernard bucket
    oracle.take_request(request_id).await.unwrap();
    let asset = engine
        .fulfill_random_words(request_id, &[39])
        .await
        .unwrap();

    assert_eq!(asset.token_id, 0);
    assert_eq!(asset.trait_index, 2);
    assert_eq!(asset.owner, "alice");
    assert_eq!(engine.token_uri(0).unwrap(), asset.uri);
    assert_eq!(asset.uri, engine.trait_uri(2).unwrap());
    assert_eq!(engine.token_counter(), 1);

    // Replayed callback is rejected, nothing else is issued
    let err = engine
        .fulfill_random_words(request_id, &[39])
        .await
        .unwrap_err();
    assert!(matches!(err, MintError::UnknownRequest(r) if r == request_id));
    assert_eq!(engine.token_counter(), 1);

    // Listener saw both lifecycle signals
    assert!(matches!(
        events.recv().await.unwrap(),
        MintEvent::Requested { requester, .. } if requester == "alice"
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        MintEvent::Minted { token_id: 0, trait_index: 2, .. }
    ));
}

#[tokio::test]
async fn test_fee_below_mint_fee_is_rejected() {
    let (engine, _) = build_engine().await;

    let err = engine.request_mint("alice", MINT_FEE - 1).await.unwrap_err();
    assert!(matches!(err, MintError::InsufficientFee { .. }));
    assert!(engine.ledger().is_empty().await);
}

#[tokio::test]
async fn test_many_requesters_interleaved() {
    let (engine, _) = build_engine().await;

    let alice_req = engine.request_mint("alice", MINT_FEE).await.unwrap();
    let bob_req = engine.request_mint("bob", MINT_FEE).await.unwrap();
    let carol_req = engine.request_mint("carol", MINT_FEE).await.unwrap();
    assert_eq!(engine.ledger().len().await, 3);

    // Fulfillment order differs from submission order
    let bob = engine.fulfill_random_words(bob_req, &[7]).await.unwrap();
    let carol = engine.fulfill_random_words(carol_req, &[21]).await.unwrap();
    let alice = engine.fulfill_random_words(alice_req, &[39]).await.unwrap();

    assert_eq!(bob.token_id, 0);
    assert_eq!(carol.token_id, 1);
    assert_eq!(alice.token_id, 2);

    assert_eq!(bob.trait_index, 0);
    assert_eq!(carol.trait_index, 1);
    assert_eq!(alice.trait_index, 2);

    assert!(engine.ledger().is_empty().await);
}

#[tokio::test]
async fn test_undersized_catalog_rejected_at_construction() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    store.fail_on("shiba-inu.png");
    let catalog = build_catalog(store).await;
    assert_eq!(catalog.len(), 2);

    let err = MintEngine::new(
        &MintConfig::default(),
        catalog,
        Arc::new(MockCoordinator::new()),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        MintError::CatalogIncomplete { expected: 3, actual: 2 }
    ));
}
