//! Content-addressed storage collaborator
//!
//! The catalog builder stores raw image bytes and metadata documents through
//! this boundary and gets back an opaque content identifier. Two
//! implementations:
//!
//! - [`MemoryStore`] - in-process, computes real CIDv1/SHA2-256 identifiers;
//!   used by tests and local catalog builds
//! - [`PinningStore`] - HTTP client for a Pinata-compatible pinning service
//!
//! Identifiers are CIDv1 with the raw codec, so `ipfs://<cid>` locators built
//! from them resolve on any IPFS-compatible gateway.

use crate::error::MintError;
use async_trait::async_trait;
use cid::Cid;
use dashmap::DashMap;
use multihash_codetable::{Code, MultihashDigest};
use serde::Deserialize;
use tracing::{debug, info};

/// IPLD raw codec for CIDv1
const RAW_CODEC: u64 = 0x55;

/// Compute the CIDv1 (raw codec, SHA2-256) for a byte slice
pub fn compute_cid(data: &[u8]) -> String {
    let hash = Code::Sha2_256.digest(data);
    Cid::new_v1(RAW_CODEC, hash).to_string()
}

/// Storage collaborator: store bytes, get back a content identifier
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store raw bytes under an optional display name
    async fn store(&self, data: &[u8], name: &str) -> Result<String, MintError>;

    /// Store a JSON document.
    ///
    /// Default implementation serializes and stores the bytes; the pinning
    /// store overrides this to use the service's JSON endpoint.
    async fn store_json(
        &self,
        value: &serde_json::Value,
        name: &str,
    ) -> Result<String, MintError> {
        let bytes = serde_json::to_vec(value)?;
        self.store(&bytes, name).await
    }
}

/// In-process content store
///
/// Content-addresses bytes with real CIDs and keeps them in a concurrent
/// map. Storing the same bytes twice yields the same identifier, like any
/// content-addressed backend.
#[derive(Default)]
pub struct MemoryStore {
    blobs: DashMap<String, Vec<u8>>,
    /// Names that fail on store, for exercising partial-failure paths
    failing_names: DashMap<String, ()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every store call for `name` fail
    pub fn fail_on(&self, name: &str) {
        self.failing_names.insert(name.to_string(), ());
    }

    /// Retrieve stored bytes by content identifier
    pub fn get(&self, cid: &str) -> Option<Vec<u8>> {
        self.blobs.get(cid).map(|b| b.clone())
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn store(&self, data: &[u8], name: &str) -> Result<String, MintError> {
        if self.failing_names.contains_key(name) {
            return Err(MintError::ContentStore(format!(
                "injected failure for '{}'",
                name
            )));
        }

        let cid = compute_cid(data);
        self.blobs.insert(cid.clone(), data.to_vec());
        debug!(cid = %cid, name = %name, size = data.len(), "Stored blob in memory");
        Ok(cid)
    }
}

/// Pinning service response carrying the content identifier
#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Configuration for the pinning-service store
#[derive(Debug, Clone)]
pub struct PinningStoreConfig {
    /// Base URL of the pinning API
    pub base_url: String,
    /// API key header value
    pub api_key: String,
    /// API secret header value
    pub api_secret: String,
    /// Request timeout
    pub request_timeout: std::time::Duration,
}

impl Default for PinningStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.pinata.cloud".to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            request_timeout: std::time::Duration::from_secs(60),
        }
    }
}

/// HTTP content store backed by a Pinata-compatible pinning service
pub struct PinningStore {
    config: PinningStoreConfig,
    client: reqwest::Client,
}

impl PinningStore {
    pub fn new(config: PinningStoreConfig) -> Result<Self, MintError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        info!(base_url = %config.base_url, "PinningStore created");

        Ok(Self { config, client })
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("pinata_api_key", &self.config.api_key)
            .header("pinata_secret_api_key", &self.config.api_secret)
    }
}

#[async_trait]
impl ContentStore for PinningStore {
    async fn store(&self, data: &[u8], name: &str) -> Result<String, MintError> {
        let url = format!("{}/pinning/pinFileToIPFS", self.config.base_url);

        let metadata = serde_json::json!({ "name": name }).to_string();
        let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("pinataMetadata", metadata);

        let response = self
            .authed(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MintError::ContentStore(format!(
                "pin file failed with status {}",
                response.status()
            )));
        }

        let pin: PinResponse = response.json().await?;
        debug!(cid = %pin.ipfs_hash, name = %name, "Pinned file");
        Ok(pin.ipfs_hash)
    }

    async fn store_json(
        &self,
        value: &serde_json::Value,
        name: &str,
    ) -> Result<String, MintError> {
        let url = format!("{}/pinning/pinJSONToIPFS", self.config.base_url);

        let body = serde_json::json!({
            "pinataContent": value,
            "pinataMetadata": { "name": name },
        });

        let response = self
            .authed(self.client.post(&url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MintError::ContentStore(format!(
                "pin JSON failed with status {}",
                response.status()
            )));
        }

        let pin: PinResponse = response.json().await?;
        debug!(cid = %pin.ipfs_hash, name = %name, "Pinned JSON document");
        Ok(pin.ipfs_hash)
    }
}
