//! Trait catalog construction
//!
//! Uploads image assets to the content-addressed store, generates per-asset
//! metadata documents, uploads those too, and produces the ordered
//! trait -> URI table the fulfillment engine reads.
//!
//! ## Pipeline (per asset)
//!
//! ```text
//! image bytes ──store──► image cid
//!                           │
//!                           ▼
//! metadata {name, description, image: <scheme>://<image cid>, attributes}
//!                           │
//!                         store
//!                           ▼
//! CatalogEntry { trait_index, uri: <scheme>://<metadata cid> }
//! ```
//!
//! Entry order defines trait indices, which is why the builder and the
//! resolver's bucket table are constructed from the same `MintConfig` trait
//! list. A failed upload is logged and skipped; callers must check the built
//! catalog against the expected trait count before serving traffic.
//!
//! Re-running a build uploads everything again. Idempotence is the caller's
//! concern (content-addressed backends dedupe identical bytes anyway).

use crate::content_store::ContentStore;
use crate::error::MintError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// File-extension suffixes stripped from display names
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// A raw image asset with its display name
#[derive(Debug, Clone)]
pub struct ImageSource {
    /// Display name, typically a file name like "pug.png"
    pub name: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl ImageSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Display name with any image extension stripped
    pub fn base_name(&self) -> &str {
        for ext in IMAGE_EXTENSIONS {
            if let Some(stripped) = self.name.strip_suffix(ext) {
                return stripped;
            }
        }
        &self.name
    }
}

/// A single metadata attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// Per-asset metadata document stored alongside the image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<Attribute>,
}

impl TokenMetadata {
    /// Build the document for an asset from its base name and image locator
    fn for_asset(base_name: &str, image_uri: String) -> Self {
        Self {
            name: base_name.to_string(),
            description: format!("An adorable {} pup!", base_name),
            image: image_uri,
            attributes: vec![Attribute {
                trait_type: "Cuteness".to_string(),
                value: "100".to_string(),
            }],
        }
    }
}

/// One row of the trait -> URI table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Position in the catalog; matches the resolver's trait index
    pub trait_index: usize,
    /// Content-addressed locator of the metadata document
    pub uri: String,
}

/// Ordered, immutable-after-construction trait -> URI table
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog directly from an ordered URI list (pre-built catalogs)
    pub fn from_uris(uris: Vec<String>) -> Self {
        let entries = uris
            .into_iter()
            .enumerate()
            .map(|(trait_index, uri)| CatalogEntry { trait_index, uri })
            .collect();
        Self { entries }
    }

    /// Look up the URI for a trait index
    pub fn uri(&self, trait_index: usize) -> Result<&str, MintError> {
        self.entries
            .get(trait_index)
            .map(|e| e.uri.as_str())
            .ok_or(MintError::CatalogIndexOutOfRange {
                index: trait_index,
                size: self.entries.len(),
            })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The ordered entries
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Verify the catalog holds exactly the expected number of entries.
    ///
    /// A build with skipped uploads produces an undersized catalog; this is
    /// the gate callers run before wiring the catalog into an engine.
    pub fn validate_complete(&self, expected: usize) -> Result<(), MintError> {
        if self.entries.len() != expected {
            return Err(MintError::CatalogIncomplete {
                expected,
                actual: self.entries.len(),
            });
        }
        Ok(())
    }
}

/// Configuration for catalog builds
#[derive(Debug, Clone)]
pub struct CatalogBuilderConfig {
    /// URI scheme prefix for locators (default: "ipfs")
    pub uri_scheme: String,
    /// Per-asset timeout covering both uploads
    pub upload_timeout: Duration,
}

impl Default for CatalogBuilderConfig {
    fn default() -> Self {
        Self {
            uri_scheme: "ipfs".to_string(),
            upload_timeout: Duration::from_secs(60),
        }
    }
}

/// Builds trait catalogs through a content store collaborator
pub struct CatalogBuilder {
    store: Arc<dyn ContentStore>,
    config: CatalogBuilderConfig,
}

impl CatalogBuilder {
    pub fn new(store: Arc<dyn ContentStore>, config: CatalogBuilderConfig) -> Self {
        Self { store, config }
    }

    fn locator(&self, cid: &str) -> String {
        format!("{}://{}", self.config.uri_scheme, cid)
    }

    /// Upload all assets and build the ordered catalog.
    ///
    /// Assets that fail to upload (either store call, or the per-asset
    /// timeout) are skipped; remaining entries keep catalog order. The
    /// result may therefore be undersized - run
    /// [`Catalog::validate_complete`] before serving it.
    pub async fn build(&self, sources: &[ImageSource]) -> Catalog {
        let mut entries = Vec::with_capacity(sources.len());

        for source in sources {
            match timeout(self.config.upload_timeout, self.build_entry(source)).await {
                Ok(Ok(uri)) => {
                    let trait_index = entries.len();
                    info!(
                        trait_index = trait_index,
                        name = %source.base_name(),
                        uri = %uri,
                        "Catalog entry built"
                    );
                    entries.push(CatalogEntry { trait_index, uri });
                }
                Ok(Err(e)) => {
                    warn!(name = %source.name, error = %e, "Skipping asset: upload failed");
                }
                Err(_) => {
                    warn!(
                        name = %source.name,
                        timeout_secs = self.config.upload_timeout.as_secs(),
                        "Skipping asset: upload timed out"
                    );
                }
            }
        }

        info!(
            entries = entries.len(),
            sources = sources.len(),
            "Catalog build finished"
        );

        Catalog { entries }
    }

    /// Store one image plus its metadata document; returns the final URI
    async fn build_entry(&self, source: &ImageSource) -> Result<String, MintError> {
        let image_cid = self.store.store(&source.bytes, &source.name).await?;

        let base_name = source.base_name();
        let metadata = TokenMetadata::for_asset(base_name, self.locator(&image_cid));
        let doc = serde_json::to_value(&metadata)?;

        let metadata_cid = self.store.store_json(&doc, base_name).await?;
        Ok(self.locator(&metadata_cid))
    }
}
