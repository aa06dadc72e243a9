//! Configuration for the mint engine
//!
//! One `MintConfig` carries both the trait weight table and the catalog
//! expectations, so the resolver and catalog are always constructed as a
//! validated pair. A catalog whose size differs from the trait count is
//! rejected at engine construction, never discovered at fulfillment time.

use crate::error::MintError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// One visual trait with its selection weight.
///
/// Weights are bucket widths: the ordered trait list partitions
/// `[0, sum_of_weights)` into half-open buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitSpec {
    /// Display name, also used to derive metadata document names
    pub name: String,
    /// Bucket width in the modulus range
    pub weight: u64,
}

/// Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintConfig {
    /// Fee required to submit a mint request
    #[serde(default = "default_mint_fee")]
    pub mint_fee: u64,

    /// Number of random words requested from the oracle per mint
    #[serde(default = "default_num_words")]
    pub num_words: u32,

    /// Ordered trait table; order defines trait indices
    #[serde(default = "default_traits")]
    pub traits: Vec<TraitSpec>,

    /// URI scheme prefix for content-addressed locators
    #[serde(default = "default_uri_scheme")]
    pub uri_scheme: String,

    /// Per-asset upload timeout in seconds for catalog builds
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
}

fn default_mint_fee() -> u64 {
    10_000_000
}

fn default_num_words() -> u32 {
    1
}

fn default_uri_scheme() -> String {
    "ipfs".to_string()
}

fn default_upload_timeout() -> u64 {
    60
}

fn default_traits() -> Vec<TraitSpec> {
    vec![
        TraitSpec {
            name: "pug".to_string(),
            weight: 10,
        },
        TraitSpec {
            name: "shiba-inu".to_string(),
            weight: 20,
        },
        TraitSpec {
            name: "st-bernard".to_string(),
            weight: 70,
        },
    ]
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            mint_fee: default_mint_fee(),
            num_words: default_num_words(),
            traits: default_traits(),
            uri_scheme: default_uri_scheme(),
            upload_timeout_secs: default_upload_timeout(),
        }
    }
}

impl MintConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MintError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| MintError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the trait table
    ///
    /// The trait list must be non-empty and every weight non-zero so the
    /// buckets partition the modulus range with no gaps.
    pub fn validate(&self) -> Result<(), MintError> {
        if self.traits.is_empty() {
            return Err(MintError::Config("trait table is empty".to_string()));
        }
        if let Some(t) = self.traits.iter().find(|t| t.weight == 0) {
            return Err(MintError::Config(format!(
                "trait '{}' has zero weight",
                t.name
            )));
        }
        self.traits
            .iter()
            .try_fold(0u64, |acc, t| acc.checked_add(t.weight))
            .ok_or_else(|| MintError::Config("trait weights overflow u64".to_string()))?;
        Ok(())
    }

    /// Sum of all bucket widths; the modulus for trait resolution.
    ///
    /// Saturates rather than panicking on pathological weights; `validate`
    /// rejects such a table before it reaches a resolver.
    pub fn modulus(&self) -> u64 {
        self.traits.iter().fold(0u64, |acc, t| acc.saturating_add(t.weight))
    }

    /// Per-asset upload timeout as a `Duration`
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}
