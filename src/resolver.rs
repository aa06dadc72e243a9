//! Weighted-bucket trait resolution
//!
//! Maps a raw random value from the oracle to a trait index using fixed
//! cumulative-probability buckets. The reference table:
//!
//! ```text
//! [0, 10)   -> trait 0 (pug,        10%)
//! [10, 30)  -> trait 1 (shiba-inu,  20%)
//! [30, 100) -> trait 2 (st-bernard, 70%)
//! ```
//!
//! Resolution is pure and deterministic: `resolve(x)` always returns the
//! same index for the same `x`, with no side effects.

use crate::config::{MintConfig, TraitSpec};
use crate::error::MintError;

/// One half-open bucket in the modulus range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitBucket {
    /// Inclusive lower bound
    pub lower: u64,
    /// Exclusive upper bound
    pub upper: u64,
    /// Trait index this bucket selects
    pub trait_index: usize,
}

/// Ordered bucket table for weighted trait selection
#[derive(Debug, Clone)]
pub struct TraitTable {
    buckets: Vec<TraitBucket>,
    names: Vec<String>,
    modulus: u64,
}

impl TraitTable {
    /// Build the bucket table from an ordered trait list.
    ///
    /// Buckets are laid out end to end in list order, so they partition
    /// `[0, modulus)` exactly with no gaps or overlaps. Trait indices match
    /// list positions; catalog entries must be built from the same list.
    pub fn new(traits: &[TraitSpec]) -> Result<Self, MintError> {
        if traits.is_empty() {
            return Err(MintError::Config("trait table is empty".to_string()));
        }

        let mut buckets = Vec::with_capacity(traits.len());
        let mut names = Vec::with_capacity(traits.len());
        let mut cursor = 0u64;

        for (trait_index, spec) in traits.iter().enumerate() {
            if spec.weight == 0 {
                return Err(MintError::Config(format!(
                    "trait '{}' has zero weight",
                    spec.name
                )));
            }
            let upper = cursor.checked_add(spec.weight).ok_or_else(|| {
                MintError::Config(format!(
                    "trait weights overflow u64 at '{}'",
                    spec.name
                ))
            })?;
            buckets.push(TraitBucket {
                lower: cursor,
                upper,
                trait_index,
            });
            names.push(spec.name.clone());
            cursor = upper;
        }

        Ok(Self {
            buckets,
            names,
            modulus: cursor,
        })
    }

    /// Build the reference table from a config
    pub fn from_config(config: &MintConfig) -> Result<Self, MintError> {
        Self::new(&config.traits)
    }

    /// Resolve a raw random value to a trait index.
    ///
    /// Reduces the value modulo the table's range, then walks the buckets.
    pub fn resolve(&self, raw_random: u64) -> Result<usize, MintError> {
        self.resolve_modded(raw_random % self.modulus)
    }

    /// Resolve an already-reduced value against the buckets.
    ///
    /// Fails with `RangeOutOfBounds` when no bucket matches. Unreachable
    /// via `resolve`, which always reduces below the modulus first; a bare
    /// call with `modded >= modulus` exercises the invariant check.
    pub fn resolve_modded(&self, modded: u64) -> Result<usize, MintError> {
        for bucket in &self.buckets {
            if modded >= bucket.lower && modded < bucket.upper {
                return Ok(bucket.trait_index);
            }
        }
        Err(MintError::RangeOutOfBounds(modded))
    }

    /// Display name for a trait index
    pub fn trait_name(&self, trait_index: usize) -> Option<&str> {
        self.names.get(trait_index).map(|s| s.as_str())
    }

    /// Number of traits in the table
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket widths
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// The ordered buckets
    pub fn buckets(&self) -> &[TraitBucket] {
        &self.buckets
    }
}
