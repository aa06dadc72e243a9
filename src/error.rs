//! Error types for kennel-mint

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MintError {
    #[error("Insufficient fee: paid {paid}, mint fee is {required}")]
    InsufficientFee { paid: u64, required: u64 },

    #[error("Unknown request: {0}")]
    UnknownRequest(u64),

    #[error("Modded random value out of bucket range: {0}")]
    RangeOutOfBounds(u64),

    #[error("Catalog index out of range: index {index}, catalog size {size}")]
    CatalogIndexOutOfRange { index: usize, size: usize },

    #[error("Catalog incomplete: expected {expected} entries, built {actual}")]
    CatalogIncomplete { expected: usize, actual: usize },

    #[error("Oracle delivered no random words for request {0}")]
    EmptyRandomWords(u64),

    #[error("Content store error: {0}")]
    ContentStore(String),

    #[error("Upload timeout: {0}")]
    UploadTimeout(String),

    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
