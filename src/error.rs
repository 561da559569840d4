//! Error types for the catalog engine

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Shard directory could not be enumerated. The engine never becomes ready.
    #[error("Cannot initialize catalog from {dir:?}: {reason}")]
    InitializationFailure { dir: PathBuf, reason: String },

    #[error("Shard {index} is corrupt: {reason}")]
    CorruptShard { index: u32, reason: String },

    #[error("Invalid video id: {0:?}")]
    InvalidId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Get error code for the calling layer
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::InitializationFailure { .. } => "INITIALIZATION_FAILURE",
            CatalogError::CorruptShard { .. } => "CORRUPT_SHARD",
            CatalogError::InvalidId(_) => "INVALID_ID",
            CatalogError::NotFound(_) => "NOT_FOUND",
            CatalogError::InvalidConfig(_) => "INVALID_CONFIG",
            _ => "INTERNAL_ERROR",
        }
    }

    /// True when the caller sent a malformed request (4xx-equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(self, CatalogError::InvalidId(_))
    }

    /// True for "nothing there" outcomes that callers render as an empty result.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}
