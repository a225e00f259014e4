//! Domain error types

use thiserror::Error;

/// Domain-level errors for catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The input was rejected before any storage access
    #[error("{0}")]
    Validation(String),

    /// The resource does not exist, or is not visible to the caller
    #[error("{0}")]
    NotFound(String),

    /// Stored data violates an invariant the storage layer should guarantee,
    /// e.g. a product without its detail row
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// Any failure of the underlying storage
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Result type for domain operations
pub type Result<T> = std::result::Result<T, CatalogError>;
