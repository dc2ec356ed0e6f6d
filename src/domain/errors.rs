//! Error taxonomy of the link registry and its persistence adapter.
//!
//! Registry errors are returned before any state is touched, so a caller
//! that receives one can assume the registry is unchanged.

use thiserror::Error;
use uuid::Uuid;

/// Why a creation batch was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreationError {
    #[error("Please enter at least one URL")]
    EmptyBatch,

    #[error("Invalid URL: {0} (include http:// or https://)")]
    InvalidUrl(String),

    #[error("Duplicate custom code in request: {0}")]
    DuplicateCustomCode(String),

    #[error("Code \"{0}\" already exists")]
    CodeAlreadyExists(String),

    #[error("Code \"{0}\" is reserved")]
    ReservedCode(String),
}

/// Why a short code could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Short link not found: {0}")]
    NotFound(String),

    #[error("Short link expired: {0}")]
    Expired(String),
}

/// No record with the given id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Link not found: {0}")]
pub struct NotFoundError(pub Uuid);

/// Failure of the persistence adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored links are malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored links share the short code {0}")]
    DuplicateCode(String),
}
