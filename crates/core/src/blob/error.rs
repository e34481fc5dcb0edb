//! Blob service error types.

use blobvault_shared::{AppError, BlobId, OwnerId};
use thiserror::Error;

use crate::storage::BlobStorageError;

/// Blob operation errors.
#[derive(Debug, Error)]
pub enum BlobError {
    /// No metadata for this blob.
    #[error("blob not found: {0}")]
    NotFound(BlobId),

    /// Requester does not own the blob.
    #[error("blob {blob_id} is not owned by {owner_id}")]
    Unauthorized {
        /// Blob that was requested.
        blob_id: BlobId,
        /// Identity that requested it.
        owner_id: OwnerId,
    },

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] BlobStorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl BlobError {
    /// Create an unauthorized error.
    #[must_use]
    pub fn unauthorized(blob_id: BlobId, owner_id: OwnerId) -> Self {
        Self::Unauthorized { blob_id, owner_id }
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<BlobError> for AppError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::NotFound(_) => Self::NotFound(err.to_string()),
            BlobError::Unauthorized { .. } => Self::Forbidden(err.to_string()),
            BlobError::Storage(e) => e.into(),
            BlobError::Repository(msg) => Self::Internal(msg),
        }
    }
}
