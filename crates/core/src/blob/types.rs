//! Blob metadata types.

use blobvault_shared::{BlobId, OwnerId, Provider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::StorageLocation;

/// Metadata persisted for every stored blob.
///
/// The pair (`provider`, `location`) is what resolves the content; a location
/// is never valid against another provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRecord {
    /// Blob ID.
    pub id: BlobId,
    /// Identity that uploaded the blob.
    pub owner_id: OwnerId,
    /// Original filename.
    pub filename: String,
    /// Content type (MIME type).
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Backend holding the content.
    pub provider: Provider,
    /// Location returned by the backend.
    pub location: StorageLocation,
    /// Upload time.
    pub created_at: DateTime<Utc>,
}

impl BlobRecord {
    /// Whether `owner` owns this blob.
    #[must_use]
    pub fn is_owned_by(&self, owner: OwnerId) -> bool {
        self.owner_id == owner
    }
}
