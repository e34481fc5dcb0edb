//! Blob service implementation.

use std::sync::Arc;

use blobvault_shared::{BlobId, OwnerId, Provider};
use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use super::error::BlobError;
use super::types::BlobRecord;
use crate::storage::{BlobStorage, DEFAULT_CONTENT_TYPE, PresignedUrl};

/// Repository trait for blob metadata persistence.
///
/// Implemented outside the core by whatever store holds blob metadata.
pub trait BlobRepository: Send + Sync {
    /// Persist a new blob record.
    fn create(
        &self,
        record: BlobRecord,
    ) -> impl std::future::Future<Output = Result<BlobRecord, BlobError>> + Send;

    /// Find a blob record by ID.
    fn find_by_id(
        &self,
        id: BlobId,
    ) -> impl std::future::Future<Output = Result<Option<BlobRecord>, BlobError>> + Send;

    /// List every blob record owned by `owner_id`.
    fn list_by_owner(
        &self,
        owner_id: OwnerId,
    ) -> impl std::future::Future<Output = Result<Vec<BlobRecord>, BlobError>> + Send;

    /// Delete a blob record. Returns whether a record was removed.
    fn delete(
        &self,
        id: BlobId,
    ) -> impl std::future::Future<Output = Result<bool, BlobError>> + Send;
}

/// Blob service combining storage with metadata and ownership rules.
pub struct BlobService<R: BlobRepository> {
    storage: BlobStorage,
    repo: Arc<R>,
}

impl<R: BlobRepository> BlobService<R> {
    /// Create a new blob service.
    #[must_use]
    pub fn new(storage: BlobStorage, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    /// Store content for `owner` and record its metadata.
    ///
    /// If the record cannot be persisted the stored object is removed again.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload or the repository write fails.
    pub async fn upload(
        &self,
        owner_id: OwnerId,
        content: impl Into<Bytes>,
        filename: &str,
        content_type: Option<&str>,
        provider: Provider,
    ) -> Result<BlobRecord, BlobError> {
        let content: Bytes = content.into();
        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let size = content.len() as u64;

        let location = self
            .storage
            .upload(content, filename, &content_type, provider)
            .await?;

        let record = BlobRecord {
            id: BlobId::new(),
            owner_id,
            filename: filename.to_string(),
            content_type,
            size,
            provider,
            location,
            created_at: Utc::now(),
        };

        match self.repo.create(record.clone()).await {
            Ok(saved) => {
                info!(blob_id = %saved.id, %owner_id, %provider, "Blob created");
                Ok(saved)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&record.location, provider).await {
                    warn!(
                        error = %cleanup,
                        location = %record.location,
                        "Failed to remove orphaned blob"
                    );
                }
                Err(e)
            }
        }
    }

    /// Metadata for a blob owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob does not exist or belongs to someone else.
    pub async fn get(&self, owner_id: OwnerId, blob_id: BlobId) -> Result<BlobRecord, BlobError> {
        let record = self
            .repo
            .find_by_id(blob_id)
            .await?
            .ok_or(BlobError::NotFound(blob_id))?;

        if !record.is_owned_by(owner_id) {
            warn!(%blob_id, %owner_id, "Unauthorized blob access");
            return Err(BlobError::unauthorized(blob_id, owner_id));
        }

        Ok(record)
    }

    /// Content of a blob owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob does not exist, belongs to someone else,
    /// or cannot be read from storage.
    pub async fn download(&self, owner_id: OwnerId, blob_id: BlobId) -> Result<Bytes, BlobError> {
        let record = self.get(owner_id, blob_id).await?;
        Ok(self.storage.download(&record.location, record.provider).await?)
    }

    /// Time-bounded download URL for a blob owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not accessible or its provider cannot presign.
    pub async fn download_url(
        &self,
        owner_id: OwnerId,
        blob_id: BlobId,
        expiry_minutes: u32,
    ) -> Result<PresignedUrl, BlobError> {
        let record = self.get(owner_id, blob_id).await?;
        Ok(self
            .storage
            .presign(&record.location, record.provider, expiry_minutes)
            .await?)
    }

    /// Delete a blob owned by `owner_id`, content first, then metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not accessible or either removal fails.
    pub async fn delete(&self, owner_id: OwnerId, blob_id: BlobId) -> Result<(), BlobError> {
        let record = self.get(owner_id, blob_id).await?;

        self.storage.remove(&record.location, record.provider).await?;
        self.repo.delete(blob_id).await?;

        info!(%blob_id, %owner_id, "Blob deleted");
        Ok(())
    }

    /// Every blob owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list(&self, owner_id: OwnerId) -> Result<Vec<BlobRecord>, BlobError> {
        self.repo.list_by_owner(owner_id).await
    }
}
