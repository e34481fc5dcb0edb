//! Single entry point for blob operations across providers.

use std::sync::Arc;

use blobvault_shared::Provider;
use bytes::Bytes;
use tracing::{debug, error, info, warn};

use super::error::BlobStorageError;
use super::key::{generate_key, validate_location, validate_prefix};
use super::selector::StorageSelector;
use super::types::{BlobPayload, PresignOperation, PresignedUrl, StorageLocation, StorageOperation};

/// Longest presigned URL lifetime accepted: 7 days, the S3 SigV4 ceiling.
pub const MAX_PRESIGN_EXPIRY_MINUTES: u32 = 7 * 24 * 60;

/// Provider-agnostic blob storage.
///
/// Generates keys, picks the adapter for each call, and translates every
/// adapter failure into [`BlobStorageError`]. Cloning is cheap; clones share
/// the same registry.
#[derive(Clone)]
pub struct BlobStorage {
    selector: Arc<StorageSelector>,
}

impl BlobStorage {
    /// Create a facade over an immutable registry.
    #[must_use]
    pub fn new(selector: Arc<StorageSelector>) -> Self {
        Self { selector }
    }

    /// The underlying registry.
    #[must_use]
    pub fn selector(&self) -> &StorageSelector {
        &self.selector
    }

    /// Store `content` under a fresh key derived from `filename`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed filename, `UnknownProvider`, or `Io`.
    pub async fn upload(
        &self,
        content: impl Into<Bytes>,
        filename: &str,
        content_type: &str,
        provider: Provider,
    ) -> Result<StorageLocation, BlobStorageError> {
        let op = StorageOperation::Save;
        let result: Result<StorageLocation, BlobStorageError> = async {
            let key = generate_key(filename)?;
            let adapter = self.selector.select(provider)?;
            let payload = BlobPayload::new(content, content_type);
            let size = payload.len();

            let location = adapter
                .save(&key, payload)
                .await
                .map_err(|e| BlobStorageError::from_adapter(e, provider, op, Some(key.as_str())))?;

            info!(%provider, %location, size, "Blob uploaded");
            Ok(location)
        }
        .await;

        result.inspect_err(|e| log_failure(e, op, provider))
    }

    /// Fetch the full content at `location`.
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is stored there, `InvalidInput`, `UnknownProvider`, or `Io`.
    pub async fn download(
        &self,
        location: &StorageLocation,
        provider: Provider,
    ) -> Result<Bytes, BlobStorageError> {
        let op = StorageOperation::Get;
        let result: Result<Bytes, BlobStorageError> = async {
            validate_location(location.as_str())?;
            let adapter = self.selector.select(provider)?;

            let content = adapter.get(location).await.map_err(|e| {
                BlobStorageError::from_adapter(e, provider, op, Some(location.as_str()))
            })?;

            debug!(%provider, %location, size = content.len(), "Blob downloaded");
            Ok(content)
        }
        .await;

        result.inspect_err(|e| log_failure(e, op, provider))
    }

    /// Remove the object at `location`. Removing an absent object succeeds.
    ///
    /// # Errors
    ///
    /// `InvalidInput`, `UnknownProvider`, or `Io`.
    pub async fn remove(
        &self,
        location: &StorageLocation,
        provider: Provider,
    ) -> Result<(), BlobStorageError> {
        let op = StorageOperation::Delete;
        let result: Result<(), BlobStorageError> = async {
            validate_location(location.as_str())?;
            let adapter = self.selector.select(provider)?;

            match adapter.delete(location).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    return Err(BlobStorageError::from_adapter(
                        e,
                        provider,
                        op,
                        Some(location.as_str()),
                    ));
                }
            }

            info!(%provider, %location, "Blob removed");
            Ok(())
        }
        .await;

        result.inspect_err(|e| log_failure(e, op, provider))
    }

    /// Names of every object whose location starts with `prefix`.
    ///
    /// Names are full locations relative to the provider root, in the
    /// backend's discovery order.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed prefix, `UnknownProvider`, or `Io`.
    pub async fn enumerate(
        &self,
        prefix: &str,
        provider: Provider,
    ) -> Result<Vec<String>, BlobStorageError> {
        let op = StorageOperation::List;
        let result: Result<Vec<String>, BlobStorageError> = async {
            validate_prefix(prefix)?;
            let adapter = self.selector.select(provider)?;

            let names = adapter
                .list(prefix)
                .await
                .map_err(|e| BlobStorageError::from_adapter(e, provider, op, None))?;

            debug!(%provider, prefix, count = names.len(), "Blobs enumerated");
            Ok(names)
        }
        .await;

        result.inspect_err(|e| log_failure(e, op, provider))
    }

    /// Issue a read-only URL for `location`, valid for `expiry_minutes`.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` for providers without signed URLs (Local),
    /// `InvalidInput`, `UnknownProvider`, or `Io` if signing fails.
    pub async fn presign(
        &self,
        location: &StorageLocation,
        provider: Provider,
        expiry_minutes: u32,
    ) -> Result<PresignedUrl, BlobStorageError> {
        self.presign_with(location, provider, PresignOperation::Read, expiry_minutes)
            .await
    }

    /// Issue a URL granting `operation` on `location`, valid for `expiry_minutes`.
    ///
    /// # Errors
    ///
    /// Same as [`presign`](Self::presign).
    pub async fn presign_with(
        &self,
        location: &StorageLocation,
        provider: Provider,
        operation: PresignOperation,
        expiry_minutes: u32,
    ) -> Result<PresignedUrl, BlobStorageError> {
        let op = StorageOperation::Presign;
        let result: Result<PresignedUrl, BlobStorageError> = async {
            validate_location(location.as_str())?;
            validate_expiry(expiry_minutes)?;
            let adapter = self.selector.select(provider)?;

            let url = adapter
                .presign(location, operation, expiry_minutes)
                .await
                .map_err(|e| {
                    BlobStorageError::from_adapter(e, provider, op, Some(location.as_str()))
                })?;

            info!(
                %provider,
                %location,
                method = %url.method,
                expires_at = %url.expires_at,
                "Presigned URL issued"
            );
            Ok(url)
        }
        .await;

        result.inspect_err(|e| log_failure(e, op, provider))
    }

    /// Whether an object exists at `location`.
    ///
    /// # Errors
    ///
    /// `InvalidInput`, `UnknownProvider`, or `Io`. Absence is `Ok(false)`.
    pub async fn exists(
        &self,
        location: &StorageLocation,
        provider: Provider,
    ) -> Result<bool, BlobStorageError> {
        let op = StorageOperation::Stat;
        let result: Result<bool, BlobStorageError> = async {
            validate_location(location.as_str())?;
            let adapter = self.selector.select(provider)?;

            match adapter.stat(location).await {
                Ok(_) => Ok(true),
                Err(e) if e.is_not_found() => Ok(false),
                Err(e) => Err(BlobStorageError::from_adapter(
                    e,
                    provider,
                    op,
                    Some(location.as_str()),
                )),
            }
        }
        .await;

        result.inspect_err(|e| log_failure(e, op, provider))
    }
}

fn validate_expiry(expiry_minutes: u32) -> Result<(), BlobStorageError> {
    if expiry_minutes == 0 || expiry_minutes > MAX_PRESIGN_EXPIRY_MINUTES {
        return Err(BlobStorageError::invalid_input(format!(
            "expiry of {expiry_minutes} minutes is outside 1..={MAX_PRESIGN_EXPIRY_MINUTES}"
        )));
    }
    Ok(())
}

fn log_failure(err: &BlobStorageError, operation: StorageOperation, provider: Provider) {
    match err {
        BlobStorageError::Io { .. } | BlobStorageError::Configuration(_) => {
            error!(error = %err, %operation, %provider, "Storage operation failed");
        }
        _ => {
            warn!(
                error = %err,
                code = err.error_code(),
                %operation,
                %provider,
                "Storage operation rejected"
            );
        }
    }
}
