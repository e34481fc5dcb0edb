//! S3-compatible object storage adapter.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use blobvault_shared::{Provider, S3StorageSettings};
use bytes::Bytes;
use chrono::Utc;
use opendal::{Operator, services};
use tracing::debug;

use super::adapter::{StorageAdapter, list_files, stat_object};
use super::error::{AdapterError, BlobStorageError};
use super::types::{BlobPayload, ObjectMetadata, PresignOperation, PresignedUrl, StorageLocation};

/// Stores blobs as objects in one bucket of an S3-compatible service.
///
/// Uploads are single-shot puts. Presigned URLs are signed locally with the
/// configured credentials, no request is made to the service.
pub struct S3StorageAdapter {
    operator: Operator,
    bucket: String,
}

impl S3StorageAdapter {
    /// Create an adapter from settings.
    ///
    /// With static credentials the ambient AWS config and instance metadata
    /// are not consulted.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the bucket is empty or only half of the
    /// credential pair is set. Settings the builder rejects are reported the same way.
    pub fn new(settings: &S3StorageSettings) -> Result<Self, BlobStorageError> {
        if settings.bucket.trim().is_empty() {
            return Err(BlobStorageError::configuration("S3 bucket must not be empty"));
        }

        let mut builder = services::S3::default()
            .bucket(&settings.bucket)
            .region(&settings.region);

        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint(endpoint);
        }
        if let Some(root) = &settings.root {
            builder = builder.root(root);
        }
        if settings.has_partial_credentials() {
            return Err(BlobStorageError::configuration(
                "S3 access_key_id and secret_access_key must be set together",
            ));
        }
        if let Some((access_key_id, secret_access_key)) = settings.static_credentials() {
            builder = builder
                .access_key_id(access_key_id)
                .secret_access_key(secret_access_key)
                .disable_config_load()
                .disable_ec2_metadata();
        }
        if settings.virtual_host_style {
            builder = builder.enable_virtual_host_style();
        }

        let operator = Operator::new(builder)
            .map_err(|e| BlobStorageError::configuration(e.to_string()))?
            .finish();

        debug!(bucket = %settings.bucket, region = %settings.region, "S3 storage adapter ready");
        Ok(Self {
            operator,
            bucket: settings.bucket.clone(),
        })
    }

    /// Bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl StorageAdapter for S3StorageAdapter {
    fn provider(&self) -> Provider {
        Provider::S3
    }

    fn target(&self) -> String {
        format!("s3://{}", self.bucket)
    }

    async fn save(
        &self,
        key: &StorageLocation,
        payload: BlobPayload,
    ) -> Result<StorageLocation, AdapterError> {
        self.operator
            .write_with(key.as_str(), payload.content)
            .content_type(&payload.content_type)
            .await?;
        Ok(key.clone())
    }

    async fn get(&self, location: &StorageLocation) -> Result<Bytes, AdapterError> {
        let buffer = self.operator.read(location.as_str()).await?;
        Ok(buffer.to_bytes())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, AdapterError> {
        Ok(list_files(&self.operator, prefix, |_| false).await?)
    }

    async fn delete(&self, location: &StorageLocation) -> Result<(), AdapterError> {
        Ok(self.operator.delete(location.as_str()).await?)
    }

    async fn stat(&self, location: &StorageLocation) -> Result<ObjectMetadata, AdapterError> {
        Ok(stat_object(&self.operator, location).await?)
    }

    async fn presign(
        &self,
        location: &StorageLocation,
        operation: PresignOperation,
        expiry_minutes: u32,
    ) -> Result<PresignedUrl, AdapterError> {
        let ttl = Duration::from_secs(u64::from(expiry_minutes) * 60);

        let presigned = match operation {
            PresignOperation::Read => self.operator.presign_read(location.as_str(), ttl).await?,
            PresignOperation::Write => self.operator.presign_write(location.as_str(), ttl).await?,
        };

        let headers: HashMap<String, String> = presigned
            .header()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: operation.method().to_string(),
            expires_at: Utc::now() + chrono::Duration::minutes(i64::from(expiry_minutes)),
            headers,
        })
    }
}
