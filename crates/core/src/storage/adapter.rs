//! The capability set every storage backend implements.

use async_trait::async_trait;
use blobvault_shared::Provider;
use bytes::Bytes;
use opendal::Operator;

use super::error::AdapterError;
use super::key::prefix_dir;
use super::types::{
    BlobPayload, ObjectMetadata, PresignOperation, PresignedUrl, StorageLocation, StorageOperation,
};

/// A backend-specific implementation of the storage contract.
///
/// Locations passed in have already been validated by the facade. Names
/// returned by [`list`](Self::list) are relative to the adapter root, i.e.
/// exactly the locations [`save`](Self::save) returned, so they can be fed
/// back to `get`, `delete` and `presign`.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Backend kind this adapter serves.
    fn provider(&self) -> Provider;

    /// Human-readable target, e.g. `s3://bucket` or a root directory.
    fn target(&self) -> String;

    /// Store `payload` under `key` and return its location.
    async fn save(
        &self,
        key: &StorageLocation,
        payload: BlobPayload,
    ) -> Result<StorageLocation, AdapterError>;

    /// Read the full object.
    async fn get(&self, location: &StorageLocation) -> Result<Bytes, AdapterError>;

    /// Names of every object whose location starts with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, AdapterError>;

    /// Remove an object. Removing an absent object succeeds.
    async fn delete(&self, location: &StorageLocation) -> Result<(), AdapterError>;

    /// Read object metadata without fetching content.
    async fn stat(&self, location: &StorageLocation) -> Result<ObjectMetadata, AdapterError>;

    /// Issue a time-bounded URL for `location`.
    ///
    /// Backends without signed URLs keep this default.
    async fn presign(
        &self,
        location: &StorageLocation,
        operation: PresignOperation,
        expiry_minutes: u32,
    ) -> Result<PresignedUrl, AdapterError> {
        let _ = (location, operation, expiry_minutes);
        Err(AdapterError::unsupported(StorageOperation::Presign))
    }
}

/// List regular files under `prefix` in walk order.
///
/// Lists the prefix's directory recursively and keeps entries that
/// string-match the whole prefix. Entries for which `skip` returns true are
/// dropped.
pub(crate) async fn list_files(
    operator: &Operator,
    prefix: &str,
    skip: impl Fn(&str) -> bool + Send,
) -> Result<Vec<String>, opendal::Error> {
    let dir = match prefix_dir(prefix) {
        "" => "/",
        dir => dir,
    };

    let entries = match operator.list_with(dir).recursive(true).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == opendal::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    Ok(entries
        .into_iter()
        .filter(|entry| entry.metadata().is_file())
        .map(|entry| entry.path().trim_start_matches('/').to_string())
        .filter(|path| path.starts_with(prefix) && !skip(path))
        .collect())
}

/// Metadata for `location` via `stat`.
pub(crate) async fn stat_object(
    operator: &Operator,
    location: &StorageLocation,
) -> Result<ObjectMetadata, opendal::Error> {
    let meta = operator.stat(location.as_str()).await?;
    if meta.is_dir() {
        return Err(opendal::Error::new(
            opendal::ErrorKind::NotFound,
            "location names a directory",
        ));
    }
    Ok(ObjectMetadata {
        location: location.clone(),
        size: meta.content_length(),
        content_type: meta.content_type().map(String::from),
    })
}
