//! Local filesystem adapter.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use blobvault_shared::{LocalStorageSettings, Provider};
use bytes::Bytes;
use opendal::{ErrorKind, Operator, services};
use tracing::debug;

use super::adapter::{StorageAdapter, list_files, stat_object};
use super::error::{AdapterError, BlobStorageError};
use super::types::{BlobPayload, ObjectMetadata, StorageLocation};

/// Directory under the root where writes are staged before being renamed into place.
pub const STAGING_DIR: &str = ".staging";

/// Stores blobs as files under a root directory.
///
/// Writes go to a temporary file in [`STAGING_DIR`] and are renamed into
/// place, so readers never observe a partially written object.
/// Presigned URLs are not supported.
pub struct LocalStorageAdapter {
    operator: Operator,
    root: PathBuf,
}

impl LocalStorageAdapter {
    /// Create an adapter rooted at `settings.root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the root cannot be created or is not valid UTF-8.
    pub fn new(settings: &LocalStorageSettings) -> Result<Self, BlobStorageError> {
        let staging = settings.root.join(STAGING_DIR);
        std::fs::create_dir_all(&staging).map_err(|e| {
            BlobStorageError::configuration(format!(
                "cannot create storage root {}: {e}",
                settings.root.display()
            ))
        })?;
        let root = settings.root.canonicalize().map_err(|e| {
            BlobStorageError::configuration(format!(
                "cannot resolve storage root {}: {e}",
                settings.root.display()
            ))
        })?;

        let builder = services::Fs::default()
            .root(utf8(&root)?)
            .atomic_write_dir(utf8(&root.join(STAGING_DIR))?);

        let operator = Operator::new(builder)
            .map_err(|e| BlobStorageError::configuration(e.to_string()))?
            .finish();

        debug!(root = %root.display(), "Local storage adapter ready");
        Ok(Self { operator, root })
    }

    async fn is_dir(&self, location: &StorageLocation) -> bool {
        self.operator
            .stat(location.as_str())
            .await
            .is_ok_and(|meta| meta.is_dir())
    }
}

fn utf8(path: &Path) -> Result<&str, BlobStorageError> {
    path.to_str()
        .ok_or_else(|| BlobStorageError::configuration("invalid path"))
}

fn is_staged(path: &str) -> bool {
    path.split('/').next() == Some(STAGING_DIR)
}

fn reject_staged(location: &StorageLocation) -> Result<(), AdapterError> {
    if is_staged(location.as_str()) {
        return Err(AdapterError::invalid_key(format!(
            "'{STAGING_DIR}' is reserved by local storage"
        )));
    }
    Ok(())
}

#[async_trait]
impl StorageAdapter for LocalStorageAdapter {
    fn provider(&self) -> Provider {
        Provider::Local
    }

    fn target(&self) -> String {
        self.root.display().to_string()
    }

    async fn save(
        &self,
        key: &StorageLocation,
        payload: BlobPayload,
    ) -> Result<StorageLocation, AdapterError> {
        reject_staged(key)?;
        self.operator.write(key.as_str(), payload.content).await?;
        Ok(key.clone())
    }

    async fn get(&self, location: &StorageLocation) -> Result<Bytes, AdapterError> {
        reject_staged(location)?;
        let err = match self.operator.read(location.as_str()).await {
            Ok(buffer) => return Ok(buffer.to_bytes()),
            Err(e) => e,
        };
        if err.kind() != ErrorKind::NotFound && self.is_dir(location).await {
            return Err(
                opendal::Error::new(ErrorKind::NotFound, "location names a directory").into(),
            );
        }
        Err(err.into())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, AdapterError> {
        Ok(list_files(&self.operator, prefix, is_staged).await?)
    }

    /// A location naming a directory holds no object, so nothing is removed.
    async fn delete(&self, location: &StorageLocation) -> Result<(), AdapterError> {
        reject_staged(location)?;
        if self.is_dir(location).await {
            return Ok(());
        }
        Ok(self.operator.delete(location.as_str()).await?)
    }

    async fn stat(&self, location: &StorageLocation) -> Result<ObjectMetadata, AdapterError> {
        reject_staged(location)?;
        Ok(stat_object(&self.operator, location).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::{PresignOperation, StorageOperation};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn adapter() -> (TempDir, LocalStorageAdapter) {
        let dir = TempDir::new().expect("temp dir");
        let adapter =
            LocalStorageAdapter::new(&LocalStorageSettings::new(dir.path())).expect("adapter");
        (dir, adapter)
    }

    fn payload(content: &'static [u8]) -> BlobPayload {
        BlobPayload::new(content, "text/plain")
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let (dir, adapter) = adapter();
        let key = StorageLocation::from("a/b/c/file.txt");

        let location = adapter.save(&key, payload(b"nested")).await.expect("save");

        assert_eq!(location, key);
        let on_disk = std::fs::read(dir.path().join("a/b/c/file.txt")).expect("file exists");
        assert_eq!(on_disk, b"nested");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_dir, adapter) = adapter();
        let err = adapter
            .get(&StorageLocation::from("nope/missing.bin"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (dir, adapter) = adapter();
        let key = StorageLocation::from("x/gone.txt");
        adapter.save(&key, payload(b"bye")).await.expect("save");

        adapter.delete(&key).await.expect("first delete");
        adapter.delete(&key).await.expect("second delete");
        assert!(!dir.path().join("x/gone.txt").exists());
    }

    #[tokio::test]
    async fn test_list_matches_string_prefix() {
        let (_dir, adapter) = adapter();
        for key in ["docs/a.txt", "docs/b.txt", "docs-old/c.txt", "img/d.png"] {
            adapter
                .save(&StorageLocation::from(key), payload(b"x"))
                .await
                .expect("save");
        }

        let docs: HashSet<String> = adapter
            .list("docs/")
            .await
            .expect("list")
            .into_iter()
            .collect();
        assert_eq!(
            docs,
            HashSet::from(["docs/a.txt".to_string(), "docs/b.txt".to_string()])
        );

        let all_docs: HashSet<String> = adapter
            .list("docs")
            .await
            .expect("list")
            .into_iter()
            .collect();
        assert_eq!(all_docs.len(), 3);

        assert_eq!(adapter.list("").await.expect("list").len(), 4);
    }

    #[tokio::test]
    async fn test_list_hides_staging_files() {
        let (dir, adapter) = adapter();
        std::fs::write(dir.path().join(STAGING_DIR).join("partial"), b"half").expect("write");
        adapter
            .save(&StorageLocation::from("k/visible.txt"), payload(b"x"))
            .await
            .expect("save");

        let names = adapter.list("").await.expect("list");
        assert_eq!(names, vec!["k/visible.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_save_rejects_staging_keys() {
        let (_dir, adapter) = adapter();
        let err = adapter
            .save(&StorageLocation::from(".staging/evil"), payload(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_staged_files_are_not_addressable() {
        let (dir, adapter) = adapter();
        let partial = dir.path().join(STAGING_DIR).join("partial");
        std::fs::write(&partial, b"half").expect("write");
        let staged = StorageLocation::from(".staging/partial");

        let err = adapter.get(&staged).await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidKey(_)));
        let err = adapter.stat(&staged).await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidKey(_)));
        let err = adapter.delete(&staged).await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidKey(_)));

        assert_eq!(std::fs::read(&partial).expect("still staged"), b"half");
    }

    #[tokio::test]
    async fn test_get_directory_is_not_found() {
        let (_dir, adapter) = adapter();
        adapter
            .save(&StorageLocation::from("folder/inner.txt"), payload(b"x"))
            .await
            .expect("save");

        let err = adapter
            .get(&StorageLocation::from("folder"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_directory_keeps_contents() {
        let (dir, adapter) = adapter();
        let inner = StorageLocation::from("folder/inner.txt");
        adapter.save(&inner, payload(b"x")).await.expect("save");

        adapter
            .delete(&StorageLocation::from("folder"))
            .await
            .expect("delete directory");

        assert!(dir.path().join("folder/inner.txt").is_file());
        assert_eq!(adapter.get(&inner).await.expect("get").as_ref(), b"x");
    }

    #[tokio::test]
    async fn test_presign_is_unsupported() {
        let (_dir, adapter) = adapter();
        let err = adapter
            .presign(&StorageLocation::from("k/f"), PresignOperation::Read, 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Unsupported {
                operation: StorageOperation::Presign
            }
        ));
    }

    #[tokio::test]
    async fn test_stat_reports_size() {
        let (_dir, adapter) = adapter();
        let key = StorageLocation::from("s/size.bin");
        adapter.save(&key, payload(b"12345")).await.expect("save");

        let meta = adapter.stat(&key).await.expect("stat");
        assert_eq!(meta.size, 5);

        let err = adapter.stat(&StorageLocation::from("s")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_new_creates_missing_root() {
        let dir = TempDir::new().expect("temp dir");
        let root = dir.path().join("deep/root");
        let adapter = LocalStorageAdapter::new(&LocalStorageSettings::new(&root)).expect("adapter");
        assert!(root.join(STAGING_DIR).is_dir());
        assert_eq!(adapter.provider(), Provider::Local);
    }
}
