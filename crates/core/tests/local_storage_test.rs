//! End-to-end behaviour of the facade over a configured local backend.

use std::collections::HashSet;
use std::sync::Arc;

use blobvault_core::storage::{BlobStorage, BlobStorageError, StorageLocation, StorageSelector};
use blobvault_shared::{LocalStorageSettings, Provider, StorageSettings};
use tempfile::TempDir;

fn storage() -> (TempDir, BlobStorage) {
    let dir = TempDir::new().expect("temp dir");
    let settings = StorageSettings {
        local: Some(LocalStorageSettings::new(dir.path())),
        ..StorageSettings::default()
    };
    let selector = StorageSelector::from_settings(&settings).expect("selector");
    (dir, BlobStorage::new(Arc::new(selector)))
}

#[tokio::test]
async fn upload_then_download_returns_same_bytes() {
    let (_dir, storage) = storage();
    let content: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();

    let location = storage
        .upload(content.clone(), "binary.dat", "application/octet-stream", Provider::Local)
        .await
        .expect("upload");

    let fetched = storage.download(&location, Provider::Local).await.expect("download");
    assert_eq!(fetched.as_ref(), content.as_slice());
    assert!(storage.exists(&location, Provider::Local).await.expect("exists"));
}

#[tokio::test]
async fn same_filename_never_collides() {
    let (_dir, storage) = storage();
    let first = storage
        .upload("one", "same.txt", "text/plain", Provider::Local)
        .await
        .expect("upload");
    let second = storage
        .upload("two", "same.txt", "text/plain", Provider::Local)
        .await
        .expect("upload");

    assert_ne!(first, second);
    assert_eq!(
        storage.download(&first, Provider::Local).await.expect("download").as_ref(),
        b"one"
    );
    assert_eq!(
        storage.download(&second, Provider::Local).await.expect("download").as_ref(),
        b"two"
    );
}

#[tokio::test]
async fn listed_names_resolve_back_to_objects() {
    let (_dir, storage) = storage();
    let mut uploaded = HashSet::new();
    for name in ["a.txt", "b.txt", "c.txt"] {
        uploaded.insert(
            storage
                .upload(name, name, "text/plain", Provider::Local)
                .await
                .expect("upload")
                .into_inner(),
        );
    }

    let listed: HashSet<String> = storage
        .enumerate("", Provider::Local)
        .await
        .expect("enumerate")
        .into_iter()
        .collect();
    assert_eq!(listed, uploaded);

    for name in listed {
        let location = StorageLocation::new(name);
        storage.remove(&location, Provider::Local).await.expect("remove");
        assert!(!storage.exists(&location, Provider::Local).await.expect("exists"));
    }
    assert!(storage.enumerate("", Provider::Local).await.expect("enumerate").is_empty());
}

#[tokio::test]
async fn removed_object_is_not_found() {
    let (_dir, storage) = storage();
    let location = storage
        .upload("short-lived", "tmp.txt", "text/plain", Provider::Local)
        .await
        .expect("upload");

    storage.remove(&location, Provider::Local).await.expect("remove");
    storage.remove(&location, Provider::Local).await.expect("remove again");

    let err = storage.download(&location, Provider::Local).await.unwrap_err();
    assert!(matches!(err, BlobStorageError::NotFound { .. }));
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn unconfigured_provider_is_unknown() {
    let (_dir, storage) = storage();
    let err = storage
        .enumerate("", Provider::GoogleCloudStorage)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BlobStorageError::UnknownProvider(Provider::GoogleCloudStorage)
    ));
}
