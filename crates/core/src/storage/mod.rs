//! Provider-agnostic blob storage built on Apache OpenDAL.
//!
//! Callers save, fetch, list, delete and presign blobs through
//! [`BlobStorage`] without knowing which backend holds them:
//! - Local filesystem under a root directory
//! - S3-compatible object storage (AWS S3, MinIO, Cloudflare R2)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        BlobStorage                               │
//! │        key generation · input validation · error translation     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                      StorageSelector                             │
//! │              Provider ──▶ Arc<dyn StorageAdapter>                │
//! ├────────────────────────────────┬────────────────────────────────┤
//! │  LocalStorageAdapter           │  S3StorageAdapter               │
//! │  services::Fs (staged writes)  │  services::S3 (presign_read)    │
//! └────────────────────────────────┴────────────────────────────────┘
//! ```

mod adapter;
mod error;
mod facade;
mod key;
mod local;
mod s3;
mod selector;
mod types;

pub use adapter::StorageAdapter;
pub use error::{AdapterError, BlobStorageError};
pub use facade::{BlobStorage, MAX_PRESIGN_EXPIRY_MINUTES};
pub use key::{
    MAX_FILENAME_LEN, generate_key, validate_filename, validate_location, validate_prefix,
};
pub use local::{LocalStorageAdapter, STAGING_DIR};
pub use s3::S3StorageAdapter;
pub use selector::{StorageSelector, StorageSelectorBuilder};
pub use types::{
    BlobPayload, DEFAULT_CONTENT_TYPE, ObjectMetadata, PresignOperation, PresignedUrl,
    StorageLocation, StorageOperation,
};
