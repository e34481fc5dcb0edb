//! Storage value types shared by adapters, the selector and the facade.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type used when the caller does not supply one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Opaque, backend-relative identifier returned by a save.
///
/// A location is only meaningful to the adapter that produced it; callers
/// must persist it together with the [`Provider`](blobvault_shared::Provider).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageLocation(String);

impl StorageLocation {
    /// Wrap a raw location string. Validation happens when it is used.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Borrow the location as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the owned string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageLocation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for StorageLocation {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StorageLocation {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<StorageLocation> for String {
    fn from(value: StorageLocation) -> Self {
        value.0
    }
}

/// Raw content plus its content-type hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobPayload {
    /// Object bytes.
    pub content: Bytes,
    /// MIME type stored alongside the object where the backend supports it.
    pub content_type: String,
}

impl BlobPayload {
    /// Create a payload; an empty content type falls back to `application/octet-stream`.
    #[must_use]
    pub fn new(content: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        Self {
            content: content.into(),
            content_type: if content_type.trim().is_empty() {
                DEFAULT_CONTENT_TYPE.to_string()
            } else {
                content_type
            },
        }
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the payload has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Storage location.
    pub location: StorageLocation,
    /// Object size in bytes.
    pub size: u64,
    /// Content type, when the backend records one.
    pub content_type: Option<String>,
}

/// Kind of access a presigned URL grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresignOperation {
    /// GET access to an existing object.
    #[default]
    Read,
    /// PUT access to upload an object.
    Write,
}

impl PresignOperation {
    /// HTTP method the URL is signed for.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Read => "GET",
            Self::Write => "PUT",
        }
    }
}

/// Presigned URL for upload or download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignedUrl {
    /// The presigned URL.
    pub url: String,
    /// HTTP method to use (PUT for upload, GET for download).
    pub method: String,
    /// When the URL expires.
    pub expires_at: DateTime<Utc>,
    /// Headers the request must carry for the signature to match.
    pub headers: HashMap<String, String>,
}

/// A capability in the adapter contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageOperation {
    /// Write an object.
    Save,
    /// Read an object.
    Get,
    /// Enumerate objects under a prefix.
    List,
    /// Remove an object.
    Delete,
    /// Read object metadata.
    Stat,
    /// Issue a presigned URL.
    Presign,
}

impl StorageOperation {
    /// Lowercase name used in logs and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Get => "get",
            Self::List => "list",
            Self::Delete => "delete",
            Self::Stat => "stat",
            Self::Presign => "presign",
        }
    }
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_defaults_content_type() {
        let payload = BlobPayload::new(b"hello".to_vec(), "  ");
        assert_eq!(payload.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(payload.len(), 5);
        assert!(!payload.is_empty());
    }

    #[test]
    fn test_payload_keeps_content_type() {
        let payload = BlobPayload::new(Bytes::new(), "image/png");
        assert_eq!(payload.content_type, "image/png");
        assert!(payload.is_empty());
    }

    #[test]
    fn test_location_is_transparent_string() {
        let location = StorageLocation::from("abc/report.pdf");
        assert_eq!(location.to_string(), "abc/report.pdf");
        assert_eq!(location.as_ref(), "abc/report.pdf");
        assert_eq!(String::from(location), "abc/report.pdf");
    }

    #[test]
    fn test_presign_operation_methods() {
        assert_eq!(PresignOperation::Read.method(), "GET");
        assert_eq!(PresignOperation::Write.method(), "PUT");
        assert_eq!(PresignOperation::default(), PresignOperation::Read);
    }
}
