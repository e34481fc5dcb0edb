//! Storage error types.
//!
//! Adapters report [`AdapterError`], which may carry a backend-native error.
//! The facade translates every adapter failure into [`BlobStorageError`]
//! so no native error type crosses it except as an opaque `source`.

use std::error::Error as StdError;

use blobvault_shared::{AppError, Provider};
use thiserror::Error;

use super::types::StorageOperation;

/// Failure reported by a storage adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The backend rejected or failed the operation.
    #[error(transparent)]
    Backend(#[from] opendal::Error),

    /// The adapter does not implement this capability.
    #[error("{operation} is not supported by this adapter")]
    Unsupported {
        /// Capability that was requested.
        operation: StorageOperation,
    },

    /// The key is well-formed but not acceptable to this adapter.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl AdapterError {
    /// Create an unsupported-capability error.
    #[must_use]
    pub fn unsupported(operation: StorageOperation) -> Self {
        Self::Unsupported { operation }
    }

    /// Create an invalid key error.
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Whether the backend reported the object as absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Backend(e) if e.kind() == opendal::ErrorKind::NotFound)
    }
}

/// Unified storage error surfaced by the facade, regardless of backend.
#[derive(Debug, Error)]
pub enum BlobStorageError {
    /// Requested location does not exist.
    #[error("blob not found: {location}")]
    NotFound {
        /// Location that was not found.
        location: String,
    },

    /// Transport, disk or service failure during an otherwise valid operation.
    #[error("{provider} {operation} failed: {source}")]
    Io {
        /// Operation that failed.
        operation: StorageOperation,
        /// Backend the operation ran against.
        provider: Provider,
        /// Native backend error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The selected adapter does not implement the requested capability.
    #[error("{operation} is not supported by the {provider} storage provider")]
    UnsupportedOperation {
        /// Backend that was selected.
        provider: Provider,
        /// Capability that was requested.
        operation: StorageOperation,
    },

    /// No adapter is registered for the provider.
    #[error("no storage adapter registered for provider '{0}'")]
    UnknownProvider(Provider),

    /// Malformed filename, location or prefix.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Adapter could not be constructed from its settings.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl BlobStorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(location: impl Into<String>) -> Self {
        Self::NotFound {
            location: location.into(),
        }
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Translate an adapter failure.
    ///
    /// `location` names the object involved, if any; it is used for `NotFound`.
    #[must_use]
    pub fn from_adapter(
        err: AdapterError,
        provider: Provider,
        operation: StorageOperation,
        location: Option<&str>,
    ) -> Self {
        match err {
            AdapterError::Backend(e) => match e.kind() {
                opendal::ErrorKind::NotFound
                    if matches!(operation, StorageOperation::Get | StorageOperation::Stat) =>
                {
                    Self::not_found(location.unwrap_or_default())
                }
                opendal::ErrorKind::Unsupported => Self::UnsupportedOperation {
                    provider,
                    operation,
                },
                _ => Self::Io {
                    operation,
                    provider,
                    source: Box::new(e),
                },
            },
            AdapterError::Unsupported { operation } => Self::UnsupportedOperation {
                provider,
                operation,
            },
            AdapterError::InvalidKey(msg) => Self::InvalidInput(msg),
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Io { .. } => "IO_FAILURE",
            Self::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            Self::UnknownProvider(_) => "UNKNOWN_PROVIDER",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<BlobStorageError> for AppError {
    fn from(err: BlobStorageError) -> Self {
        let msg = err.to_string();
        match err {
            BlobStorageError::NotFound { .. } => Self::NotFound(msg),
            BlobStorageError::InvalidInput(_) | BlobStorageError::UnknownProvider(_) => {
                Self::Validation(msg)
            }
            BlobStorageError::UnsupportedOperation { .. } => Self::Unsupported(msg),
            BlobStorageError::Configuration(_) => Self::Configuration(msg),
            BlobStorageError::Io { .. } => Self::Storage(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn backend(kind: opendal::ErrorKind) -> AdapterError {
        AdapterError::Backend(opendal::Error::new(kind, "backend said no"))
    }

    #[test]
    fn test_not_found_on_get() {
        let err = BlobStorageError::from_adapter(
            backend(opendal::ErrorKind::NotFound),
            Provider::S3,
            StorageOperation::Get,
            Some("abc/file.txt"),
        );
        assert!(matches!(
            err,
            BlobStorageError::NotFound { ref location } if location == "abc/file.txt"
        ));
    }

    #[test]
    fn test_not_found_outside_get_is_io() {
        let err = BlobStorageError::from_adapter(
            backend(opendal::ErrorKind::NotFound),
            Provider::Local,
            StorageOperation::List,
            None,
        );
        assert!(matches!(
            err,
            BlobStorageError::Io {
                operation: StorageOperation::List,
                provider: Provider::Local,
                ..
            }
        ));
    }

    #[test]
    fn test_io_keeps_native_source() {
        let err = BlobStorageError::from_adapter(
            backend(opendal::ErrorKind::PermissionDenied),
            Provider::S3,
            StorageOperation::Save,
            Some("k"),
        );
        let source = StdError::source(&err).expect("source is kept");
        assert!(source.to_string().contains("backend said no"));
        assert_eq!(err.error_code(), "IO_FAILURE");
    }

    #[rstest]
    #[case(backend(opendal::ErrorKind::Unsupported))]
    #[case(AdapterError::unsupported(StorageOperation::Presign))]
    fn test_unsupported(#[case] adapter_err: AdapterError) {
        let err = BlobStorageError::from_adapter(
            adapter_err,
            Provider::Local,
            StorageOperation::Presign,
            Some("k"),
        );
        assert!(matches!(
            err,
            BlobStorageError::UnsupportedOperation {
                provider: Provider::Local,
                operation: StorageOperation::Presign,
            }
        ));
    }

    #[test]
    fn test_invalid_key_becomes_invalid_input() {
        let err = BlobStorageError::from_adapter(
            AdapterError::invalid_key("reserved"),
            Provider::Local,
            StorageOperation::Save,
            None,
        );
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[rstest]
    #[case(BlobStorageError::not_found("k"), 404)]
    #[case(BlobStorageError::invalid_input("bad"), 400)]
    #[case(BlobStorageError::UnknownProvider(Provider::AzureBlob), 400)]
    #[case(
        BlobStorageError::UnsupportedOperation {
            provider: Provider::Local,
            operation: StorageOperation::Presign,
        },
        501
    )]
    #[case(BlobStorageError::configuration("no root"), 500)]
    fn test_app_error_mapping(#[case] err: BlobStorageError, #[case] status: u16) {
        assert_eq!(AppError::from(err).status_code(), status);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            BlobStorageError::UnknownProvider(Provider::GoogleCloudStorage).to_string(),
            "no storage adapter registered for provider 'gcs'"
        );
        assert_eq!(
            BlobStorageError::UnsupportedOperation {
                provider: Provider::Local,
                operation: StorageOperation::Presign,
            }
            .to_string(),
            "presign is not supported by the local storage provider"
        );
    }
}
