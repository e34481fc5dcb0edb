//! Storage provider enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend kind a blob is stored in.
///
/// The set is closed: every backend the system knows about has a variant here,
/// including ones that are reserved but have no adapter yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Provider {
    /// Local filesystem under a configured root directory.
    Local,
    /// S3-compatible object storage (AWS S3, MinIO, Cloudflare R2).
    S3,
    /// Azure Blob Storage (reserved).
    AzureBlob,
    /// Google Cloud Storage (reserved).
    #[serde(rename = "gcs")]
    GoogleCloudStorage,
}

impl Provider {
    /// All known providers, registered or not.
    pub const ALL: [Self; 4] = [Self::Local, Self::S3, Self::AzureBlob, Self::GoogleCloudStorage];

    /// Stable lowercase name, as persisted alongside a storage location.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
            Self::AzureBlob => "azure_blob",
            Self::GoogleCloudStorage => "gcs",
        }
    }

    /// Parse from the persisted name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown storage provider '{0}'")]
pub struct ParseProviderError(pub String);

impl FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseProviderError(s.to_string()))
    }
}

impl TryFrom<String> for Provider {
    type Error = ParseProviderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
