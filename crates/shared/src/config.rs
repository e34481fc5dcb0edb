//! Application configuration management.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::Provider;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Storage backends configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage backends configuration.
///
/// A backend is only wired when its section is present.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Local filesystem backend.
    #[serde(default)]
    pub local: Option<LocalStorageSettings>,
    /// S3-compatible backend.
    #[serde(default)]
    pub s3: Option<S3StorageSettings>,
    /// Provider used when a caller does not name one.
    #[serde(default = "default_provider")]
    pub default_provider: Provider,
    /// Default lifetime of presigned URLs, in minutes.
    #[serde(default = "default_presign_expiry_minutes")]
    pub presign_expiry_minutes: u32,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            local: None,
            s3: None,
            default_provider: default_provider(),
            presign_expiry_minutes: default_presign_expiry_minutes(),
        }
    }
}

fn default_provider() -> Provider {
    Provider::Local
}

fn default_presign_expiry_minutes() -> u32 {
    60
}

/// Local filesystem backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalStorageSettings {
    /// Root directory every storage location is resolved under.
    pub root: PathBuf,
}

impl LocalStorageSettings {
    /// Create settings rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// S3-compatible backend configuration.
#[derive(Clone, Deserialize)]
pub struct S3StorageSettings {
    /// Bucket name.
    pub bucket: String,
    /// Region (use "auto" for R2).
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible services; AWS when unset.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Static access key ID. Falls back to the ambient AWS credential chain when unset.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Static secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Key prefix inside the bucket that acts as the adapter root.
    #[serde(default)]
    pub root: Option<String>,
    /// Address the bucket as `{bucket}.{endpoint}` instead of `{endpoint}/{bucket}`.
    #[serde(default)]
    pub virtual_host_style: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl S3StorageSettings {
    /// Create settings for `bucket` in `region` using the ambient credential chain.
    #[must_use]
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            root: None,
            virtual_host_style: false,
        }
    }

    /// Set a custom endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set static credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set the key prefix used as the adapter root.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// The static credential pair, when both halves are set.
    #[must_use]
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        self.access_key_id
            .as_deref()
            .zip(self.secret_access_key.as_deref())
    }

    /// Whether exactly one half of the credential pair is set.
    #[must_use]
    pub fn has_partial_credentials(&self) -> bool {
        self.access_key_id.is_some() != self.secret_access_key.is_some()
    }
}

impl fmt::Debug for S3StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3StorageSettings")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("root", &self.root)
            .field("virtual_host_style", &self.virtual_host_style)
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "blobvault=info,blobctl=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BLOBVAULT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = temp_env::with_vars_unset(
            [
                "BLOBVAULT__STORAGE__LOCAL__ROOT",
                "BLOBVAULT__STORAGE__S3__BUCKET",
                "BLOBVAULT__STORAGE__DEFAULT_PROVIDER",
            ],
            AppConfig::load,
        )
        .expect("config should load");

        assert!(config.storage.local.is_none());
        assert!(config.storage.s3.is_none());
        assert_eq!(config.storage.default_provider, Provider::Local);
        assert_eq!(config.storage.presign_expiry_minutes, 60);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_from_environment() {
        let config = temp_env::with_vars(
            [
                ("BLOBVAULT__STORAGE__LOCAL__ROOT", Some("/var/lib/blobvault")),
                ("BLOBVAULT__STORAGE__S3__BUCKET", Some("blobs")),
                ("BLOBVAULT__STORAGE__S3__REGION", Some("eu-west-1")),
                ("BLOBVAULT__STORAGE__DEFAULT_PROVIDER", Some("s3")),
                ("BLOBVAULT__STORAGE__PRESIGN_EXPIRY_MINUTES", Some("15")),
            ],
            AppConfig::load,
        )
        .expect("config should load");

        let local = config.storage.local.expect("local settings");
        assert_eq!(local.root, PathBuf::from("/var/lib/blobvault"));

        let s3 = config.storage.s3.expect("s3 settings");
        assert_eq!(s3.bucket, "blobs");
        assert_eq!(s3.region, "eu-west-1");
        assert!(s3.static_credentials().is_none());
        assert!(!s3.has_partial_credentials());

        assert_eq!(config.storage.default_provider, Provider::S3);
        assert_eq!(config.storage.presign_expiry_minutes, 15);
    }

    #[test]
    fn test_s3_credential_pair() {
        let full = S3StorageSettings::new("blobs", "auto").with_credentials("AKIA", "hunter2");
        assert_eq!(full.static_credentials(), Some(("AKIA", "hunter2")));
        assert!(!full.has_partial_credentials());

        let mut half = S3StorageSettings::new("blobs", "auto");
        half.access_key_id = Some("AKIA".to_string());
        assert!(half.static_credentials().is_none());
        assert!(half.has_partial_credentials());
    }

    #[test]
    fn test_s3_debug_redacts_secret() {
        let settings = S3StorageSettings::new("blobs", "auto").with_credentials("AKIA", "hunter2");
        let rendered = format!("{settings:?}");
        assert!(rendered.contains("AKIA"));
        assert!(!rendered.contains("hunter2"));
    }
}
