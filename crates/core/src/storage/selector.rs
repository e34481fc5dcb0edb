//! Provider to adapter registry.

use std::collections::HashMap;
use std::sync::Arc;

use blobvault_shared::{Provider, StorageSettings};
use tracing::{info, warn};

use super::adapter::StorageAdapter;
use super::error::BlobStorageError;
use super::local::LocalStorageAdapter;
use super::s3::S3StorageAdapter;

/// Maps each [`Provider`] to the adapter responsible for it.
///
/// Built once at startup and immutable afterwards, so it can be shared
/// across tasks behind an `Arc` without locking.
pub struct StorageSelector {
    adapters: HashMap<Provider, Arc<dyn StorageAdapter>>,
}

impl StorageSelector {
    /// Start an empty registry.
    #[must_use]
    pub fn builder() -> StorageSelectorBuilder {
        StorageSelectorBuilder::default()
    }

    /// Wire every backend that has a settings section.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if an adapter cannot be constructed.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, BlobStorageError> {
        let mut builder = Self::builder();
        if let Some(local) = &settings.local {
            builder = builder.register(LocalStorageAdapter::new(local)?);
        }
        if let Some(s3) = &settings.s3 {
            builder = builder.register(S3StorageAdapter::new(s3)?);
        }
        Ok(builder.build())
    }

    /// The adapter registered for `provider`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` if none is registered.
    pub fn select(&self, provider: Provider) -> Result<&dyn StorageAdapter, BlobStorageError> {
        self.adapters
            .get(&provider)
            .map(Arc::as_ref)
            .ok_or(BlobStorageError::UnknownProvider(provider))
    }

    /// Whether `provider` has an adapter.
    #[must_use]
    pub fn is_registered(&self, provider: Provider) -> bool {
        self.adapters.contains_key(&provider)
    }

    /// Registered providers, in declaration order.
    #[must_use]
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.adapters.keys().copied().collect();
        providers.sort();
        providers
    }
}

/// Collects adapters before freezing them into a [`StorageSelector`].
#[derive(Default)]
pub struct StorageSelectorBuilder {
    adapters: HashMap<Provider, Arc<dyn StorageAdapter>>,
}

impl StorageSelectorBuilder {
    /// Register an adapter under its own provider.
    #[must_use]
    pub fn register(self, adapter: impl StorageAdapter + 'static) -> Self {
        self.register_shared(Arc::new(adapter))
    }

    /// Register an already shared adapter. A later registration for the same
    /// provider replaces the earlier one.
    #[must_use]
    pub fn register_shared(mut self, adapter: Arc<dyn StorageAdapter>) -> Self {
        let provider = adapter.provider();
        let target = adapter.target();
        if self.adapters.insert(provider, adapter).is_some() {
            warn!(%provider, %target, "Replacing previously registered storage adapter");
        } else {
            info!(%provider, %target, "Registered storage adapter");
        }
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> StorageSelector {
        StorageSelector {
            adapters: self.adapters,
        }
    }
}
