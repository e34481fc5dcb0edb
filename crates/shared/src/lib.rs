//! Shared types, errors, and configuration for Blobvault.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for blobs and their owners
//! - The storage `Provider` enumeration
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AppConfig, LocalStorageSettings, LoggingConfig, S3StorageSettings, StorageSettings,
};
pub use error::{AppError, AppResult};
pub use types::{BlobId, OwnerId, ParseProviderError, Provider};
