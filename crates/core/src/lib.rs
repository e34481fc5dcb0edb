//! Core storage logic for Blobvault.
//!
//! This crate contains the storage abstraction and the blob rules built on it,
//! with no web or database dependencies. Metadata persistence is a trait.
//!
//! # Modules
//!
//! - `storage` - Provider adapters, provider selection and the storage facade
//! - `blob` - Owner-scoped blobs with persisted metadata

pub mod blob;
pub mod storage;
