//! Owner-scoped blob management.
//!
//! This module layers the application rules on top of [`crate::storage`]:
//! - Metadata persistence through a [`BlobRepository`]
//! - Ownership checks before download, presign and delete
//! - Cleanup of stored objects when metadata cannot be saved

mod error;
mod service;
mod types;


pub use error::BlobError;
pub use service::{BlobRepository, BlobService};
pub use types::BlobRecord;
