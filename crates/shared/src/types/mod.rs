//! Common types used across the application.

pub mod id;
pub mod provider;

pub use id::*;
pub use provider::{ParseProviderError, Provider};
