//! Command-line arguments.

use std::path::PathBuf;

use blobvault_core::storage::PresignOperation;
use blobvault_shared::Provider;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "blobctl",
    version,
    about = "Store and fetch blobs across storage providers",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Provider selection shared by every subcommand.
#[derive(Debug, Args)]
pub struct ProviderArg {
    /// Storage provider (local, s3). Defaults to `storage.default_provider`.
    #[arg(short, long, env = "BLOBCTL_PROVIDER")]
    pub provider: Option<Provider>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload a file and print its storage location.
    Upload {
        /// File to upload.
        file: PathBuf,
        /// Name to store under. Defaults to the file name.
        #[arg(short, long)]
        name: Option<String>,
        /// MIME type of the content.
        #[arg(short = 't', long)]
        content_type: Option<String>,
        #[command(flatten)]
        provider: ProviderArg,
    },
    /// Download the object at a location.
    Download {
        location: String,
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        provider: ProviderArg,
    },
    /// List stored locations starting with a prefix.
    List {
        #[arg(default_value = "")]
        prefix: String,
        #[command(flatten)]
        provider: ProviderArg,
    },
    /// Delete the object at a location.
    Delete {
        location: String,
        #[command(flatten)]
        provider: ProviderArg,
    },
    /// Print a time-bounded URL for a location.
    Presign {
        location: String,
        /// Lifetime in minutes. Defaults to `storage.presign_expiry_minutes`.
        #[arg(short, long)]
        expiry_minutes: Option<u32>,
        /// Sign an upload (PUT) instead of a download.
        #[arg(long)]
        write: bool,
        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        provider: ProviderArg,
    },
}

impl Command {
    /// Provider named on the command line, if any.
    pub fn provider(&self) -> Option<Provider> {
        match self {
            Self::Upload { provider, .. }
            | Self::Download { provider, .. }
            | Self::List { provider, .. }
            | Self::Delete { provider, .. }
            | Self::Presign { provider, .. } => provider.provider,
        }
    }
}

pub fn presign_operation(write: bool) -> PresignOperation {
    if write {
        PresignOperation::Write
    } else {
        PresignOperation::Read
    }
}
