//! Subcommand execution against the storage facade.

use std::io::Write;
use std::path::Path;

use blobvault_core::storage::{BlobStorage, DEFAULT_CONTENT_TYPE, StorageLocation};
use blobvault_shared::{AppError, AppResult, StorageSettings};
use tracing::debug;

use crate::cli::{Command, presign_operation};

/// Execute `command`, writing its result to `out`.
pub async fn run(
    command: Command,
    storage: &BlobStorage,
    settings: &StorageSettings,
    out: &mut impl Write,
) -> AppResult<()> {
    let provider = command.provider().unwrap_or(settings.default_provider);
    debug!(%provider, "Running command");

    match command {
        Command::Upload {
            file,
            name,
            content_type,
            ..
        } => {
            let filename = match name {
                Some(name) => name,
                None => file_name(&file)?,
            };
            let content = tokio::fs::read(&file)
                .await
                .map_err(|e| io_error(&file, &e))?;
            let content_type = content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);

            let location = storage
                .upload(content, &filename, content_type, provider)
                .await?;
            writeln!(out, "{location}").map_err(|e| output_error(&e))?;
        }
        Command::Download {
            location,
            output,
            ..
        } => {
            let content = storage
                .download(&StorageLocation::new(location), provider)
                .await?;
            match output {
                Some(path) => tokio::fs::write(&path, &content)
                    .await
                    .map_err(|e| io_error(&path, &e))?,
                None => out.write_all(&content).map_err(|e| output_error(&e))?,
            }
        }
        Command::List { prefix, .. } => {
            for name in storage.enumerate(&prefix, provider).await? {
                writeln!(out, "{name}").map_err(|e| output_error(&e))?;
            }
        }
        Command::Delete { location, .. } => {
            storage
                .remove(&StorageLocation::new(location), provider)
                .await?;
        }
        Command::Presign {
            location,
            expiry_minutes,
            write,
            json,
            ..
        } => {
            let expiry = expiry_minutes.unwrap_or(settings.presign_expiry_minutes);
            let presigned = storage
                .presign_with(
                    &StorageLocation::new(location),
                    provider,
                    presign_operation(write),
                    expiry,
                )
                .await?;
            if json {
                let body = serde_json::to_string_pretty(&presigned)
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                writeln!(out, "{body}").map_err(|e| output_error(&e))?;
            } else {
                writeln!(out, "{}", presigned.url).map_err(|e| output_error(&e))?;
            }
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> AppResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .ok_or_else(|| {
            AppError::Validation(format!("cannot derive a name from {}", path.display()))
        })
}

fn io_error(path: &Path, err: &std::io::Error) -> AppError {
    let msg = format!("{}: {err}", path.display());
    if err.kind() == std::io::ErrorKind::NotFound {
        AppError::NotFound(msg)
    } else {
        AppError::Internal(msg)
    }
}

fn output_error(err: &std::io::Error) -> AppError {
    AppError::Internal(format!("cannot write output: {err}"))
}
