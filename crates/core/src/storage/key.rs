//! Storage key generation and validation.
//!
//! Keys have the shape `{uuid}/{filename}`: the random prefix makes
//! concurrent uploads of identically named files land in different objects,
//! while the original filename stays readable.

use uuid::Uuid;

use super::error::BlobStorageError;
use super::types::StorageLocation;

/// Longest filename accepted, in bytes.
///
/// Local writes are staged as `{filename}.{uuid}`, which must still fit in a
/// 255-byte `NAME_MAX`.
pub const MAX_FILENAME_LEN: usize = NAME_MAX - STAGING_SUFFIX_LEN;

const NAME_MAX: usize = 255;

/// `.` plus a hyphenated UUID.
const STAGING_SUFFIX_LEN: usize = 37;

/// Generate a unique storage key for `filename`.
///
/// Format: `{uuid-v4}/{filename}`
///
/// # Errors
///
/// Returns `InvalidInput` if the filename is malformed.
pub fn generate_key(filename: &str) -> Result<StorageLocation, BlobStorageError> {
    validate_filename(filename)?;
    Ok(StorageLocation::new(format!("{}/{filename}", Uuid::new_v4())))
}

/// Check that a filename can be used as the last segment of a key.
///
/// # Errors
///
/// Returns `InvalidInput` if the filename is empty, `.`/`..`, too long, or
/// contains a path separator or control character.
pub fn validate_filename(filename: &str) -> Result<(), BlobStorageError> {
    if filename.is_empty() {
        return Err(BlobStorageError::invalid_input("filename must not be empty"));
    }
    if filename.len() > MAX_FILENAME_LEN {
        return Err(BlobStorageError::invalid_input(format!(
            "filename exceeds {MAX_FILENAME_LEN} bytes"
        )));
    }
    if filename == "." || filename == ".." {
        return Err(BlobStorageError::invalid_input(format!(
            "filename '{filename}' is reserved"
        )));
    }
    if filename.contains('/') {
        return Err(BlobStorageError::invalid_input(
            "filename must not contain '/'",
        ));
    }
    check_chars(filename, "filename")
}

/// Check that a location is a relative, normalized object path.
///
/// # Errors
///
/// Returns `InvalidInput` for empty, absolute or directory-like locations and
/// for locations with empty, `.` or `..` segments.
pub fn validate_location(location: &str) -> Result<(), BlobStorageError> {
    if location.is_empty() {
        return Err(BlobStorageError::invalid_input("location must not be empty"));
    }
    if location.starts_with('/') {
        return Err(BlobStorageError::invalid_input(format!(
            "location '{location}' must be relative"
        )));
    }
    if location.ends_with('/') {
        return Err(BlobStorageError::invalid_input(format!(
            "location '{location}' names a directory"
        )));
    }
    check_chars(location, "location")?;
    for segment in location.split('/') {
        check_segment(segment, location, "location")?;
    }
    Ok(())
}

/// Check a listing prefix.
///
/// Prefixes are matched as plain strings, so the final segment may be partial
/// or empty (a trailing `/`). An empty prefix matches everything.
///
/// # Errors
///
/// Returns `InvalidInput` for absolute prefixes and prefixes with empty,
/// `.` or `..` segments.
pub fn validate_prefix(prefix: &str) -> Result<(), BlobStorageError> {
    if prefix.is_empty() {
        return Ok(());
    }
    if prefix.starts_with('/') {
        return Err(BlobStorageError::invalid_input(format!(
            "prefix '{prefix}' must be relative"
        )));
    }
    check_chars(prefix, "prefix")?;

    let segments: Vec<&str> = prefix.split('/').collect();
    let last = segments.len() - 1;
    for (i, segment) in segments.into_iter().enumerate() {
        if i == last && segment.is_empty() {
            continue;
        }
        check_segment(segment, prefix, "prefix")?;
    }
    Ok(())
}

/// Directory part of a prefix, including the trailing `/`; empty at the root.
pub(crate) fn prefix_dir(prefix: &str) -> &str {
    prefix.rfind('/').map_or("", |i| &prefix[..=i])
}

fn check_chars(value: &str, what: &str) -> Result<(), BlobStorageError> {
    if value.contains('\\') {
        return Err(BlobStorageError::invalid_input(format!(
            "{what} must not contain '\\'"
        )));
    }
    if value.chars().any(char::is_control) {
        return Err(BlobStorageError::invalid_input(format!(
            "{what} must not contain control characters"
        )));
    }
    Ok(())
}

fn check_segment(segment: &str, value: &str, what: &str) -> Result<(), BlobStorageError> {
    match segment {
        "" => Err(BlobStorageError::invalid_input(format!(
            "{what} '{value}' has an empty segment"
        ))),
        "." | ".." => Err(BlobStorageError::invalid_input(format!(
            "{what} '{value}' must not contain '{segment}' segments"
        ))),
        _ => Ok(()),
    }
}
