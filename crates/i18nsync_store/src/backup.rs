//! Timestamped backups of message files.
//!
//! Before a message file is overwritten, its current content is copied to a
//! sibling named `<stem>.backup-<timestamp>.json`. Backups are never cleaned
//! up by this crate.

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Formats a backup timestamp.
///
/// ISO-8601 in UTC with millisecond precision, with every `:` and `.`
/// replaced by `-` so the result is safe in file names on every platform:
/// `2026-10-16T08-30-00-123Z`.
pub fn backup_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-")
}

/// Returns the backup path for `path` at the given timestamp.
pub fn backup_path_for(path: &Path, timestamp: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let backup_name = match name.strip_suffix(".json") {
        Some(stem) => format!("{stem}.backup-{timestamp}.json"),
        None => format!("{name}.backup-{timestamp}"),
    };

    path.with_file_name(backup_name)
}

/// Copies `path` to a timestamped sibling if it exists.
///
/// Returns the backup path, or `None` when there was nothing to back up.
/// A missing file is the normal state before the first write and is not an
/// error.
///
/// # Errors
///
/// Returns [`StoreError::Backup`] if the copy fails.
pub fn backup_file(path: &Path) -> StoreResult<Option<PathBuf>> {
    backup_file_with(path, &backup_timestamp(Utc::now()))
}

/// Copies `path` to the sibling named for `timestamp` if it exists.
///
/// # Errors
///
/// Returns [`StoreError::Backup`] if the copy fails.
pub fn backup_file_with(path: &Path, timestamp: &str) -> StoreResult<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }

    let backup = backup_path_for(path, timestamp);
    fs::copy(path, &backup).map_err(|source| StoreError::Backup {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;

    info!("backed up {} to {}", path.display(), backup.display());
    Ok(Some(backup))
}
