//! Reading and writing message files.

use crate::backup::{backup_file, backup_file_with};
use crate::error::{StoreError, StoreResult};
use crate::locale::Locale;
use crate::mapping::TranslationMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a message file.
///
/// # Errors
///
/// Returns [`StoreError::Read`] if the file cannot be read, including when
/// it does not exist, and [`StoreError::Parse`] if it is not a flat JSON
/// object of strings.
pub fn read_mapping(path: &Path) -> StoreResult<TranslationMap> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    TranslationMap::from_json_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a message file, treating a missing file as an empty mapping.
///
/// # Errors
///
/// Same as [`read_mapping`] for every failure other than "not found".
pub fn read_mapping_or_empty(path: &Path) -> StoreResult<TranslationMap> {
    match read_mapping(path) {
        Err(StoreError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist yet, treating as empty", path.display());
            Ok(TranslationMap::new())
        }
        other => other,
    }
}

/// Writes a mapping in the canonical file format.
///
/// Parent directories are created as needed. Content goes to a `.tmp`
/// sibling first and is renamed over the target once synced.
///
/// # Errors
///
/// Returns [`StoreError::Write`] on any filesystem failure.
pub fn write_mapping(path: &Path, map: &TranslationMap) -> StoreResult<()> {
    let content = map.to_json_string().map_err(StoreError::Serialize)?;
    let write_err = |source: io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp).map_err(write_err)?;
    let written = file
        .write_all(content.as_bytes())
        .and_then(|()| file.sync_all());
    drop(file);

    if let Err(source) = written.and_then(|()| fs::rename(&tmp, path)) {
        if let Err(e) = fs::remove_file(&tmp) {
            debug!("could not remove {}: {e}", tmp.display());
        }
        return Err(write_err(source));
    }

    debug!("wrote {} keys to {}", map.len(), path.display());
    Ok(())
}

/// The pair of message files for all locales under one directory.
#[derive(Debug, Clone)]
pub struct MessageFiles {
    dir: PathBuf,
    backup_timestamp: Option<String>,
}

impl MessageFiles {
    /// Creates a handle for message files under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            backup_timestamp: None,
        }
    }

    /// Names every backup with `timestamp` instead of the current time.
    pub fn with_backup_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.backup_timestamp = Some(timestamp.into());
        self
    }

    /// Returns the messages directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path for a locale.
    pub fn path(&self, locale: Locale) -> PathBuf {
        self.dir.join(locale.file_name())
    }

    /// Reads a locale file; a missing file is an error.
    pub fn read(&self, locale: Locale) -> StoreResult<TranslationMap> {
        read_mapping(&self.path(locale))
    }

    /// Reads a locale file; a missing file is an empty mapping.
    pub fn read_or_empty(&self, locale: Locale) -> StoreResult<TranslationMap> {
        read_mapping_or_empty(&self.path(locale))
    }

    /// Writes a locale file.
    pub fn write(&self, locale: Locale, map: &TranslationMap) -> StoreResult<()> {
        write_mapping(&self.path(locale), map)
    }

    /// Backs up a locale file if it exists.
    pub fn backup(&self, locale: Locale) -> StoreResult<Option<PathBuf>> {
        match &self.backup_timestamp {
            Some(timestamp) => backup_file_with(&self.path(locale), timestamp),
            None => backup_file(&self.path(locale)),
        }
    }
}
