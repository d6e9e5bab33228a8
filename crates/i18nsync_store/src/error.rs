//! Error types for local message file operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing message files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file was read but is not a flat JSON object of strings.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file that was being parsed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The file that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A backup copy could not be created.
    #[error("failed to back up {path} to {backup}: {source}")]
    Backup {
        /// The file being backed up.
        path: PathBuf,
        /// The intended backup path.
        backup: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A mapping could not be serialized.
    #[error("failed to serialize mapping: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    /// Returns true for errors raised while reading local files.
    pub fn is_read(&self) -> bool {
        matches!(self, StoreError::Read { .. } | StoreError::Parse { .. })
    }

    /// Returns true for errors raised while writing local files.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            StoreError::Write { .. } | StoreError::Backup { .. } | StoreError::Serialize(_)
        )
    }
}
