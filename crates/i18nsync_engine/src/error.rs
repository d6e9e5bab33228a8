//! Error types for sync runs.

use i18nsync_store::StoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during a sync run.
///
/// Every error aborts the run. Reruns are idempotent and act as the retry
/// mechanism.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Reading records from the remote table failed.
    #[error("fetching remote records failed{}: {message}", status_suffix(.status))]
    Fetch {
        /// HTTP status, when the server answered.
        status: Option<u16>,
        /// Error message.
        message: String,
    },

    /// A create or update batch was rejected. Earlier batches stay applied.
    #[error("batch {batch} failed{}: {message}", status_suffix(.status))]
    BatchOperation {
        /// 1-based batch number.
        batch: usize,
        /// HTTP status, when the server answered.
        status: Option<u16>,
        /// Error message.
        message: String,
    },

    /// A single remote request failed.
    #[error("remote request failed{}: {message}", status_suffix(.status))]
    Remote {
        /// HTTP status, when the server answered.
        status: Option<u16>,
        /// Error message.
        message: String,
    },

    /// Reading, backing up, or writing a local message file failed.
    #[error(transparent)]
    Local(#[from] StoreError),

    /// The configuration cannot be used.
    #[error("configuration error: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl SyncError {
    /// Creates a remote error with a status code.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a remote error for a request that never got a response.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Remote {
            status: None,
            message: message.into(),
        }
    }

    /// Returns the HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Fetch { status, .. }
            | SyncError::BatchOperation { status, .. }
            | SyncError::Remote { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns an actionable hint for well-known status codes.
    pub fn hint(&self) -> Option<&'static str> {
        match self.status() {
            Some(401) => Some("check that AIRTABLE_API_KEY is a valid token for this base"),
            Some(404) => Some("check that AIRTABLE_BASE_ID and AIRTABLE_TABLE_NAME are correct"),
            _ => None,
        }
    }

    /// Re-labels a remote failure as a fetch failure.
    pub(crate) fn into_fetch(self) -> Self {
        match self {
            SyncError::Remote { status, message } => SyncError::Fetch { status, message },
            other => other,
        }
    }

    /// Re-labels a failure as the failure of a numbered batch.
    pub(crate) fn into_batch(self, batch: usize) -> Self {
        match self {
            SyncError::Remote { status, message } => SyncError::BatchOperation {
                batch,
                status,
                message,
            },
            err @ SyncError::BatchOperation { .. } => err,
            other => SyncError::BatchOperation {
                batch,
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_for_known_statuses() {
        assert!(SyncError::remote(401, "unauthorized")
            .into_fetch()
            .hint()
            .unwrap()
            .contains("AIRTABLE_API_KEY"));
        assert!(SyncError::remote(404, "not found")
            .into_batch(1)
            .hint()
            .unwrap()
            .contains("AIRTABLE_BASE_ID"));
        assert!(SyncError::remote(500, "boom").hint().is_none());
        assert!(SyncError::unreachable("dns").hint().is_none());
    }

    #[test]
    fn error_display() {
        let err = SyncError::remote(422, "INVALID_RECORDS").into_batch(3);
        assert_eq!(err.to_string(), "batch 3 failed (HTTP 422): INVALID_RECORDS");

        let err = SyncError::unreachable("connection refused").into_fetch();
        assert_eq!(
            err.to_string(),
            "fetching remote records failed: connection refused"
        );
    }

    #[test]
    fn into_batch_keeps_status() {
        let err = SyncError::remote(429, "rate limited").into_batch(2);
        assert!(matches!(
            err,
            SyncError::BatchOperation {
                batch: 2,
                status: Some(429),
                ..
            }
        ));
    }
}
