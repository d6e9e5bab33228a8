//! Configuration for sync runs.

use crate::error::{SyncError, SyncResult};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Airtable REST API root.
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";
/// Default table holding the translation records.
pub const DEFAULT_TABLE_NAME: &str = "i18n";
/// Default view used when listing records.
pub const DEFAULT_VIEW: &str = "Grid view";
/// Default directory holding `en.json` and `zh-TW.json`.
pub const DEFAULT_MESSAGES_DIR: &str = "messages";
/// Maximum number of records per create/update call accepted by the API.
pub const MAX_BATCH_SIZE: usize = 10;
/// Pause between consecutive write batches.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(200);

/// Configuration for a sync run.
///
/// Built once at startup and handed to the store and pipelines.
#[derive(Clone)]
pub struct SyncConfig {
    /// API token. Requests go out unauthenticated when unset.
    pub api_key: Option<String>,
    /// Base identifier (`app...`).
    pub base_id: String,
    /// Table name or identifier.
    pub table_name: String,
    /// View used when listing records.
    pub view: String,
    /// API root URL.
    pub api_url: String,
    /// Directory holding the message files.
    pub messages_dir: PathBuf,
    /// Records per create/update call.
    pub batch_size: usize,
    /// Pause between write batches.
    pub batch_delay: Duration,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Compute changes without writing anything.
    pub dry_run: bool,
}

impl SyncConfig {
    /// Creates a configuration for the given base with defaults elsewhere.
    pub fn new(base_id: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_id: base_id.into(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            view: DEFAULT_VIEW.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            messages_dir: PathBuf::from(DEFAULT_MESSAGES_DIR),
            batch_size: MAX_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            timeout: Duration::from_secs(30),
            dry_run: false,
        }
    }

    /// Sets the API token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the table name.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Sets the view.
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    /// Sets the API root URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the messages directory.
    pub fn with_messages_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.messages_dir = dir.into();
        self
    }

    /// Sets the write batch size, clamped to `1..=MAX_BATCH_SIZE`.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    /// Sets the pause between write batches.
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Checks that the configuration can address a table.
    pub fn validate(&self) -> SyncResult<()> {
        if self.base_id.trim().is_empty() {
            return Err(SyncError::Config(
                "base id is required (set AIRTABLE_BASE_ID)".into(),
            ));
        }
        if self.table_name.trim().is_empty() {
            return Err(SyncError::Config("table name must not be empty".into()));
        }
        if self.api_url.trim().is_empty() {
            return Err(SyncError::Config("API URL must not be empty".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .field("view", &self.view)
            .field("api_url", &self.api_url)
            .field("messages_dir", &self.messages_dir)
            .field("batch_size", &self.batch_size)
            .field("batch_delay", &self.batch_delay)
            .field("timeout", &self.timeout)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::new("appXYZ");
        assert_eq!(config.table_name, "i18n");
        assert_eq!(config.view, "Grid view");
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.batch_delay, Duration::from_millis(200));
        assert_eq!(config.messages_dir, PathBuf::from("messages"));
        assert!(config.api_key.is_none());
        assert!(!config.dry_run);
    }

    #[test]
    fn builder() {
        let config = SyncConfig::new("appXYZ")
            .with_api_key("pat123")
            .with_table_name("Translations")
            .with_view("All")
            .with_messages_dir("web/messages")
            .with_batch_delay(Duration::ZERO)
            .with_dry_run(true);

        assert_eq!(config.api_key.as_deref(), Some("pat123"));
        assert_eq!(config.table_name, "Translations");
        assert_eq!(config.view, "All");
        assert_eq!(config.messages_dir, PathBuf::from("web/messages"));
        assert_eq!(config.batch_delay, Duration::ZERO);
        assert!(config.dry_run);
    }

    #[test]
    fn batch_size_is_clamped() {
        assert_eq!(SyncConfig::new("a").with_batch_size(0).batch_size, 1);
        assert_eq!(SyncConfig::new("a").with_batch_size(50).batch_size, 10);
        assert_eq!(SyncConfig::new("a").with_batch_size(4).batch_size, 4);
    }

    #[test]
    fn validate_requires_base_id() {
        assert!(matches!(
            SyncConfig::new("  ").validate(),
            Err(SyncError::Config(_))
        ));
        assert!(SyncConfig::new("appXYZ").validate().is_ok());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = SyncConfig::new("appXYZ").with_api_key("secret-token");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
