//! Test fixtures: temporary message directories and pipeline helpers.

use i18nsync_engine::{BatchWriter, PushPipeline, Sleeper};
use i18nsync_store::{Locale, MessageFiles, TranslationMap};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// A temporary directory holding `messages/` with automatic cleanup.
pub struct TestWorkspace {
    files: MessageFiles,
    _temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a workspace whose messages directory does not exist yet.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            files: MessageFiles::new(temp_dir.path().join("messages")),
            _temp_dir: temp_dir,
        }
    }

    /// Creates a workspace with both locale files written.
    pub fn seeded(en: &[(&str, &str)], zh_tw: &[(&str, &str)]) -> Self {
        let workspace = Self::new();
        workspace.write(Locale::En, en);
        workspace.write(Locale::ZhTw, zh_tw);
        workspace
    }

    /// Returns the message files.
    pub fn files(&self) -> &MessageFiles {
        &self.files
    }

    /// Returns the messages directory.
    pub fn dir(&self) -> &Path {
        self.files.dir()
    }

    /// Writes one locale file.
    pub fn write(&self, locale: Locale, entries: &[(&str, &str)]) {
        let mapping: TranslationMap = entries.iter().copied().collect();
        self.files
            .write(locale, &mapping)
            .expect("Failed to write message file");
    }

    /// Reads one locale file.
    pub fn read(&self, locale: Locale) -> TranslationMap {
        self.files.read(locale).expect("Failed to read message file")
    }

    /// Returns the raw bytes of one locale file.
    pub fn raw(&self, locale: Locale) -> Vec<u8> {
        fs::read(self.files.path(locale)).expect("Failed to read message file")
    }

    /// Lists backup files in the messages directory, sorted by name.
    pub fn backups(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.dir()) else {
            return Vec::new();
        };
        let mut backups: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.contains(".backup-"))
            })
            .collect();
        backups.sort();
        backups
    }

    /// Lists backups of one locale file.
    pub fn backups_of(&self, locale: Locale) -> Vec<PathBuf> {
        let prefix = format!("{}.backup-", locale.code());
        self.backups()
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect()
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`Sleeper`] that returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

/// A [`Sleeper`] that records requested pauses instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every pause requested so far.
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.pauses.lock().push(duration);
    }
}

/// A push pipeline with the default batch size that never sleeps.
pub fn fast_push() -> PushPipeline<NoSleep> {
    PushPipeline::new().with_writer(BatchWriter::default().with_sleeper(NoSleep))
}

/// A push pipeline that records its pauses into `sleeper`.
pub fn recording_push(
    batch_size: usize,
    delay: Duration,
    sleeper: RecordingSleeper,
) -> PushPipeline<RecordingSleeper> {
    PushPipeline::new().with_writer(BatchWriter::new(batch_size, delay).with_sleeper(sleeper))
}
