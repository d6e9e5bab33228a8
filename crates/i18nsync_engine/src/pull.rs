//! Pull pipeline: remote table → local message files.

use crate::error::SyncResult;
use crate::remote::{fetch_all_records, RecordStore};
use crate::transform::transform_records;
use i18nsync_store::{mappings_equal, ChangeSummary, Locale, MessageFiles, TranslationMap};
use std::path::PathBuf;
use tracing::info;

/// What a pull did to one locale file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleOutcome {
    /// The locale.
    pub locale: Locale,
    /// Whether the remote content differs from the file.
    pub changed: bool,
    /// Whether the file was rewritten.
    pub written: bool,
    /// Backup of the previous file, if one was taken.
    pub backup: Option<PathBuf>,
    /// Per-key differences, empty when unchanged.
    pub summary: ChangeSummary,
    /// Number of keys in the pulled mapping.
    pub keys: usize,
}

/// Result of a pull run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullReport {
    /// Records fetched from the remote table.
    pub records_fetched: usize,
    /// Records dropped for having no key.
    pub skipped_records: usize,
    /// One outcome per locale, in [`Locale::ALL`] order.
    pub locales: Vec<LocaleOutcome>,
    /// Whether the run was a dry run.
    pub dry_run: bool,
}

impl PullReport {
    /// Returns true if no locale file needed changing.
    pub fn is_noop(&self) -> bool {
        self.locales.iter().all(|l| !l.changed)
    }

    /// Returns the outcome for a locale.
    pub fn outcome(&self, locale: Locale) -> Option<&LocaleOutcome> {
        self.locales.iter().find(|l| l.locale == locale)
    }
}

/// Pulls remote records into the local message files.
#[derive(Debug, Clone, Default)]
pub struct PullPipeline {
    dry_run: bool,
}

impl PullPipeline {
    /// Creates a pipeline that writes changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs one pull.
    ///
    /// Each locale file is compared with the pulled mapping as a whole. Only
    /// files that differ are backed up and rewritten; an unchanged file is
    /// not touched at all.
    ///
    /// # Errors
    ///
    /// Any fetch, read, backup, or write failure aborts the run.
    pub fn run<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        files: &MessageFiles,
    ) -> SyncResult<PullReport> {
        info!("reading records from the remote table");
        let records = fetch_all_records(store)?;
        info!("read {} records", records.len());

        let pulled = transform_records(&records);
        info!(
            "converted: {} en entries, {} zh-TW entries",
            pulled.en.len(),
            pulled.zh_tw.len()
        );

        info!("checking existing files in {}", files.dir().display());
        let mut existing: Vec<(Locale, TranslationMap)> = Vec::with_capacity(Locale::ALL.len());
        for locale in Locale::ALL {
            existing.push((locale, files.read_or_empty(locale)?));
        }

        let mut locales: Vec<LocaleOutcome> = existing
            .iter()
            .map(|(locale, old)| {
                let new = pulled.get(*locale);
                let changed = !mappings_equal(old, new);
                LocaleOutcome {
                    locale: *locale,
                    changed,
                    written: false,
                    backup: None,
                    summary: if changed {
                        ChangeSummary::between(old, new)
                    } else {
                        ChangeSummary::default()
                    },
                    keys: new.len(),
                }
            })
            .collect();

        let mut report = PullReport {
            records_fetched: records.len(),
            skipped_records: pulled.skipped,
            locales: Vec::new(),
            dry_run: self.dry_run,
        };

        if locales.iter().all(|l| !l.changed) {
            info!("files are already up to date");
            report.locales = locales;
            return Ok(report);
        }

        for outcome in &locales {
            info!(
                "{}: {}",
                files.path(outcome.locale).display(),
                if outcome.changed { "changed" } else { "unchanged" }
            );
        }

        if self.dry_run {
            info!("dry run: leaving files untouched");
            report.locales = locales;
            return Ok(report);
        }

        for outcome in locales.iter_mut().filter(|l| l.changed) {
            outcome.backup = files.backup(outcome.locale)?;
            if outcome.backup.is_none() {
                info!(
                    "{} does not exist yet, nothing to back up",
                    files.path(outcome.locale).display()
                );
            }
        }

        for outcome in locales.iter_mut().filter(|l| l.changed) {
            files.write(outcome.locale, pulled.get(outcome.locale))?;
            outcome.written = true;
            info!("updated {}", files.path(outcome.locale).display());
        }

        report.locales = locales;
        Ok(report)
    }
}
