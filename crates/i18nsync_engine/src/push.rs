//! Push pipeline: local message files → remote table.

use crate::batch::{BatchWriter, Sleeper, ThreadSleeper};
use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::plan::{plan_push, RemoteSnapshot};
use crate::remote::{fetch_all_records, RecordStore};
use crate::transform::merge_mappings;
use i18nsync_store::{Locale, MessageFiles};
use tracing::info;

/// Result of a push run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    /// Records built from the local files.
    pub local_records: usize,
    /// Distinct keys found remotely.
    pub remote_records: usize,
    /// Records planned for creation.
    pub to_create: usize,
    /// Records planned for update.
    pub to_update: usize,
    /// Records already identical remotely.
    pub unchanged: usize,
    /// Records actually created.
    pub created: usize,
    /// Records actually updated.
    pub updated: usize,
    /// Whether the run was a dry run.
    pub dry_run: bool,
}

impl PushReport {
    /// Returns true if the remote table already matched the local files.
    pub fn is_noop(&self) -> bool {
        self.to_create == 0 && self.to_update == 0
    }
}

/// Pushes local message files to the remote table.
#[derive(Debug, Clone)]
pub struct PushPipeline<S: Sleeper = ThreadSleeper> {
    writer: BatchWriter<S>,
    dry_run: bool,
}

impl PushPipeline<ThreadSleeper> {
    /// Creates a pipeline with the default batch size and delay.
    pub fn new() -> Self {
        Self {
            writer: BatchWriter::default(),
            dry_run: false,
        }
    }

    /// Creates a pipeline from a configuration.
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            writer: BatchWriter::new(config.batch_size, config.batch_delay),
            dry_run: config.dry_run,
        }
    }
}

impl Default for PushPipeline<ThreadSleeper> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sleeper> PushPipeline<S> {
    /// Replaces the batch writer.
    pub fn with_writer<T: Sleeper>(self, writer: BatchWriter<T>) -> PushPipeline<T> {
        PushPipeline {
            writer,
            dry_run: self.dry_run,
        }
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs one push.
    ///
    /// Both message files must exist. Creates run before updates, each in
    /// batches.
    ///
    /// # Errors
    ///
    /// Any read, fetch, or batch failure aborts the run. Batches applied
    /// before a failure stay applied.
    pub fn run<R: RecordStore + ?Sized>(
        &self,
        store: &R,
        files: &MessageFiles,
    ) -> SyncResult<PushReport> {
        info!("reading message files from {}", files.dir().display());
        let en = files.read(Locale::En)?;
        let zh_tw = files.read(Locale::ZhTw)?;
        info!("read {} ({} keys)", files.path(Locale::En).display(), en.len());
        info!("read {} ({} keys)", files.path(Locale::ZhTw).display(), zh_tw.len());

        let local = merge_mappings(&en, &zh_tw);
        info!("merged into {} records", local.len());

        info!("checking existing remote records");
        let remote = fetch_all_records(store)?;
        let snapshot = RemoteSnapshot::from_records(&remote);
        info!("found {} existing records", snapshot.len());

        let mut report = PushReport {
            local_records: local.len(),
            remote_records: snapshot.len(),
            dry_run: self.dry_run,
            ..PushReport::default()
        };

        let plan = plan_push(local, &snapshot);
        report.to_create = plan.to_create.len();
        report.to_update = plan.to_update.len();
        report.unchanged = plan.unchanged;
        info!(
            "to create: {}, to update: {}, unchanged: {}",
            report.to_create, report.to_update, report.unchanged
        );

        if plan.is_noop() {
            info!("remote table is already up to date");
            return Ok(report);
        }
        if self.dry_run {
            info!("dry run: no records written");
            return Ok(report);
        }

        if !plan.to_create.is_empty() {
            info!("creating records");
            let created = self.writer.run(&plan.to_create, |batch| store.create(batch))?;
            report.created = created.len();
            info!("created {} records", plan.to_create.len());
        }

        if !plan.to_update.is_empty() {
            info!("updating records");
            let updated = self.writer.run(&plan.to_update, |batch| store.update(batch))?;
            report.updated = updated.len();
            info!("updated {} records", plan.to_update.len());
        }

        Ok(report)
    }
}
