//! Remote record store abstraction.

use crate::config::MAX_BATCH_SIZE;
use crate::error::{SyncError, SyncResult};
use crate::record::{RecordFields, RecordPage, RecordUpdate, RemoteFields, RemoteRecord};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// A remote table of translation records.
///
/// This trait abstracts the network layer so pipelines can run against the
/// hosted table or an in-memory fake.
pub trait RecordStore: Send + Sync {
    /// Lists one page of records, starting at `offset` (`None` for the
    /// first page).
    fn list_page(&self, offset: Option<&str>) -> SyncResult<RecordPage>;

    /// Creates records. Callers send at most [`MAX_BATCH_SIZE`] at a time.
    fn create(&self, batch: &[RecordFields]) -> SyncResult<Vec<RemoteRecord>>;

    /// Replaces the fields of existing records. Callers send at most
    /// [`MAX_BATCH_SIZE`] at a time.
    fn update(&self, batch: &[RecordUpdate]) -> SyncResult<Vec<RemoteRecord>>;
}

/// Fetches every record by walking pages in order.
///
/// # Errors
///
/// Returns [`SyncError::Fetch`] on the first failed page. Nothing is
/// retried.
pub fn fetch_all_records<S: RecordStore + ?Sized>(store: &S) -> SyncResult<Vec<RemoteRecord>> {
    let mut records = Vec::new();
    let mut offset: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store
            .list_page(offset.as_deref())
            .map_err(SyncError::into_fetch)?;
        pages += 1;
        records.extend(page.records);

        match page.offset {
            Some(next) if offset.as_deref() == Some(next.as_str()) => {
                return Err(SyncError::Fetch {
                    status: None,
                    message: format!("remote store returned the same page offset twice: {next}"),
                });
            }
            Some(next) => offset = Some(next),
            None => break,
        }
    }

    debug!("fetched {} records in {} pages", records.len(), pages);
    Ok(records)
}

/// A call observed by [`MemoryRecordStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// A page listing.
    List {
        /// Requested offset.
        offset: Option<String>,
    },
    /// A create call.
    Create {
        /// Number of records in the call.
        size: usize,
    },
    /// An update call.
    Update {
        /// Number of records in the call.
        size: usize,
    },
}

#[derive(Debug, Default, Clone, Copy)]
struct Failures {
    list: Option<u16>,
    create: Option<(usize, u16)>,
    update: Option<(usize, u16)>,
}

/// An in-memory record store for testing.
///
/// Pages are served `page_size` records at a time, ids are assigned on
/// create, and every call is recorded. Failures can be injected per
/// operation.
#[derive(Debug)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<RemoteRecord>>,
    calls: RwLock<Vec<StoreCall>>,
    failures: RwLock<Failures>,
    page_size: usize,
    next_id: AtomicU64,
}

impl MemoryRecordStore {
    /// Creates an empty store with 100 records per page.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
            failures: RwLock::new(Failures::default()),
            page_size: 100,
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates a store holding the given records.
    pub fn with_records(records: Vec<RemoteRecord>) -> Self {
        let store = Self::new();
        *store.records.write() = records;
        store
    }

    /// Sets the number of records per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Adds a record with every field present and returns its id.
    pub fn insert(&self, key: &str, en: &str, zh_tw: &str) -> String {
        let id = self.allocate_id();
        self.records
            .write()
            .push(RemoteRecord::new(id.clone(), key, en, zh_tw));
        id
    }

    /// Adds a record exactly as given.
    pub fn insert_raw(&self, record: RemoteRecord) {
        self.records.write().push(record);
    }

    /// Returns a snapshot of all records.
    pub fn records(&self) -> Vec<RemoteRecord> {
        self.records.read().clone()
    }

    /// Returns every call made so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.read().clone()
    }

    /// Returns only the create and update calls.
    pub fn write_calls(&self) -> Vec<StoreCall> {
        self.calls
            .read()
            .iter()
            .filter(|c| !matches!(c, StoreCall::List { .. }))
            .cloned()
            .collect()
    }

    /// Makes every listing fail with `status`.
    pub fn fail_list_with(&self, status: u16) {
        self.failures.write().list = Some(status);
    }

    /// Makes create calls fail with `status` after `successful` calls.
    pub fn fail_create_after(&self, successful: usize, status: u16) {
        self.failures.write().create = Some((successful, status));
    }

    /// Makes update calls fail with `status` after `successful` calls.
    pub fn fail_update_after(&self, successful: usize, status: u16) {
        self.failures.write().update = Some((successful, status));
    }

    fn allocate_id(&self) -> String {
        format!("rec{:014}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn count_calls(&self, pred: impl Fn(&StoreCall) -> bool) -> usize {
        self.calls.read().iter().filter(|c| pred(*c)).count()
    }

    fn check_batch_size(size: usize) -> SyncResult<()> {
        if size > MAX_BATCH_SIZE {
            return Err(SyncError::remote(
                422,
                format!("at most {MAX_BATCH_SIZE} records per request, got {size}"),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryRecordStore {
    fn list_page(&self, offset: Option<&str>) -> SyncResult<RecordPage> {
        self.calls.write().push(StoreCall::List {
            offset: offset.map(str::to_string),
        });

        if let Some(status) = self.failures.read().list {
            return Err(SyncError::remote(status, "injected list failure"));
        }

        let start = match offset {
            None => 0,
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| SyncError::remote(422, format!("invalid offset {raw}")))?,
        };

        let records = self.records.read();
        let end = (start + self.page_size).min(records.len());
        let page = records.get(start..end).unwrap_or_default().to_vec();
        let offset = (end < records.len()).then(|| end.to_string());

        Ok(RecordPage {
            records: page,
            offset,
        })
    }

    fn create(&self, batch: &[RecordFields]) -> SyncResult<Vec<RemoteRecord>> {
        let previous = self.count_calls(|c| matches!(c, StoreCall::Create { .. }));
        self.calls
            .write()
            .push(StoreCall::Create { size: batch.len() });

        if let Some((successful, status)) = self.failures.read().create {
            if previous >= successful {
                return Err(SyncError::remote(status, "injected create failure"));
            }
        }
        Self::check_batch_size(batch.len())?;

        let created: Vec<RemoteRecord> = batch
            .iter()
            .map(|fields| RemoteRecord {
                id: self.allocate_id(),
                fields: RemoteFields {
                    key: Some(fields.key.clone()),
                    en: Some(fields.en.clone()),
                    zh_tw: Some(fields.zh_tw.clone()),
                },
            })
            .collect();

        self.records.write().extend(created.iter().cloned());
        Ok(created)
    }

    fn update(&self, batch: &[RecordUpdate]) -> SyncResult<Vec<RemoteRecord>> {
        let previous = self.count_calls(|c| matches!(c, StoreCall::Update { .. }));
        self.calls
            .write()
            .push(StoreCall::Update { size: batch.len() });

        if let Some((successful, status)) = self.failures.read().update {
            if previous >= successful {
                return Err(SyncError::remote(status, "injected update failure"));
            }
        }
        Self::check_batch_size(batch.len())?;

        let mut records = self.records.write();
        let mut updated = Vec::with_capacity(batch.len());
        for change in batch {
            let record = records
                .iter_mut()
                .find(|r| r.id == change.id)
                .ok_or_else(|| SyncError::remote(404, format!("record {} not found", change.id)))?;
            record.fields = RemoteFields {
                key: Some(change.fields.key.clone()),
                en: Some(change.fields.en.clone()),
                zh_tw: Some(change.fields.zh_tw.clone()),
            };
            updated.push(record.clone());
        }

        Ok(updated)
    }
}
