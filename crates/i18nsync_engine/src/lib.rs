//! # i18nsync Engine
//!
//! Two-way synchronization between a remote translation table and the local
//! message files.
//!
//! This crate provides:
//! - [`SyncConfig`] - connection and batching settings
//! - [`RecordStore`] - the remote table abstraction, with the hosted
//!   [`AirtableStore`] and the in-memory [`MemoryRecordStore`]
//! - [`PullPipeline`] - remote → local, with backup-on-change
//! - [`PushPipeline`] - local → remote, with create/update/unchanged planning
//!   and rate-limited batches
//!
//! ## Pull
//!
//! ```text
//! fetch all pages → split by locale → compare with each file
//!     → (changed) backup → write
//! ```
//!
//! ## Push
//!
//! ```text
//! read both files → merge keys → fetch all pages → plan
//!     → create in batches → update in batches
//! ```
//!
//! ## Example
//!
//! ```rust
//! use i18nsync_engine::{MemoryRecordStore, PullPipeline};
//! use i18nsync_store::{Locale, MessageFiles};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let files = MessageFiles::new(dir.path());
//!
//! let store = MemoryRecordStore::new();
//! store.insert("home.title", "Home", "首頁");
//!
//! let report = PullPipeline::new().run(&store, &files).unwrap();
//! assert!(report.outcome(Locale::En).unwrap().written);
//! assert_eq!(files.read(Locale::ZhTw).unwrap().get("home.title"), Some("首頁"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod http;
mod plan;
mod pull;
mod push;
mod record;
mod remote;
mod transform;

pub use batch::{BatchWriter, Sleeper, ThreadSleeper};
pub use config::{
    SyncConfig, DEFAULT_API_URL, DEFAULT_BATCH_DELAY, DEFAULT_MESSAGES_DIR, DEFAULT_TABLE_NAME,
    DEFAULT_VIEW, MAX_BATCH_SIZE,
};
pub use error::{SyncError, SyncResult};
pub use http::{
    AirtableStore, HttpClient, HttpRequest, HttpResponse, Method, ReqwestClient,
};
pub use plan::{plan_push, PushPlan, RemoteEntry, RemoteSnapshot};
pub use pull::{LocaleOutcome, PullPipeline, PullReport};
pub use push::{PushPipeline, PushReport};
pub use record::{RecordFields, RecordPage, RecordUpdate, RemoteFields, RemoteRecord};
pub use remote::{fetch_all_records, MemoryRecordStore, RecordStore, StoreCall};
pub use transform::{merge_mappings, transform_records, PulledMappings};
