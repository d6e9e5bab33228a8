//! # i18nsync Testkit
//!
//! Test utilities for i18nsync.
//!
//! This crate provides:
//! - Temporary message directories with backup inspection
//! - A no-op and a recording [`Sleeper`](i18nsync_engine::Sleeper)
//! - Property-based generators for keys, mappings and remote records
//!
//! ## Usage
//!
//! ```rust,ignore
//! use i18nsync_testkit::prelude::*;
//!
//! #[test]
//! fn pull_into_empty_dir() {
//!     let workspace = TestWorkspace::new();
//!     let store = MemoryRecordStore::new();
//!     store.insert("a", "A", "甲");
//!     PullPipeline::new().run(&store, workspace.files()).unwrap();
//!     assert!(workspace.backups().is_empty());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use i18nsync_engine::{
        MemoryRecordStore, PullPipeline, PushPipeline, RecordStore, StoreCall, SyncError,
    };
    pub use i18nsync_store::{Locale, MessageFiles, TranslationMap};
}

pub use fixtures::*;
pub use generators::*;
