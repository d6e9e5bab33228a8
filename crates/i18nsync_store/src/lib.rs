//! # i18nsync Store
//!
//! Local side of the translation sync: the per-locale message files.
//!
//! This crate knows nothing about the remote table. It owns:
//! - [`TranslationMap`] - an ordered key → string mapping for one locale
//! - [`Locale`] - the two supported locales and their file names
//! - [`MessageFiles`] - reading and writing `<dir>/<locale>.json`
//! - [`backup_file`] - timestamped copies taken before an overwrite
//! - [`mappings_equal`] and [`ChangeSummary`] - comparison of two mappings
//!
//! ## File format
//!
//! Message files are flat JSON objects of string values, indented with two
//! spaces, keys in ascending order, terminated by a newline:
//!
//! ```text
//! {
//!   "home.title": "Home",
//!   "home.welcome": "Welcome"
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use i18nsync_store::{mappings_equal, ChangeSummary, TranslationMap};
//!
//! let old: TranslationMap = [("a", "1"), ("b", "2")].into_iter().collect();
//! let new: TranslationMap = [("a", "1"), ("c", "3")].into_iter().collect();
//!
//! assert!(!mappings_equal(&old, &new));
//! let summary = ChangeSummary::between(&old, &new);
//! assert_eq!(summary.added, vec!["c".to_string()]);
//! assert_eq!(summary.removed, vec!["b".to_string()]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backup;
mod diff;
mod error;
mod file;
mod locale;
mod mapping;

pub use backup::{backup_file, backup_file_with, backup_path_for, backup_timestamp};
pub use diff::{mappings_equal, ChangeSummary};
pub use error::{StoreError, StoreResult};
pub use file::{read_mapping, read_mapping_or_empty, write_mapping, MessageFiles};
pub use locale::Locale;
pub use mapping::TranslationMap;
