//! Push planning: which local records to create, update, or leave alone.

use crate::record::{RecordFields, RecordUpdate, RemoteRecord};
use std::collections::HashMap;
use tracing::debug;

/// A remote record as seen by the push planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Remote identifier.
    pub id: String,
    /// English value, empty when the field is missing.
    pub en: String,
    /// Traditional Chinese value, empty when the field is missing.
    pub zh_tw: String,
}

/// Existing remote records indexed by key.
#[derive(Debug, Clone, Default)]
pub struct RemoteSnapshot {
    entries: HashMap<String, RemoteEntry>,
    duplicates: usize,
}

impl RemoteSnapshot {
    /// Indexes records by key.
    ///
    /// Records without a key are ignored and the first record seen for a
    /// key wins. Missing fields compare as empty strings.
    pub fn from_records(records: &[RemoteRecord]) -> Self {
        let mut snapshot = Self::default();

        for record in records {
            let Some(key) = record.key() else {
                continue;
            };
            if snapshot.entries.contains_key(key) {
                debug!("ignoring duplicate record {} for key {key}", record.id);
                snapshot.duplicates += 1;
                continue;
            }
            snapshot.entries.insert(
                key.to_string(),
                RemoteEntry {
                    id: record.id.clone(),
                    en: record.fields.en.clone().unwrap_or_default(),
                    zh_tw: record.fields.zh_tw.clone().unwrap_or_default(),
                },
            );
        }

        snapshot
    }

    /// Returns the entry for a key.
    pub fn get(&self, key: &str) -> Option<&RemoteEntry> {
        self.entries.get(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no keyed record exists remotely.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records ignored because their key was already taken.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// The operations needed to bring the remote table in line with local files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushPlan {
    /// Keys missing remotely.
    pub to_create: Vec<RecordFields>,
    /// Keys whose `en` or `zh-TW` value differs; full field replacement.
    pub to_update: Vec<RecordUpdate>,
    /// Keys already identical remotely.
    pub unchanged: usize,
}

impl PushPlan {
    /// Returns true if nothing needs to be written.
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty()
    }
}

/// Partitions local records against the remote snapshot.
pub fn plan_push(local: Vec<RecordFields>, snapshot: &RemoteSnapshot) -> PushPlan {
    let mut plan = PushPlan::default();

    for fields in local {
        match snapshot.get(&fields.key) {
            None => plan.to_create.push(fields),
            Some(remote) if remote.en != fields.en || remote.zh_tw != fields.zh_tw => {
                plan.to_update.push(RecordUpdate {
                    id: remote.id.clone(),
                    fields,
                });
            }
            Some(_) => plan.unchanged += 1,
        }
    }

    plan
}
