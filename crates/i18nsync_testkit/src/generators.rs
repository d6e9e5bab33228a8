//! Property-based test generators using proptest.
//!
//! Keys are drawn from a small dotted alphabet so that independently
//! generated mappings overlap often enough to exercise updates.

use i18nsync_engine::{RemoteFields, RemoteRecord};
use i18nsync_store::TranslationMap;
use proptest::prelude::*;

/// Strategy for translation keys such as `home.title`.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-d]{1,2}(\\.[a-d]{1,2})?").expect("Invalid regex")
}

/// Strategy for translation values, including empty strings and non-ASCII.
pub fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        prop::string::string_regex("[A-Za-z ]{1,12}").expect("Invalid regex"),
        prop::string::string_regex("[首頁歡迎設定]{1,4}").expect("Invalid regex"),
        prop::string::string_regex("[\"\\\\/{}]{1,4}").expect("Invalid regex"),
    ]
}

/// Strategy for a mapping of up to `max_len` entries.
pub fn mapping_strategy(max_len: usize) -> impl Strategy<Value = TranslationMap> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..=max_len)
        .prop_map(|entries| entries.into_iter().collect::<TranslationMap>())
}

/// Strategy for a remote record whose fields may be missing.
pub fn remote_record_strategy() -> impl Strategy<Value = RemoteRecord> {
    (
        any::<u32>(),
        prop::option::weighted(0.9, key_strategy()),
        prop::option::weighted(0.8, value_strategy()),
        prop::option::weighted(0.8, value_strategy()),
    )
        .prop_map(|(id, key, en, zh_tw)| RemoteRecord {
            id: format!("rec{id:014}"),
            fields: RemoteFields { key, en, zh_tw },
        })
}

/// Strategy for a list of remote records with distinct ids.
pub fn remote_records_strategy(max_len: usize) -> impl Strategy<Value = Vec<RemoteRecord>> {
    prop::collection::vec(remote_record_strategy(), 0..=max_len).prop_map(|mut records| {
        for (index, record) in records.iter_mut().enumerate() {
            record.id = format!("rec{index:014}");
        }
        records
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
