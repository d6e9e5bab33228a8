//! Conversions between remote records and translation mappings.

use crate::record::{RecordFields, RemoteRecord};
use i18nsync_store::{Locale, TranslationMap};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Mappings built from a remote listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PulledMappings {
    /// English mapping.
    pub en: TranslationMap,
    /// Traditional Chinese mapping.
    pub zh_tw: TranslationMap,
    /// Records dropped for having no key.
    pub skipped: usize,
    /// Records dropped because an earlier record had the same key.
    pub duplicates: usize,
}

impl PulledMappings {
    /// Returns the mapping for a locale.
    pub fn get(&self, locale: Locale) -> &TranslationMap {
        match locale {
            Locale::En => &self.en,
            Locale::ZhTw => &self.zh_tw,
        }
    }
}

/// Splits remote records into one mapping per locale.
///
/// Records without a key are skipped. A missing field leaves the key out of
/// that locale's mapping, while an empty string is kept. When several
/// records share a key, the first one wins.
pub fn transform_records(records: &[RemoteRecord]) -> PulledMappings {
    let mut pulled = PulledMappings::default();
    let mut seen = HashSet::new();

    for record in records {
        let Some(key) = record.key() else {
            pulled.skipped += 1;
            continue;
        };
        if !seen.insert(key) {
            debug!("ignoring duplicate record {} for key {key}", record.id);
            pulled.duplicates += 1;
            continue;
        }

        if let Some(en) = record.value(Locale::En) {
            pulled.en.insert(key, en);
        }
        if let Some(zh_tw) = record.value(Locale::ZhTw) {
            pulled.zh_tw.insert(key, zh_tw);
        }
    }

    if pulled.skipped > 0 {
        debug!("skipped {} records without a key", pulled.skipped);
    }

    pulled
}

/// Merges both locale mappings into one field set per key.
///
/// Every key found in either mapping produces a record, in ascending key
/// order. A locale that lacks the key contributes an empty string.
pub fn merge_mappings(en: &TranslationMap, zh_tw: &TranslationMap) -> Vec<RecordFields> {
    let keys: BTreeSet<&str> = en.keys().chain(zh_tw.keys()).collect();

    keys.into_iter()
        .map(|key| {
            RecordFields::new(
                key,
                en.get(key).unwrap_or_default(),
                zh_tw.get(key).unwrap_or_default(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RemoteFields;

    fn record(id: &str, key: Option<&str>, en: Option<&str>, zh_tw: Option<&str>) -> RemoteRecord {
        RemoteRecord {
            id: id.into(),
            fields: RemoteFields {
                key: key.map(Into::into),
                en: en.map(Into::into),
                zh_tw: zh_tw.map(Into::into),
            },
        }
    }

    #[test]
    fn absent_fields_are_omitted_empty_fields_kept() {
        let pulled = transform_records(&[
            record("r1", Some("a"), Some("A"), None),
            record("r2", Some("b"), Some(""), Some("乙")),
        ]);

        assert_eq!(pulled.en.get("a"), Some("A"));
        assert_eq!(pulled.en.get("b"), Some(""));
        assert!(!pulled.zh_tw.contains_key("a"));
        assert_eq!(pulled.zh_tw.get("b"), Some("乙"));
    }

    #[test]
    fn keyless_records_are_skipped() {
        let pulled = transform_records(&[
            record("r1", None, Some("orphan"), None),
            record("r2", Some(""), Some("blank key"), None),
            record("r3", Some("ok"), Some("fine"), Some("好")),
        ]);

        assert_eq!(pulled.skipped, 2);
        assert_eq!(pulled.en.len(), 1);
        assert_eq!(pulled.zh_tw.len(), 1);
    }

    #[test]
    fn first_record_wins_for_duplicate_keys() {
        let pulled = transform_records(&[
            record("r1", Some("dup"), Some("first"), None),
            record("r2", Some("dup"), Some("second"), Some("二")),
        ]);

        assert_eq!(pulled.en.get("dup"), Some("first"));
        assert!(!pulled.zh_tw.contains_key("dup"));
        assert_eq!(pulled.duplicates, 1);
    }

    #[test]
    fn output_is_key_sorted() {
        let pulled = transform_records(&[
            record("r1", Some("zeta"), Some("z"), Some("z")),
            record("r2", Some("alpha"), Some("a"), Some("a")),
            record("r3", Some("Mid"), Some("m"), Some("m")),
        ]);

        let keys: Vec<&str> = pulled.en.keys().collect();
        assert_eq!(keys, vec!["Mid", "alpha", "zeta"]);
    }

    #[test]
    fn merge_covers_union_of_keys() {
        let en: TranslationMap = [("a", "1"), ("b", "2")].into_iter().collect();
        let zh_tw: TranslationMap = [("b", "兩"), ("c", "3")].into_iter().collect();

        let merged = merge_mappings(&en, &zh_tw);

        assert_eq!(
            merged,
            vec![
                RecordFields::new("a", "1", ""),
                RecordFields::new("b", "2", "兩"),
                RecordFields::new("c", "", "3"),
            ]
        );
    }

    #[test]
    fn merge_of_empty_mappings_is_empty() {
        assert!(merge_mappings(&TranslationMap::new(), &TranslationMap::new()).is_empty());
    }
}
