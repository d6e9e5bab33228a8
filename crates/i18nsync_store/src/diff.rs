//! Comparison of translation mappings.

use crate::mapping::TranslationMap;

/// Returns true if both mappings have the same key set and every key maps
/// to an identical string.
///
/// A value read from `null` only equals another `null`. Iteration order
/// plays no part in the comparison.
pub fn mappings_equal(a: &TranslationMap, b: &TranslationMap) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter()
        .all(|(key, value)| b.get(key) == Some(value) && a.is_null(key) == b.is_null(key))
}

/// Per-key differences between an old and a new mapping.
///
/// The three lists are disjoint and sorted. Presence is decided by key
/// alone, so a key whose value is an empty string still counts as present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Keys in the new mapping but not the old one.
    pub added: Vec<String>,
    /// Keys in both mappings whose values differ.
    pub modified: Vec<String>,
    /// Keys in the old mapping but not the new one.
    pub removed: Vec<String>,
}

impl ChangeSummary {
    /// Classifies every key of `old` and `new`.
    pub fn between(old: &TranslationMap, new: &TranslationMap) -> Self {
        let mut summary = Self::default();

        for (key, value) in new.iter() {
            match old.get(key) {
                None => summary.added.push(key.to_string()),
                Some(previous) if previous != value || old.is_null(key) != new.is_null(key) => {
                    summary.modified.push(key.to_string())
                }
                Some(_) => {}
            }
        }

        summary.removed = old
            .keys()
            .filter(|key| !new.contains_key(key))
            .map(str::to_string)
            .collect();

        summary
    }

    /// Returns true if no key was added, modified, or removed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Total number of changed keys.
    pub fn total(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> TranslationMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn equal_ignores_insertion_order() {
        let mut a = TranslationMap::new();
        a.insert("x", "1");
        a.insert("y", "2");
        let mut b = TranslationMap::new();
        b.insert("y", "2");
        b.insert("x", "1");
        assert!(mappings_equal(&a, &b));
    }

    #[test]
    fn different_cardinality_is_unequal() {
        assert!(!mappings_equal(&map(&[("a", "1")]), &map(&[("a", "1"), ("b", "2")])));
    }

    #[test]
    fn same_size_different_keys_is_unequal() {
        assert!(!mappings_equal(&map(&[("a", "1")]), &map(&[("b", "1")])));
    }

    #[test]
    fn value_change_is_unequal() {
        assert!(!mappings_equal(&map(&[("a", "1")]), &map(&[("a", "2")])));
    }

    #[test]
    fn empty_value_differs_from_absent_key() {
        assert!(!mappings_equal(&map(&[]), &map(&[("a", "")])));
    }

    #[test]
    fn classification() {
        let old = map(&[("a", "1"), ("b", "2")]);
        let new = map(&[("a", "1"), ("c", "3")]);

        let summary = ChangeSummary::between(&old, &new);
        assert_eq!(summary.added, vec!["c"]);
        assert!(summary.modified.is_empty());
        assert_eq!(summary.removed, vec!["b"]);
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn empty_string_values_are_present() {
        let old = map(&[("a", "")]);
        let new = map(&[("a", "filled"), ("b", "")]);

        let summary = ChangeSummary::between(&old, &new);
        assert_eq!(summary.added, vec!["b"]);
        assert_eq!(summary.modified, vec!["a"]);
        assert!(summary.removed.is_empty());
    }

    #[test]
    fn null_differs_from_empty_string() {
        let read = TranslationMap::from_json_str(r#"{"a": null}"#).unwrap();
        let pulled = map(&[("a", "")]);

        assert!(!mappings_equal(&read, &pulled));
        assert!(!mappings_equal(&pulled, &read));
        assert!(mappings_equal(&read, &read.clone()));
        assert_eq!(ChangeSummary::between(&read, &pulled).modified, vec!["a"]);
    }

    #[test]
    fn identical_mappings_have_empty_summary() {
        let m = map(&[("a", "1")]);
        assert!(ChangeSummary::between(&m, &m).is_empty());
    }
}
