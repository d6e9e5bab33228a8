//! Ordered translation mappings.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A key → string mapping for a single locale.
///
/// Entries are held in ascending key order, and serialization walks them in
/// that order. Message files written from a `TranslationMap` are therefore
/// byte-stable for the same content, which keeps diffs reviewable.
///
/// A key read from a JSON `null` holds an empty string but stays marked as
/// null, so it never compares equal to a real `""` and the next write
/// replaces the `null` in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationMap {
    entries: BTreeMap<String, String>,
    nulls: BTreeSet<String>,
}

impl TranslationMap {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the mapping has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns true if `key` is present, whatever its value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns true if `key` was read from a JSON `null`.
    pub fn is_null(&self, key: &str) -> bool {
        self.nulls.contains(key)
    }

    /// Returns true if any key was read from a JSON `null`.
    pub fn has_nulls(&self) -> bool {
        !self.nulls.is_empty()
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        self.nulls.remove(&key);
        self.entries.insert(key, value.into())
    }

    /// Inserts a value only if the key is not present yet.
    ///
    /// Returns false when an earlier value was kept.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        use std::collections::btree_map::Entry;

        match self.entries.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Iterates keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders the canonical file content: two-space indented JSON with a
    /// trailing newline.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Parses a flat JSON object of strings.
    ///
    /// A `null` value reads as an empty string marked as null. Any other
    /// non-string value is rejected.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

impl<K, V> FromIterator<(K, V)> for TranslationMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            nulls: BTreeSet::new(),
        }
    }
}

impl<'a> IntoIterator for &'a TranslationMap {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for TranslationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TranslationMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;
        let mut map = Self::new();
        for (key, value) in raw {
            match value {
                Some(value) => {
                    map.entries.insert(key, value);
                }
                None => {
                    map.nulls.insert(key.clone());
                    map.entries.insert(key, String::new());
                }
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_sorted_with_trailing_newline() {
        let mut map = TranslationMap::new();
        map.insert("zeta", "Z");
        map.insert("alpha", "A");
        map.insert("mid", "M");

        let json = map.to_json_string().unwrap();
        assert_eq!(
            json,
            "{\n  \"alpha\": \"A\",\n  \"mid\": \"M\",\n  \"zeta\": \"Z\"\n}\n"
        );
    }

    #[test]
    fn empty_mapping_serializes_as_empty_object() {
        assert_eq!(TranslationMap::new().to_json_string().unwrap(), "{}\n");
    }

    #[test]
    fn non_ascii_is_written_verbatim() {
        let map: TranslationMap = [("greeting", "你好")].into_iter().collect();
        let json = map.to_json_string().unwrap();
        assert!(json.contains("你好"));
    }

    #[test]
    fn null_reads_as_blank() {
        let map = TranslationMap::from_json_str(r#"{"a": null, "b": "x"}"#).unwrap();
        assert_eq!(map.get("a"), Some(""));
        assert_eq!(map.get("b"), Some("x"));
        assert_eq!(map.len(), 2);
        assert!(map.is_null("a"));
        assert!(!map.is_null("b"));
    }

    #[test]
    fn null_is_written_as_empty_string() {
        let mut map = TranslationMap::from_json_str(r#"{"a": null}"#).unwrap();
        assert_eq!(map.to_json_string().unwrap(), "{\n  \"a\": \"\"\n}\n");

        map.insert("a", "");
        assert!(!map.has_nulls());
    }

    #[test]
    fn non_string_values_are_rejected() {
        assert!(TranslationMap::from_json_str(r#"{"a": 1}"#).is_err());
        assert!(TranslationMap::from_json_str(r#"{"a": {"nested": "x"}}"#).is_err());
        assert!(TranslationMap::from_json_str(r#"["a"]"#).is_err());
    }

    #[test]
    fn insert_if_absent_keeps_first() {
        let mut map = TranslationMap::new();
        assert!(map.insert_if_absent("k", "first"));
        assert!(!map.insert_if_absent("k", "second"));
        assert_eq!(map.get("k"), Some("first"));
    }

    #[test]
    fn empty_string_is_present() {
        let map: TranslationMap = [("k", "")].into_iter().collect();
        assert!(map.contains_key("k"));
        assert_eq!(map.get("k"), Some(""));
    }
}
