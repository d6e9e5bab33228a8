//! Remote record model.

use i18nsync_store::Locale;
use serde::{Deserialize, Serialize};

/// Field values of a record as stored remotely.
///
/// Any field may be missing: the remote table omits empty cells, and rows
/// may be half-filled by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFields {
    /// Reconciliation key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// English value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    /// Traditional Chinese value.
    #[serde(
        rename = "zh-TW",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub zh_tw: Option<String>,
}

/// A record read from the remote table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Opaque identifier assigned by the remote store.
    pub id: String,
    /// Field values.
    #[serde(default)]
    pub fields: RemoteFields,
}

impl RemoteRecord {
    /// Creates a record with every field present.
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        en: impl Into<String>,
        zh_tw: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            fields: RemoteFields {
                key: Some(key.into()),
                en: Some(en.into()),
                zh_tw: Some(zh_tw.into()),
            },
        }
    }

    /// Returns the key, or `None` when it is missing or empty.
    pub fn key(&self) -> Option<&str> {
        self.fields.key.as_deref().filter(|k| !k.is_empty())
    }

    /// Returns the value for a locale, if the field is present.
    pub fn value(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::En => self.fields.en.as_deref(),
            Locale::ZhTw => self.fields.zh_tw.as_deref(),
        }
    }
}

/// The complete field set sent on create and update.
///
/// Every field is always present; a missing translation is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    /// Reconciliation key.
    pub key: String,
    /// English value.
    pub en: String,
    /// Traditional Chinese value.
    #[serde(rename = "zh-TW")]
    pub zh_tw: String,
}

impl RecordFields {
    /// Creates a field set.
    pub fn new(key: impl Into<String>, en: impl Into<String>, zh_tw: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            en: en.into(),
            zh_tw: zh_tw.into(),
        }
    }

    /// Returns the value for a locale.
    pub fn value(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::ZhTw => &self.zh_tw,
        }
    }
}

/// A full-replace update of an existing remote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordUpdate {
    /// Remote identifier of the record to update.
    pub id: String,
    /// New field values.
    pub fields: RecordFields,
}

/// One page of a record listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordPage {
    /// Records on this page.
    #[serde(default)]
    pub records: Vec<RemoteRecord>,
    /// Opaque cursor for the next page; `None` on the last page.
    #[serde(default)]
    pub offset: Option<String>,
}
