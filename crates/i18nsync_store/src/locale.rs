//! Supported locales.

use std::fmt;

/// A locale with its own message file and remote field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    /// English.
    En,
    /// Traditional Chinese (Taiwan).
    ZhTw,
}

impl Locale {
    /// All supported locales, in processing order.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::ZhTw];

    /// The locale code, which is also the remote field name.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhTw => "zh-TW",
        }
    }

    /// The message file name for this locale.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.code())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
