//! # Source Location

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of a single object inside a bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the object to load is chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Load exactly this key; no listing is performed
    Key(String),
    /// Load the most recently modified object under the prefix
    Latest,
}

/// Where the source object lives.
///
/// Immutable once built. The explicit key and latest mode are mutually
/// exclusive, which the `Selection` enum enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    bucket: String,
    prefix: String,
    selection: Selection,
}

impl SourceLocation {
    /// Location that loads a caller-specified key
    pub fn explicit(bucket: impl Into<String>, prefix: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            selection: Selection::Key(key.into()),
        }
    }

    /// Location that loads the latest object under `prefix`
    pub fn latest(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            selection: Selection::Latest,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The caller-specified key, if this location is not in latest mode
    pub fn explicit_key(&self) -> Option<&str> {
        match &self.selection {
            Selection::Key(key) => Some(key),
            Selection::Latest => None,
        }
    }

    pub fn is_latest(&self) -> bool {
        self.selection == Selection::Latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_location() {
        let location = SourceLocation::explicit("raw", "evictions/", "evictions/2024-01-01.json");
        assert_eq!(location.explicit_key(), Some("evictions/2024-01-01.json"));
        assert!(!location.is_latest());
    }

    #[test]
    fn test_latest_location() {
        let location = SourceLocation::latest("raw", "evictions/");
        assert_eq!(location.explicit_key(), None);
        assert!(location.is_latest());
        assert_eq!(location.bucket(), "raw");
        assert_eq!(location.prefix(), "evictions/");
    }
}
