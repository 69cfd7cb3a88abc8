//! Domain types shared by the scanner, reconciler and remote client.
//!
//! File names are base names only; they never carry path separators.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Base name of a file, unique within one local scan or one remote listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileName(pub String);

impl FileName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FileName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FileName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A regular file found in the local folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFileEntry {
    pub name: FileName,
    pub modified: DateTime<Utc>,
}

/// A child of the remote folder as reported by the listing.
///
/// `metadata` is the raw resource object; nothing in the sync path reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFileEntry {
    pub name: FileName,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl RemoteFileEntry {
    /// Entry with no metadata, used where only the name matters.
    pub fn named(name: impl Into<FileName>) -> Self {
        Self {
            name: name.into(),
            metadata: serde_json::Value::Null,
        }
    }
}

/// Result of one local scan, keyed (and therefore ordered) by file name.
pub type LocalFiles = BTreeMap<FileName, LocalFileEntry>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_display() {
        assert_eq!(FileName::from("a.txt").to_string(), "a.txt");
        assert_eq!(FileName::from(String::from("b.txt")).as_str(), "b.txt");
    }

    #[test]
    fn file_names_order_lexically() {
        let mut names = vec![FileName::from("b"), FileName::from("a"), FileName::from("c")];
        names.sort();
        assert_eq!(names, vec!["a".into(), "b".into(), "c".into()]);
    }

    #[test]
    fn remote_entry_serializes_name_transparently() {
        let entry = RemoteFileEntry {
            name: FileName::from("x.txt"),
            metadata: serde_json::json!({"type": "file", "size": 3}),
        };
        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(value["name"], "x.txt");
        assert_eq!(value["metadata"]["size"], 3);
    }

    #[test]
    fn named_entry_has_null_metadata() {
        let entry = RemoteFileEntry::named("x.txt");
        assert_eq!(entry.name.as_str(), "x.txt");
        assert!(entry.metadata.is_null());
    }
}
