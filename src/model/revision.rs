//! Canonical revision-history types.

use serde::{Deserialize, Serialize};

/// One normalized revision record, independent of source representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionEntry {
    /// Version label, e.g. `"1.0"`
    pub version: Option<String>,

    /// Date, ISO `YYYY-MM-DD` when parseable, otherwise as written
    pub date: Option<String>,

    /// Author, when the source records one
    pub author: Option<String>,

    /// Change description
    pub description: String,
}

impl RevisionEntry {
    /// Create an entry carrying only a description.
    ///
    /// Used for free-text lines that do not match the revision pattern;
    /// the text is preserved verbatim rather than discarded.
    pub fn description_only(text: impl Into<String>) -> Self {
        Self {
            description: text.into(),
            ..Default::default()
        }
    }

    /// Check whether any structured field (version, date, author) is present.
    pub fn is_structured(&self) -> bool {
        self.version.is_some() || self.date.is_some() || self.author.is_some()
    }
}

/// Ordered sequence of revision entries, in source order.
///
/// The normalizer never re-sorts: whichever chronological direction the
/// source uses is preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevisionHistory {
    /// Entries in source order
    pub entries: Vec<RevisionEntry>,
}

impl RevisionHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    pub fn push(&mut self, entry: RevisionEntry) {
        self.entries.push(entry);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the history has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
