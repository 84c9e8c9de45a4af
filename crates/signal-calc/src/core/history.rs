//! Bounded calculation history, most recent first

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// One completed evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The committed tokens joined by single spaces
    pub expression: String,
    /// The formatted result
    pub result: String,
}

impl HistoryEntry {
    /// Creates a new history entry
    #[must_use]
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.expression, self.result)
    }
}

/// Calculator history
///
/// Holds at most `limit` entries. New entries go to the front and the
/// oldest entry falls off the back once the limit is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    #[serde(skip)]
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }
}

impl History {
    /// Entries kept when no limit is configured
    pub const DEFAULT_LIMIT: usize = 5;

    /// Creates a history keeping at most `limit` entries (at least one)
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit + 1),
            limit,
        }
    }

    /// Records a completed evaluation as the newest entry
    pub fn record(&mut self, expression: impl Into<String>, result: impl Into<String>) {
        self.entries.push_front(HistoryEntry::new(expression, result));
        self.entries.truncate(self.limit);
    }

    /// Drops every entry; the limit is kept
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries held
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries held
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Iterates newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The newest entry
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Copies the entries out, newest first
    #[must_use]
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Numbered lines as shown in the history panel
    #[must_use]
    pub fn export_formatted(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("{}. {entry}", i + 1));
        }
        out
    }
}
