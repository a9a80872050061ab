//! Per-emoji usage counts used to rank suggestions.
//!
//! Each accepted suggestion bumps its emoji's count by one. Counts only
//! affect ordering, never which emojis match. The table is serialized as a
//! plain `emoji -> count` map inside the settings file:
//!
//! ```toml
//! [emojiPopularity]
//! "😀" = 5
//! "😂" = 2
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Usage counter keyed by emoji.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopularityTable {
    counts: BTreeMap<String, u64>,
}

impl PopularityTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Usage count for an emoji, zero if never used.
    pub fn count(&self, emoji: &str) -> u64 {
        self.counts.get(emoji).copied().unwrap_or(0)
    }

    /// Record one accepted insertion of `emoji` and return the new count.
    pub fn record(&mut self, emoji: &str) -> u64 {
        let count = self.counts.entry(emoji.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Overwrite a count directly (imports, tests).
    pub fn set(&mut self, emoji: &str, count: u64) {
        if count == 0 {
            self.counts.remove(emoji);
        } else {
            self.counts.insert(emoji.to_string(), count);
        }
    }

    /// Forget all usage.
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Get the number of tracked emojis.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if there are no tracked emojis.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most used emojis, most used first.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut all: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(emoji, count)| (emoji.as_str(), *count))
            .collect();
        all.sort_by(|a, b| b.1.cmp(&a.1));
        all.truncate(n);
        all
    }

    /// Get usage statistics for debugging.
    pub fn stats(&self) -> PopularityStats {
        PopularityStats {
            total_entries: self.counts.len(),
            total_usage_count: self.counts.values().sum(),
            max_usage_count: self.counts.values().copied().max().unwrap_or(0),
        }
    }
}

/// Statistics about popularity data.
#[derive(Debug, PartialEq, Eq)]
pub struct PopularityStats {
    pub total_entries: usize,
    pub total_usage_count: u64,
    pub max_usage_count: u64,
}
