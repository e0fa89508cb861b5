//! Index statistics for mediadex.
//!
//! This module provides counters tracked by every index.

/// Statistics for an index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Total number of values stored across all keys.
    total_values: usize,
    /// Number of node splits performed (B+Tree only).
    splits: usize,
}

impl IndexStats {
    /// Creates a new empty stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored values.
    pub fn total_values(&self) -> usize {
        self.total_values
    }

    /// Returns the number of splits since the last clear.
    pub fn splits(&self) -> usize {
        self.splits
    }

    /// Increments the value count by the given amount.
    pub fn add_values(&mut self, count: usize) {
        self.total_values += count;
    }

    /// Decrements the value count by the given amount.
    pub fn remove_values(&mut self, count: usize) {
        self.total_values = self.total_values.saturating_sub(count);
    }

    /// Records one node split.
    pub fn record_split(&mut self) {
        self.splits += 1;
    }

    /// Resets all counters to zero.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
