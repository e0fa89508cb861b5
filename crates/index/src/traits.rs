//! Index trait definitions for mediadex.
//!
//! This module defines the `Index` trait through which a repository maintains
//! and audits the text indexes it keeps over record fields.

use alloc::vec::Vec;
use mediadex_core::RecordId;

/// Operations a repository needs from every index it keeps in sync.
///
/// Keys arrive already normalized; implementations may normalize again.
pub trait Index<K> {
    /// Adds an identifier under a key.
    fn add(&mut self, key: K, id: RecordId);

    /// Removes an identifier from a key. Returns whether anything was removed.
    fn remove(&mut self, key: &K, id: RecordId) -> bool;

    /// Gets all identifiers stored under a key.
    fn get(&self, key: &K) -> Vec<RecordId>;

    /// Gets every identifier, grouped by key in ascending key order.
    fn get_all(&self) -> Vec<RecordId>;

    /// Returns the number of stored identifiers.
    fn len(&self) -> usize;

    /// Clears all entries from the index.
    fn clear(&mut self);
}

/// Error type for index operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexError {
    /// The B+Tree order is below the supported minimum.
    InvalidOrder { order: usize },
}

impl core::fmt::Display for IndexError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IndexError::InvalidOrder { order } => write!(
                f,
                "B+Tree order must be at least {}, got {}",
                crate::btree::MIN_ORDER,
                order
            ),
        }
    }
}

impl core::error::Error for IndexError {}

impl From<IndexError> for mediadex_core::Error {
    fn from(err: IndexError) -> Self {
        use alloc::string::ToString;
        mediadex_core::Error::invalid_configuration(err.to_string())
    }
}
