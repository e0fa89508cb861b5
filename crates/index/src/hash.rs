//! Hash index implementation for mediadex.
//!
//! This module provides a hash-based index over one normalized text field.

use crate::stats::IndexStats;
use crate::traits::Index;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use mediadex_core::{normalize, RecordId};

/// A hash-based text index with chained buckets.
///
/// Every key is normalized (trimmed, case-folded) on the way in and on lookup.
/// Exact lookups are O(1); prefix lookups scan every bucket key, since a hash
/// table has no key order to exploit.
#[derive(Debug, Default)]
pub struct HashIndex {
    /// The underlying map from normalized keys to identifiers in insertion order.
    map: HashMap<String, Vec<RecordId>>,
    /// Statistics for this index.
    stats: IndexStats,
}

impl HashIndex {
    /// Creates a new hash index.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            stats: IndexStats::new(),
        }
    }

    /// Returns the statistics for this index.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Returns the number of distinct normalized keys.
    pub fn bucket_count(&self) -> usize {
        self.map.len()
    }

    /// Appends `id` to the bucket of the normalized `raw_key`.
    pub fn insert(&mut self, raw_key: &str, id: RecordId) {
        self.map.entry(normalize(raw_key)).or_default().push(id);
        self.stats.add_values(1);
    }

    /// Removes every occurrence of `id` from the bucket of `raw_key`.
    ///
    /// The bucket is dropped once empty. Returns whether anything was removed.
    pub fn delete(&mut self, raw_key: &str, id: RecordId) -> bool {
        let key = normalize(raw_key);
        let Some(ids) = self.map.get_mut(&key) else {
            return false;
        };

        let original_len = ids.len();
        ids.retain(|&x| x != id);
        let removed = original_len - ids.len();
        if ids.is_empty() {
            self.map.remove(&key);
        }
        self.stats.remove_values(removed);
        removed > 0
    }

    /// Returns the identifiers stored under the normalized `raw_key`.
    pub fn search_exact(&self, raw_key: &str) -> Vec<RecordId> {
        self.map.get(&normalize(raw_key)).cloned().unwrap_or_default()
    }

    /// Returns the identifiers of every key starting with the normalized prefix.
    ///
    /// Runs in time proportional to the number of distinct keys.
    pub fn search_prefix(&self, raw_prefix: &str) -> Vec<RecordId> {
        let prefix = normalize(raw_prefix);
        self.map
            .iter()
            .filter(|(key, _)| key.starts_with(prefix.as_str()))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }

    /// Returns all identifiers, ordered by their key lexicographically.
    pub fn list_all_ordered(&self) -> Vec<RecordId> {
        let mut keys: Vec<&String> = self.map.keys().collect();
        keys.sort();
        keys.into_iter()
            .flat_map(|key| self.map[key].iter().copied())
            .collect()
    }

    /// Checks whether the normalized `raw_key` has a bucket.
    pub fn contains(&self, raw_key: &str) -> bool {
        self.map.contains_key(&normalize(raw_key))
    }

    /// Returns the number of stored identifiers.
    pub fn len(&self) -> usize {
        self.stats.total_values()
    }

    /// Returns true if no identifiers are stored.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every bucket.
    pub fn clear(&mut self) {
        self.map.clear();
        self.stats.clear();
    }
}

impl Index<String> for HashIndex {
    fn add(&mut self, key: String, id: RecordId) {
        self.insert(&key, id);
    }

    fn remove(&mut self, key: &String, id: RecordId) -> bool {
        self.delete(key, id)
    }

    fn get(&self, key: &String) -> Vec<RecordId> {
        self.search_exact(key)
    }

    fn get_all(&self) -> Vec<RecordId> {
        self.list_all_ordered()
    }

    fn len(&self) -> usize {
        HashIndex::len(self)
    }

    fn clear(&mut self) {
        HashIndex::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_hash_index_insert_normalizes() {
        let mut index = HashIndex::new();

        index.insert("  Apple ", 1);
        index.insert("APPLE", 2);
        index.insert("Banana", 3);

        assert_eq!(index.search_exact("apple"), vec![1, 2]);
        assert_eq!(index.search_exact(" aPPle"), vec![1, 2]);
        assert_eq!(index.search_exact("banana"), vec![3]);
        assert_eq!(index.search_exact("cherry"), Vec::<RecordId>::new());
        assert_eq!(index.bucket_count(), 2);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_hash_index_delete() {
        let mut index = HashIndex::new();

        index.insert("Apple", 1);
        index.insert("apple", 2);

        assert!(index.delete(" APPLE ", 1));
        assert_eq!(index.search_exact("apple"), vec![2]);

        // Wrong id and missing key are both no-ops.
        assert!(!index.delete("apple", 99));
        assert!(!index.delete("durian", 2));

        assert!(index.delete("apple", 2));
        assert!(!index.contains("apple"));
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_hash_index_delete_all_occurrences() {
        let mut index = HashIndex::new();
        index.insert("x", 5);
        index.insert("x", 6);
        index.insert("x", 5);

        assert!(index.delete("x", 5));
        assert_eq!(index.search_exact("x"), vec![6]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_hash_index_search_prefix() {
        let mut index = HashIndex::new();
        index.insert("Apple", 1);
        index.insert("Apricot", 2);
        index.insert("Banana", 3);
        index.insert("ap", 4);

        let mut hits = index.search_prefix(" AP");
        hits.sort();
        assert_eq!(hits, vec![1, 2, 4]);

        assert!(index.search_prefix("z").is_empty());

        let mut all = index.search_prefix("");
        all.sort();
        assert_eq!(all, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_hash_index_list_all_ordered() {
        let mut index = HashIndex::new();
        index.insert("Cherry", 1);
        index.insert("apple", 2);
        index.insert("Banana", 3);
        index.insert("Apple", 4);

        assert_eq!(index.list_all_ordered(), vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_hash_index_clear_reuse() {
        let mut index = HashIndex::new();
        index.insert("a", 1);
        index.insert("b", 2);
        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);

        index.insert("a", 10);
        assert_eq!(index.search_exact("a"), vec![10]);
    }

    #[test]
    fn test_hash_index_trait() {
        let mut index = HashIndex::new();
        Index::add(&mut index, String::from("Title"), 1);

        Index::add(&mut index, String::from("alpha"), 2);

        assert_eq!(Index::get(&index, &String::from("title")), vec![1]);
        assert_eq!(Index::get_all(&index), vec![2, 1]);
        assert!(Index::remove(&mut index, &String::from("title"), 1));
        assert_eq!(Index::len(&index), 1);
        Index::clear(&mut index);
        assert!(index.is_empty());
    }

    #[test]
    fn test_hash_index_large_scale() {
        let mut index = HashIndex::new();
        for i in 0..1000u64 {
            index.insert(&alloc::format!("key{}", i), i);
        }
        assert_eq!(index.len(), 1000);

        for i in (0..1000u64).step_by(2) {
            index.delete(&alloc::format!("KEY{}", i), i);
        }
        assert_eq!(index.len(), 500);
        assert_eq!(index.bucket_count(), 500);
    }
}
