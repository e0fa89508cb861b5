//! Property-based tests for mediadex-index using proptest.

use std::collections::{BTreeMap, BTreeSet};

use mediadex_index::{BTreeIndex, HashIndex};
use proptest::prelude::*;

fn short_word() -> impl Strategy<Value = String> {
    "[a-d]{0,4}"
}

proptest! {
    /// Scanning yields strictly ascending keys and exactly the inserted values.
    #[test]
    fn btree_scan_sorted_and_complete(
        keys in prop::collection::btree_set(-5000i64..5000, 1..300),
        order in 3usize..12,
    ) {
        let keys: Vec<i64> = keys.into_iter().collect();
        let mut tree = BTreeIndex::new(order).unwrap();
        // Insert in a scrambled but deterministic order.
        for (i, &key) in keys.iter().enumerate().rev() {
            tree.insert(key, i as u64);
        }

        let scanned: Vec<i64> = tree.scan_all().map(|(k, _)| *k).collect();
        prop_assert!(scanned.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(&scanned, &keys);

        let mut values: Vec<u64> = tree.scan_all().flat_map(|(_, v)| v.iter().copied()).collect();
        values.sort();
        prop_assert_eq!(values, (0..keys.len() as u64).collect::<Vec<_>>());
    }

    /// Every insert leaves the tree within capacity and balanced.
    #[test]
    fn btree_splits_restore_capacity(
        keys in prop::collection::vec(0i64..2000, 1..300),
        order in 3usize..8,
    ) {
        let mut tree = BTreeIndex::new(order).unwrap();
        for (i, &key) in keys.iter().enumerate() {
            tree.insert(key, i as u64);
            prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
            let widest = tree.levels().iter().flatten().map(|n| n.len()).max().unwrap_or(0);
            prop_assert!(widest <= order);
        }
    }

    /// A value inserted under a key is found by an exact search.
    #[test]
    fn btree_insert_then_search(keys in prop::collection::vec(0i64..500, 1..300)) {
        let mut tree = BTreeIndex::new(4).unwrap();
        for (i, &key) in keys.iter().enumerate() {
            tree.insert(key, i as u64);
        }
        for (i, &key) in keys.iter().enumerate() {
            prop_assert!(tree.search_exact(&key).contains(&(i as u64)));
        }
        prop_assert_eq!(tree.len(), keys.len());
    }

    /// Deleting a value hides it; deleting a key's last value drops the key.
    #[test]
    fn btree_delete_removes_value(
        keys in prop::collection::vec(0i64..100, 1..200),
        deletions in prop::collection::vec(0usize..200, 1..100),
    ) {
        let mut tree = BTreeIndex::new(3).unwrap();
        let mut model: BTreeMap<i64, Vec<u64>> = BTreeMap::new();
        for (i, &key) in keys.iter().enumerate() {
            tree.insert(key, i as u64);
            model.entry(key).or_default().push(i as u64);
        }

        for &d in &deletions {
            if d >= keys.len() {
                continue;
            }
            let key = keys[d];
            let value = d as u64;
            let expected = model.get(&key).is_some_and(|v| v.contains(&value));
            prop_assert_eq!(tree.delete(&key, |&v| v == value), expected);
            if let Some(values) = model.get_mut(&key) {
                values.retain(|&v| v != value);
                if values.is_empty() {
                    model.remove(&key);
                }
            }
            prop_assert!(!tree.search_exact(&key).contains(&value));
        }

        let scanned: Vec<i64> = tree.scan_all().map(|(k, _)| *k).collect();
        let expected: Vec<i64> = model.keys().copied().collect();
        prop_assert_eq!(scanned, expected);
        prop_assert!(tree.validate().is_ok());
    }

    /// Prefix search on the B+Tree and the hash index agree on the id set.
    #[test]
    fn prefix_search_agrees_across_indexes(
        words in prop::collection::vec(short_word(), 1..120),
        prefix in "[a-d]{0,2}",
    ) {
        let mut tree: BTreeIndex<String, u64> = BTreeIndex::new(3).unwrap();
        let mut hash = HashIndex::new();
        for (i, word) in words.iter().enumerate() {
            tree.insert(word.clone(), i as u64);
            hash.insert(word, i as u64);
        }

        let from_tree: BTreeSet<u64> = tree
            .search_prefix(&prefix, |k| k.starts_with(prefix.as_str()))
            .into_iter()
            .collect();
        let from_hash: BTreeSet<u64> = hash.search_prefix(&prefix).into_iter().collect();
        let expected: BTreeSet<u64> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.starts_with(prefix.as_str()))
            .map(|(i, _)| i as u64)
            .collect();

        prop_assert_eq!(&from_tree, &expected);
        prop_assert_eq!(&from_hash, &expected);
    }

    /// Ordered listing from the hash index matches the leaf-chain order of the B+Tree.
    #[test]
    fn ordered_listing_agrees_across_indexes(words in prop::collection::vec(short_word(), 0..80)) {
        let mut tree: BTreeIndex<String, u64> = BTreeIndex::new(4).unwrap();
        let mut hash = HashIndex::new();
        for (i, word) in words.iter().enumerate() {
            tree.insert(word.clone(), i as u64);
            hash.insert(word, i as u64);
        }

        let from_tree: Vec<u64> = tree.scan_all().flat_map(|(_, ids)| ids.iter().copied()).collect();
        prop_assert_eq!(from_tree, hash.list_all_ordered());
    }

    /// Clearing an index makes it empty and reusable.
    #[test]
    fn btree_clear_makes_empty(keys in prop::collection::vec(0i64..1000, 1..100)) {
        let mut tree = BTreeIndex::new(5).unwrap();
        for &key in &keys {
            tree.insert(key, key as u64);
        }

        tree.clear();

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.scan_all().count(), 0);
        prop_assert!(tree.min().is_none());
        prop_assert_eq!(tree.height(), 1);
    }

    /// Stats track the number of stored values through inserts and deletes.
    #[test]
    fn btree_stats_consistent(keys in prop::collection::vec(0i64..50, 1..100)) {
        let mut tree = BTreeIndex::new(4).unwrap();
        for &key in &keys {
            tree.insert(key, key as u64);
        }
        for &key in keys.iter().step_by(3) {
            tree.delete(&key, |_| true);
        }

        let counted: usize = tree.scan_all().map(|(_, v)| v.len()).sum();
        prop_assert_eq!(tree.len(), counted);
    }
}
