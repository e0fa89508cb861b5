//! B+Tree node definitions.

use alloc::vec::Vec;

/// Node identifier in the B+Tree arena.
pub type NodeId = usize;

/// A node in the B+Tree.
#[derive(Clone, Debug)]
pub struct Node<K, V> {
    /// Keys stored in this node, strictly increasing.
    pub keys: Vec<K>,
    /// For leaf nodes: the values associated with each key.
    /// For internal nodes: empty.
    pub values: Vec<Vec<V>>,
    /// For internal nodes: child node IDs, always `keys.len() + 1` of them.
    /// For leaf nodes: empty.
    pub children: Vec<NodeId>,
    /// For leaf nodes: the next leaf in key order.
    pub next: Option<NodeId>,
    /// Whether this is a leaf node.
    pub is_leaf: bool,
    /// Parent node ID.
    pub parent: Option<NodeId>,
}

impl<K: Ord, V> Node<K, V> {
    /// Creates a new leaf node.
    pub fn new_leaf() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            children: Vec::new(),
            next: None,
            is_leaf: true,
            parent: None,
        }
    }

    /// Creates a new internal node.
    pub fn new_internal() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            children: Vec::new(),
            next: None,
            is_leaf: false,
            parent: None,
        }
    }

    /// Returns the number of keys in this node.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this node holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Finds the first position whose key is not less than `key`.
    pub fn find_key_position(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// Finds the exact position of a key, or None if not found.
    pub fn find_key(&self, key: &K) -> Option<usize> {
        let pos = self.find_key_position(key);
        if pos < self.keys.len() && &self.keys[pos] == key {
            Some(pos)
        } else {
            None
        }
    }

    /// Inserts a key-value pair at the given position in a leaf node.
    /// A key equal to the one already at `pos` merges into that slot.
    /// Returns true if a new key slot was created.
    pub fn insert_at(&mut self, pos: usize, key: K, value: V) -> bool {
        debug_assert!(self.is_leaf);
        if pos < self.keys.len() && self.keys[pos] == key {
            self.values[pos].push(value);
            false
        } else {
            self.keys.insert(pos, key);
            self.values.insert(pos, alloc::vec![value]);
            true
        }
    }

    /// Removes every value matching `matches` from the slot at `pos`.
    /// Drops the key slot when no values remain.
    /// Returns the number of values removed.
    pub fn remove_matching<F>(&mut self, pos: usize, mut matches: F) -> usize
    where
        F: FnMut(&V) -> bool,
    {
        debug_assert!(self.is_leaf);
        let values = &mut self.values[pos];
        let original_len = values.len();
        values.retain(|v| !matches(v));
        let removed = original_len - values.len();
        if values.is_empty() {
            self.keys.remove(pos);
            self.values.remove(pos);
        }
        removed
    }
}
