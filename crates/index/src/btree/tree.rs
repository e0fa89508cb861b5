//! B+Tree implementation.

use super::iter::BTreeIterator;
use super::node::{Node, NodeId};
use crate::stats::IndexStats;
use crate::traits::{Index, IndexError};
use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use mediadex_core::RecordId;

/// Default order (maximum keys per node) for the B+Tree.
pub const DEFAULT_ORDER: usize = 4;

/// Smallest order the tree accepts.
pub const MIN_ORDER: usize = 3;

/// An ordered multimap from keys to value lists, stored as a B+Tree.
///
/// Leaves hold the keys and their values and are chained in key order, so
/// full scans and prefix scans walk the chain instead of re-descending. A node
/// may hold at most `order` keys; inserting past that splits it. Deletion only
/// drops emptied key slots and never merges nodes.
#[derive(Debug)]
pub struct BTreeIndex<K, V = RecordId> {
    /// Arena of all nodes.
    arena: Vec<Node<K, V>>,
    /// Root node ID.
    root: NodeId,
    /// Leftmost leaf, the head of the leaf chain.
    first_leaf: NodeId,
    /// Maximum number of keys per node.
    order: usize,
    /// Statistics for this index.
    stats: IndexStats,
}

impl<K: Clone + Ord, V: Clone> BTreeIndex<K, V> {
    /// Creates a new B+Tree with the given order.
    ///
    /// Fails with `IndexError::InvalidOrder` if `order` is below `MIN_ORDER`.
    pub fn new(order: usize) -> Result<Self, IndexError> {
        if order < MIN_ORDER {
            return Err(IndexError::InvalidOrder { order });
        }
        Ok(Self::with_valid_order(order))
    }

    /// Creates a new B+Tree with `DEFAULT_ORDER`.
    pub fn with_default_order() -> Self {
        Self::with_valid_order(DEFAULT_ORDER)
    }

    /// Builds an empty tree; `order` must already be at least `MIN_ORDER`.
    fn with_valid_order(order: usize) -> Self {
        let mut arena = Vec::new();
        let root = Self::alloc_node(&mut arena, Node::new_leaf());

        Self {
            arena,
            root,
            first_leaf: root,
            order,
            stats: IndexStats::new(),
        }
    }

    /// Returns the maximum number of keys per node.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the statistics for this index.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Returns the number of stored values across all keys.
    pub fn len(&self) -> usize {
        self.stats.total_values()
    }

    /// Returns true if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.scan_all().count()
    }

    /// Allocates a new node in the arena and returns its ID.
    fn alloc_node(arena: &mut Vec<Node<K, V>>, node: Node<K, V>) -> NodeId {
        let id = arena.len();
        arena.push(node);
        id
    }

    /// Finds the leaf node whose key range covers `key`.
    fn find_leaf(&self, key: &K) -> NodeId {
        let mut current = self.root;

        loop {
            let node = &self.arena[current];
            if node.is_leaf {
                return current;
            }

            let pos = Self::find_child_position(node, key);
            current = node.children[pos];
        }
    }

    /// Finds the child to descend into for an internal node.
    ///
    /// Child `i` holds keys below separator `i`, so the target is the first
    /// separator strictly greater than `key`. A key equal to a separator lives
    /// in the right-hand child, where the split that created it put it.
    #[inline]
    fn find_child_position(node: &Node<K, V>, key: &K) -> usize {
        let pos = node.keys.partition_point(|k| k <= key);
        pos.min(node.children.len().saturating_sub(1))
    }

    /// Inserts a value under `key`, splitting nodes as needed.
    pub fn insert(&mut self, key: K, value: V) {
        let leaf_id = self.find_leaf(&key);

        let pos = self.arena[leaf_id].find_key_position(&key);
        self.arena[leaf_id].insert_at(pos, key, value);
        self.stats.add_values(1);

        if self.arena[leaf_id].key_count() > self.order {
            self.split_leaf(leaf_id);
        }
    }

    /// Splits an overfull leaf, moving its upper half into a new right sibling.
    fn split_leaf(&mut self, leaf_id: NodeId) {
        let mid = self.arena[leaf_id].key_count() / 2;

        let mut new_leaf = Node::new_leaf();
        new_leaf.keys = self.arena[leaf_id].keys.split_off(mid);
        new_leaf.values = self.arena[leaf_id].values.split_off(mid);
        new_leaf.next = self.arena[leaf_id].next;
        new_leaf.parent = self.arena[leaf_id].parent;

        let promote_key = new_leaf.keys[0].clone();
        let new_leaf_id = Self::alloc_node(&mut self.arena, new_leaf);
        self.arena[leaf_id].next = Some(new_leaf_id);
        self.stats.record_split();

        self.insert_into_parent(leaf_id, promote_key, new_leaf_id);
    }

    /// Inserts a separator and right child next to `left_id` in its parent.
    fn insert_into_parent(&mut self, left_id: NodeId, key: K, right_id: NodeId) {
        match self.arena[left_id].parent {
            None => {
                let mut new_root = Node::new_internal();
                new_root.children.push(left_id);
                new_root.children.push(right_id);
                new_root.keys.push(key);

                let new_root_id = Self::alloc_node(&mut self.arena, new_root);
                self.arena[left_id].parent = Some(new_root_id);
                self.arena[right_id].parent = Some(new_root_id);
                self.root = new_root_id;
            }
            Some(parent_id) => {
                let pos = Self::find_child_position(&self.arena[parent_id], &key);
                self.arena[parent_id].keys.insert(pos, key);
                self.arena[parent_id].children.insert(pos + 1, right_id);
                self.arena[right_id].parent = Some(parent_id);

                if self.arena[parent_id].key_count() > self.order {
                    self.split_internal(parent_id);
                }
            }
        }
    }

    /// Splits an overfull internal node, promoting its middle key.
    fn split_internal(&mut self, node_id: NodeId) {
        let mid = self.arena[node_id].key_count() / 2;

        let mut new_node = Node::new_internal();
        new_node.keys = self.arena[node_id].keys.split_off(mid + 1);
        new_node.children = self.arena[node_id].children.split_off(mid + 1);
        new_node.parent = self.arena[node_id].parent;

        // The middle key moves up; internal nodes keep no copy of it.
        let promote_key = match self.arena[node_id].keys.pop() {
            Some(key) => key,
            None => return,
        };

        let new_node_id = Self::alloc_node(&mut self.arena, new_node);

        let moved_children: Vec<NodeId> = self.arena[new_node_id].children.clone();
        for child_id in moved_children {
            self.arena[child_id].parent = Some(new_node_id);
        }
        self.stats.record_split();

        self.insert_into_parent(node_id, promote_key, new_node_id);
    }

    /// Removes every value under `key` for which `matches` returns true.
    ///
    /// The key slot is dropped once it has no values left. Underflowed nodes
    /// are left as they are. Returns whether anything was removed.
    pub fn delete<F>(&mut self, key: &K, matches: F) -> bool
    where
        F: FnMut(&V) -> bool,
    {
        let leaf_id = self.find_leaf(key);

        match self.arena[leaf_id].find_key(key) {
            Some(pos) => {
                let removed = self.arena[leaf_id].remove_matching(pos, matches);
                self.stats.remove_values(removed);
                removed > 0
            }
            None => false,
        }
    }

    /// Returns a copy of the values stored under `key`, or an empty vector.
    pub fn search_exact(&self, key: &K) -> Vec<V> {
        let leaf = &self.arena[self.find_leaf(key)];

        match leaf.find_key(key) {
            Some(pos) => leaf.values[pos].clone(),
            None => Vec::new(),
        }
    }

    /// Collects the values of consecutive keys starting at the first key `>= from`.
    ///
    /// The scan stops at the first key for which `still_matches` is false, so
    /// the predicate must hold for a contiguous run of keys in sorted order,
    /// as "starts with `from`" does.
    pub fn search_prefix<P>(&self, from: &K, mut still_matches: P) -> Vec<V>
    where
        P: FnMut(&K) -> bool,
    {
        let leaf_id = self.find_leaf(from);
        let pos = self.arena[leaf_id].find_key_position(from);

        let mut result = Vec::new();
        for (key, values) in BTreeIterator::new_at(&self.arena, Some(leaf_id), pos) {
            if !still_matches(key) {
                break;
            }
            result.extend_from_slice(values);
        }
        result
    }

    /// Returns a fresh iterator over all `(key, values)` slots in ascending key order.
    pub fn scan_all(&self) -> BTreeIterator<'_, K, V> {
        BTreeIterator::new(&self.arena, Some(self.first_leaf))
    }

    /// Checks whether `key` has at least one value.
    pub fn contains_key(&self, key: &K) -> bool {
        let leaf_id = self.find_leaf(key);
        self.arena[leaf_id].find_key(key).is_some()
    }

    /// Returns the smallest key and its values.
    pub fn min(&self) -> Option<(&K, &[V])> {
        self.scan_all().next()
    }

    /// Returns the largest key and its values.
    pub fn max(&self) -> Option<(&K, &[V])> {
        self.scan_all().last()
    }

    /// Removes everything and starts over with a single empty leaf.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = Self::alloc_node(&mut self.arena, Node::new_leaf());
        self.first_leaf = self.root;
        self.stats.clear();
    }

    /// Returns the number of levels, counting the leaf level.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while !self.arena[current].is_leaf {
            current = self.arena[current].children[0];
            height += 1;
        }
        height
    }

    /// Returns the keys of every node, grouped by depth, left to right.
    pub fn levels(&self) -> Vec<Vec<Vec<K>>> {
        let mut levels = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(self.root);

        while !queue.is_empty() {
            let mut level = Vec::with_capacity(queue.len());
            for _ in 0..queue.len() {
                let Some(node_id) = queue.pop_front() else {
                    break;
                };
                let node = &self.arena[node_id];
                level.push(node.keys.clone());
                queue.extend(node.children.iter().copied());
            }
            levels.push(level);
        }

        levels
    }

    /// Renders `levels()` as text, one line per depth.
    pub fn dump_levels(&self) -> String
    where
        K: Debug,
    {
        let mut out = String::new();
        for (depth, level) in self.levels().iter().enumerate() {
            out.push_str(&format!("Level {}:", depth));
            for keys in level {
                out.push_str(&format!(" {:?}", keys));
            }
            out.push('\n');
        }
        out
    }

    /// Checks the structural invariants of the tree.
    ///
    /// Verifies per-node key ordering and capacity, separator bounds, uniform
    /// leaf depth, and that the leaf chain visits exactly the leaves of the
    /// tree in order. Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String>
    where
        K: Debug,
    {
        let mut leaves = Vec::new();
        let mut leaf_depth = None;
        self.validate_node(self.root, None, None, 0, &mut leaf_depth, &mut leaves)?;

        let mut chain = Vec::new();
        let mut current = Some(self.first_leaf);
        while let Some(id) = current {
            if chain.len() > leaves.len() {
                return Err(String::from("leaf chain is longer than the leaf set"));
            }
            chain.push(id);
            current = self.arena[id].next;
        }
        if chain != leaves {
            return Err(format!("leaf chain {:?} does not match tree leaves {:?}", chain, leaves));
        }

        Ok(())
    }

    fn validate_node(
        &self,
        node_id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        leaves: &mut Vec<NodeId>,
    ) -> Result<(), String>
    where
        K: Debug,
    {
        let node = &self.arena[node_id];

        if node.key_count() > self.order {
            return Err(format!("node {} holds {} keys, order is {}", node_id, node.key_count(), self.order));
        }
        if node.keys.windows(2).any(|w| w[0] >= w[1]) {
            return Err(format!("node {} keys not strictly increasing: {:?}", node_id, node.keys));
        }
        for key in &node.keys {
            if lower.is_some_and(|l| key < l) || upper.is_some_and(|u| key >= u) {
                return Err(format!("node {} key {:?} outside separator bounds", node_id, key));
            }
        }

        if node.is_leaf {
            if node.values.len() != node.keys.len() || node.values.iter().any(|v| v.is_empty()) {
                return Err(format!("leaf {} has mismatched or empty value slots", node_id));
            }
            match *leaf_depth {
                Some(d) if d != depth => {
                    return Err(format!("leaf {} at depth {}, expected {}", node_id, depth, d));
                }
                _ => *leaf_depth = Some(depth),
            }
            leaves.push(node_id);
            return Ok(());
        }

        if node.children.len() != node.keys.len() + 1 {
            return Err(format!(
                "internal node {} has {} keys and {} children",
                node_id,
                node.keys.len(),
                node.children.len()
            ));
        }
        for (i, &child) in node.children.iter().enumerate() {
            if self.arena[child].parent != Some(node_id) {
                return Err(format!("node {} has a stale parent link", child));
            }
            let child_lower = if i == 0 { lower } else { Some(&node.keys[i - 1]) };
            let child_upper = if i == node.keys.len() { upper } else { Some(&node.keys[i]) };
            self.validate_node(child, child_lower, child_upper, depth + 1, leaf_depth, leaves)?;
        }
        Ok(())
    }
}

impl<K: Clone + Ord, V: Clone> Default for BTreeIndex<K, V> {
    fn default() -> Self {
        Self::with_default_order()
    }
}

impl Index<String> for BTreeIndex<String, RecordId> {
    fn add(&mut self, key: String, id: RecordId) {
        self.insert(key, id);
    }

    fn remove(&mut self, key: &String, id: RecordId) -> bool {
        self.delete(key, |&v| v == id)
    }

    fn get(&self, key: &String) -> Vec<RecordId> {
        self.search_exact(key)
    }

    fn get_all(&self) -> Vec<RecordId> {
        self.scan_all().flat_map(|(_, ids)| ids.iter().copied()).collect()
    }

    fn len(&self) -> usize {
        BTreeIndex::len(self)
    }

    fn clear(&mut self) {
        BTreeIndex::clear(self);
    }
}
