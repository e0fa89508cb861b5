//! B+Tree leaf-chain iterator.

use super::node::{Node, NodeId};

/// Iterator over the key slots of a B+Tree in ascending key order.
///
/// Walks the leaf chain starting from a given leaf, yielding each key with its
/// values. Leaves emptied by deletion are stepped over.
pub struct BTreeIterator<'a, K, V> {
    /// Reference to the arena of nodes.
    arena: &'a [Node<K, V>],
    /// Current leaf.
    current_node: Option<NodeId>,
    /// Current key position within the leaf.
    current_pos: usize,
}

impl<'a, K, V> BTreeIterator<'a, K, V> {
    /// Creates an iterator starting at the first key of `start_node`.
    pub fn new(arena: &'a [Node<K, V>], start_node: Option<NodeId>) -> Self {
        Self::new_at(arena, start_node, 0)
    }

    /// Creates an iterator starting at a specific position of a leaf.
    pub fn new_at(arena: &'a [Node<K, V>], start_node: Option<NodeId>, pos: usize) -> Self {
        Self {
            arena,
            current_node: start_node,
            current_pos: pos,
        }
    }
}

impl<'a, K, V> Iterator for BTreeIterator<'a, K, V> {
    type Item = (&'a K, &'a [V]);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node_id = self.current_node?;
            let node = &self.arena[node_id];

            if self.current_pos >= node.keys.len() {
                self.current_node = node.next;
                self.current_pos = 0;
                continue;
            }

            let pos = self.current_pos;
            self.current_pos += 1;
            return Some((&node.keys[pos], node.values[pos].as_slice()));
        }
    }
}
