//! B+Tree index implementation for mediadex.
//!
//! This module provides an arena-backed B+Tree multimap with a chained leaf level
//! for sorted and prefix scans.

mod iter;
mod node;
mod tree;

pub use iter::BTreeIterator;
pub use node::{Node, NodeId};
pub use tree::{BTreeIndex, DEFAULT_ORDER, MIN_ORDER};
