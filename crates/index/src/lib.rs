//! mediadex Index - Index implementations for the mediadex catalog store.
//!
//! This crate provides the two index structures a repository keeps over its records:
//!
//! - `BTreeIndex`: Ordered multimap on a B+Tree, with exact and prefix lookups over a chained leaf level
//! - `HashIndex`: Exact lookups over one normalized text field, prefix lookups by full key scan
//!
//! # Example
//!
//! ```rust
//! use mediadex_index::{BTreeIndex, HashIndex};
//!
//! // Create a B+Tree index
//! let mut btree: BTreeIndex<String, u64> = BTreeIndex::new(4).unwrap();
//! btree.insert("apple".to_string(), 1);
//! btree.insert("apricot".to_string(), 2);
//! btree.insert("banana".to_string(), 3);
//!
//! // Point query
//! assert_eq!(btree.search_exact(&"apple".to_string()), vec![1]);
//!
//! // Prefix query walks the leaf chain
//! let prefix = "ap".to_string();
//! assert_eq!(btree.search_prefix(&prefix, |k| k.starts_with("ap")), vec![1, 2]);
//!
//! // Create a Hash index
//! let mut hash = HashIndex::new();
//! hash.insert("  Apple ", 1);
//! assert_eq!(hash.search_exact("APPLE"), vec![1]);
//! ```

#![no_std]

extern crate alloc;

pub mod btree;
pub mod hash;
pub mod stats;
pub mod traits;

pub use btree::{BTreeIndex, BTreeIterator, DEFAULT_ORDER, MIN_ORDER};
pub use hash::HashIndex;
pub use stats::IndexStats;
pub use traits::{Index, IndexError};
