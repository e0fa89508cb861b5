//! mediadex Core - Core types for the mediadex catalog store.
//!
//! This crate provides the foundational types shared by the index and storage layers:
//!
//! - `Record`: A catalog entry with a store-assigned identifier
//! - `NewRecord`: The descriptive fields of a record before it is stored
//! - `Field`: The indexed text fields
//! - `normalize`: Key normalization used by every text index
//! - `Error`: Error types for repository operations
//!
//! # Example
//!
//! ```rust
//! use mediadex_core::{normalize, Field, NewRecord, Record};
//!
//! let record = Record::new(1, NewRecord::new("La Luz").artist("Juanes").year(Some(2014)));
//!
//! assert_eq!(record.id(), 1);
//! assert_eq!(Field::Artist.value_of(&record), "Juanes");
//! assert_eq!(normalize("  La Luz "), "la luz");
//! ```

#![no_std]

extern crate alloc;

mod error;
mod field;
mod record;
mod text;

pub use error::{Error, Result};
pub use field::Field;
pub use record::{parse_year, NewRecord, Record, RecordId};
pub use text::{normalize, title_sort_key};
