//! mediadex Storage - record store, repository and persistence for mediadex.
//!
//! This crate provides the storage layer including:
//!
//! - `RecordStore`: Records by identifier, plus id allocation
//! - `Repository`: The record store kept in sync with per-field indexes
//! - `RepositoryConfig`: Index tunables
//! - `Persistence`: Snapshot load/save, with `JsonFileStore` and `MemoryStore`
//!
//! # Example
//!
//! ```rust
//! use mediadex_core::{Field, NewRecord};
//! use mediadex_storage::{IndexKind, Repository};
//!
//! let mut repo = Repository::with_defaults();
//! repo.add(NewRecord::new("Apple").artist("Ann"));
//! repo.add(NewRecord::new("Apricot"));
//! repo.add(NewRecord::new("Banana"));
//!
//! assert_eq!(repo.search_prefix(Field::Title, "ap").len(), 2);
//!
//! repo.remove(2).unwrap();
//! let titles: Vec<&str> = repo
//!     .list_all_by_title(IndexKind::Hash)
//!     .iter()
//!     .map(|r| r.title())
//!     .collect();
//! assert_eq!(titles, ["Apple", "Banana"]);
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod record_store;
pub mod repository;

pub use config::RepositoryConfig;
pub use error::{StorageError, StorageResult};
pub use persistence::{JsonFileStore, MemoryStore, Persistence};
pub use record_store::{RecordStore, FIRST_ID, MAX_ID};
pub use repository::{IndexKind, Repository};
