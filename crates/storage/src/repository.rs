//! The repository: one record store kept in sync with every index over it.
//!
//! A `Repository` owns a [`RecordStore`] plus one B+Tree per [`Field`] and a
//! hash index over the title. Every mutation goes to the store first and is then
//! propagated to each index, so that after any public operation the indexes
//! reference exactly the records in the store, under their normalized field
//! values. Queries read identifiers from one index and resolve them back through
//! the store.

use std::iter;

use mediadex_core::{normalize, title_sort_key, Error, Field, NewRecord, Record, RecordId, Result};
use mediadex_index::{BTreeIndex, HashIndex, Index};
use tracing::{debug, info, warn};

use crate::config::RepositoryConfig;
use crate::error::StorageResult;
use crate::persistence::Persistence;
use crate::record_store::RecordStore;

/// Per-field B+Tree indexes, addressed by [`Field::position`].
type FieldIndexes = [BTreeIndex<String, RecordId>; 4];

/// Which index answers a title listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexKind {
    /// The title B+Tree, walked along its leaf chain.
    Ordered,
    /// The title hash index, with its keys sorted on demand.
    Hash,
}

/// A record store with ordered per-field indexes and a title hash index.
#[derive(Debug)]
pub struct Repository {
    config: RepositoryConfig,
    store: RecordStore,
    field_indexes: FieldIndexes,
    title_hash: HashIndex,
}

fn build_field_indexes(order: usize) -> Result<FieldIndexes> {
    Ok([
        BTreeIndex::new(order)?,
        BTreeIndex::new(order)?,
        BTreeIndex::new(order)?,
        BTreeIndex::new(order)?,
    ])
}

impl Repository {
    /// Creates an empty repository.
    ///
    /// Fails with `InvalidConfiguration` when the configured order is below 3.
    pub fn new(config: RepositoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: RecordStore::new(),
            field_indexes: build_field_indexes(config.order)?,
            title_hash: HashIndex::new(),
        })
    }

    /// Creates an empty repository with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: RepositoryConfig::default(),
            store: RecordStore::new(),
            field_indexes: Default::default(),
            title_hash: HashIndex::new(),
        }
    }

    /// Returns the configuration this repository was built with.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if the repository holds no records.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the identifier the next added record will get.
    pub fn next_id(&self) -> RecordId {
        self.store.next_id()
    }

    /// Gets a record by identifier.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.store.get(id)
    }

    /// Returns every record, sorted by identifier.
    pub fn snapshot(&self) -> Vec<Record> {
        self.store.snapshot()
    }

    /// Returns the B+Tree indexing `field`.
    pub fn field_index(&self, field: Field) -> &BTreeIndex<String, RecordId> {
        &self.field_indexes[field.position()]
    }

    /// Returns the title hash index.
    pub fn title_hash(&self) -> &HashIndex {
        &self.title_hash
    }

    /// Creates a record from `fields` and indexes it.
    pub fn add(&mut self, fields: NewRecord) -> Record {
        let record = self.store.create(fields).clone();
        self.index_record(&record);
        debug!(id = record.id(), title = record.title(), "added record");
        record
    }

    /// Removes a record from the store and from every index.
    pub fn remove(&mut self, id: RecordId) -> Result<Record> {
        let record = self.store.remove(id).ok_or_else(|| Error::not_found(id))?;
        self.unindex_record(&record);
        debug!(id, title = record.title(), "removed record");
        Ok(record)
    }

    /// Replaces the whole content with `records`, keeping their identifiers.
    ///
    /// When two records share an identifier the later one wins. A record whose
    /// identifier is outside `FIRST_ID..=MAX_ID` is skipped with a warning. The
    /// next identifier becomes one past the largest identifier loaded.
    pub fn reindex<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        for (_, index) in self.indexes_mut() {
            index.clear();
        }
        self.store.clear();

        for record in records {
            match self.store.insert(record.clone()) {
                Ok(None) => {}
                Ok(Some(previous)) => {
                    warn!(id = previous.id(), "duplicate record id while reindexing, keeping the later one");
                    self.unindex_record(&previous);
                }
                Err(e) => {
                    warn!("{}; skipping record {:?}", e, record.title());
                    continue;
                }
            }
            self.index_record(&record);
        }
        self.store.reset_next_id();

        info!(
            records = self.store.len(),
            next_id = self.store.next_id(),
            "reindexed repository"
        );
    }

    /// Finds records whose `field` equals `value` after normalization.
    pub fn search_exact(&self, field: Field, value: &str) -> Vec<&Record> {
        let ids = self.field_index(field).search_exact(&normalize(value));
        self.resolve(ids)
    }

    /// Finds records whose `field` starts with `prefix` after normalization.
    pub fn search_prefix(&self, field: Field, prefix: &str) -> Vec<&Record> {
        let prefix = normalize(prefix);
        let ids = self
            .field_index(field)
            .search_prefix(&prefix, |key| key.starts_with(prefix.as_str()));
        self.resolve(ids)
    }

    /// Finds records by exact title through the hash index.
    pub fn search_exact_title_hash(&self, value: &str) -> Vec<&Record> {
        self.resolve(self.title_hash.search_exact(value))
    }

    /// Finds records by title prefix through the hash index.
    ///
    /// Scans every distinct title.
    pub fn search_prefix_title_hash(&self, prefix: &str) -> Vec<&Record> {
        self.resolve(self.title_hash.search_prefix(prefix))
    }

    /// Lists every record ordered by title, read from the chosen index.
    pub fn list_all_by_title(&self, via: IndexKind) -> Vec<&Record> {
        let ids = match via {
            IndexKind::Ordered => self.field_indexes[Field::Title.position()]
                .scan_all()
                .flat_map(|(_, ids)| ids.iter().copied())
                .collect(),
            IndexKind::Hash => self.title_hash.list_all_ordered(),
        };
        self.resolve(ids)
    }

    /// Renders the level layout of every field B+Tree.
    pub fn dump_index_levels(&self) -> String {
        let mut out = String::new();
        for field in Field::ALL {
            let index = self.field_index(field);
            out.push_str(&format!(
                "== {} (order {}, height {}) ==\n",
                field,
                index.order(),
                index.height()
            ));
            out.push_str(&index.dump_levels());
        }
        out
    }

    /// Lists every way the indexes disagree with the store.
    ///
    /// Returns an empty list when the repository is consistent.
    pub fn check_consistency(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for field in Field::ALL {
            if let Err(e) = self.field_index(field).validate() {
                problems.push(format!("{} index is malformed: {}", field, e));
            }
        }

        for (name, field, index) in self.indexes() {
            if index.len() != self.store.len() {
                problems.push(format!(
                    "{} holds {} ids for {} records",
                    name,
                    index.len(),
                    self.store.len()
                ));
            }
            for id in index.get_all() {
                if !self.store.contains(id) {
                    problems.push(format!("{} has dangling id {}", name, id));
                }
            }
            for record in self.store.iter() {
                let key = normalize(field.value_of(record));
                if !index.get(&key).contains(&record.id()) {
                    problems.push(format!("record {} missing from {}", record.id(), name));
                }
            }
        }

        problems
    }

    /// Replaces the content with the records `source` loads.
    ///
    /// Returns the number of records kept.
    pub fn load_from<P>(&mut self, source: &P) -> StorageResult<usize>
    where
        P: Persistence + ?Sized,
    {
        let records = source.load()?;
        let offered = records.len();
        self.reindex(records);
        let count = self.store.len();
        info!(records = count, skipped = offered - count, "loaded snapshot");
        Ok(count)
    }

    /// Exports every record, sorted by identifier, to `sink`.
    pub fn save_to<P>(&self, sink: &P) -> StorageResult<()>
    where
        P: Persistence + ?Sized,
    {
        let records = self.snapshot();
        sink.save(&records)?;
        info!(records = records.len(), "saved snapshot");
        Ok(())
    }

    /// Every index, with a name for diagnostics and the field it is keyed by.
    fn indexes(&self) -> impl Iterator<Item = (&'static str, Field, &dyn Index<String>)> + '_ {
        const NAMES: [&str; 4] = ["title index", "artist index", "genre index", "region index"];
        NAMES
            .into_iter()
            .zip(Field::ALL)
            .zip(&self.field_indexes)
            .map(|((name, field), index)| (name, field, index as &dyn Index<String>))
            .chain(iter::once((
                "title hash",
                Field::Title,
                &self.title_hash as &dyn Index<String>,
            )))
    }

    fn indexes_mut(&mut self) -> impl Iterator<Item = (Field, &mut dyn Index<String>)> + '_ {
        Field::ALL
            .into_iter()
            .zip(self.field_indexes.iter_mut().map(|index| index as &mut dyn Index<String>))
            .chain(iter::once((
                Field::Title,
                &mut self.title_hash as &mut dyn Index<String>,
            )))
    }

    fn index_record(&mut self, record: &Record) {
        let id = record.id();
        for (field, index) in self.indexes_mut() {
            index.add(normalize(field.value_of(record)), id);
        }
    }

    fn unindex_record(&mut self, record: &Record) {
        let id = record.id();
        for (field, index) in self.indexes_mut() {
            index.remove(&normalize(field.value_of(record)), id);
        }
    }

    /// Maps identifiers to records, dropping unknown ones, ordered by title.
    fn resolve(&self, ids: Vec<RecordId>) -> Vec<&Record> {
        let mut records: Vec<&Record> = ids
            .into_iter()
            .filter_map(|id| {
                let record = self.store.get(id);
                if record.is_none() {
                    warn!(id, "index returned an id with no record");
                }
                record
            })
            .collect();
        records.sort_by_cached_key(|r| title_sort_key(r.title()));
        records
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::with_defaults()
    }
}
