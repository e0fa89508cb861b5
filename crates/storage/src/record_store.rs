//! Record storage for mediadex.
//!
//! The `RecordStore` is the single source of truth for records. It owns every
//! record by identifier and hands out fresh identifiers; the indexes kept by the
//! repository only ever reference records through those identifiers.

use mediadex_core::{Error, NewRecord, Record, RecordId, Result};

/// Record storage backend: HashMap (O(1) lookup) or BTreeMap (O(log n) lookup).
#[cfg(feature = "hash-store")]
type RecordMap = hashbrown::HashMap<RecordId, Record>;
#[cfg(not(feature = "hash-store"))]
type RecordMap = std::collections::BTreeMap<RecordId, Record>;

/// Identifier handed out to the first record of an empty store.
pub const FIRST_ID: RecordId = 1;

/// Largest identifier a stored record may carry.
///
/// Fits a signed 64-bit integer, so snapshots stay readable by tools that parse
/// JSON numbers as `i64`, and leaves the id counter room to grow.
pub const MAX_ID: RecordId = i64::MAX as RecordId;

/// Mapping from identifier to record, plus the next identifier to assign.
#[derive(Debug)]
pub struct RecordStore {
    records: RecordMap,
    next_id: RecordId,
}

impl RecordStore {
    /// Creates an empty store whose first record gets [`FIRST_ID`].
    pub fn new() -> Self {
        Self {
            records: RecordMap::default(),
            next_id: FIRST_ID,
        }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the identifier the next created record will get.
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }

    /// Reserves a fresh identifier.
    pub fn allocate_id(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Allocates an identifier for `fields` and stores the resulting record.
    pub fn create(&mut self, fields: NewRecord) -> &Record {
        let id = self.allocate_id();
        self.records.entry(id).or_insert(Record::new(id, fields))
    }

    /// Stores a record under its own identifier, returning any record it replaced.
    ///
    /// Fails with `MalformedInput` when the identifier is outside
    /// `FIRST_ID..=MAX_ID`. The id counter is not touched; callers replaying a
    /// snapshot reset it with [`reset_next_id`](Self::reset_next_id) afterwards.
    pub fn insert(&mut self, record: Record) -> Result<Option<Record>> {
        let id = record.id();
        if !(FIRST_ID..=MAX_ID).contains(&id) {
            return Err(Error::malformed_input("id", id.to_string()));
        }
        Ok(self.records.insert(id, record))
    }

    /// Removes and returns the record with the given identifier.
    pub fn remove(&mut self, id: RecordId) -> Option<Record> {
        self.records.remove(&id)
    }

    /// Gets a record by identifier.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// Checks whether a record with the given identifier exists.
    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Iterates over all records in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Returns a copy of every record, sorted by identifier.
    pub fn snapshot(&self) -> Vec<Record> {
        let mut records: Vec<Record> = self.records.values().cloned().collect();
        records.sort_by_key(Record::id);
        records
    }

    /// Removes every record. The id counter is left as is.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Sets the next identifier to one past the largest stored identifier.
    pub fn reset_next_id(&mut self) {
        let max_id = self.records.keys().copied().max().unwrap_or(0);
        self.next_id = max_id.saturating_add(1);
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
