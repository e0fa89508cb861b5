//! Snapshot persistence backends.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use mediadex_core::Record;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Source and sink of a full record snapshot.
pub trait Persistence {
    /// Loads every stored record. A missing snapshot yields an empty list.
    fn load(&self) -> StorageResult<Vec<Record>>;

    /// Replaces the stored snapshot with `records`.
    fn save(&self, records: &[Record]) -> StorageResult<()>;
}

/// Snapshot kept as a pretty-printed JSON array in a single file.
///
/// Saves go to a sibling temporary file that is renamed over the target, so a
/// failed save leaves the previous snapshot in place.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("snapshot"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Persistence for JsonFileStore {
    fn load(&self) -> StorageResult<Vec<Record>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, records: &[Record]) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let temp = self.temp_path();
        let file = File::create(&temp).map_err(|e| StorageError::io(&temp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush().map_err(|e| StorageError::io(&temp, e))?;
        drop(writer);

        fs::rename(&temp, &self.path).map_err(|e| StorageError::io(&self.path, e))?;
        debug!(path = %self.path.display(), records = records.len(), "wrote snapshot");
        Ok(())
    }
}

/// Snapshot held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }

    /// Returns a copy of the current snapshot.
    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> StorageResult<Vec<Record>> {
        Ok(self.records())
    }

    fn save(&self, records: &[Record]) -> StorageResult<()> {
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }
}
