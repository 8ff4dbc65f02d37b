//! Whole-snapshot storage backend.
//!
//! The entire mapping lives in memory; `open` deserializes one file and
//! `commit` writes the full mapping back using the write-to-temp-then-
//! rename pattern, so a crash mid-write never corrupts the existing
//! file. Suited to small stores: any single mutation costs O(total
//! store size) at commit time.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::entry::Entry;
use crate::storage::codec;
use crate::storage::traits::{normalize_key, StoreBackend, StoreError};
use crate::storage::BackendKind;

/// In-memory mapping persisted as a single codec-framed file.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    entries: BTreeMap<String, Entry>,
    dirty: bool,
}

impl SnapshotStore {
    /// Open a snapshot store, optionally creating it.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if the file is absent and
    ///   `create_if_missing` is false
    /// - [`StoreError::Corrupt`] if the file cannot be parsed
    /// - [`StoreError::PermissionDenied`] on permission failures
    pub fn open(path: &Path, create_if_missing: bool) -> Result<Self, StoreError> {
        if !path.exists() {
            if !create_if_missing {
                return Err(StoreError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            // Marked dirty so close() materializes the file even when
            // nothing is imported.
            let store = Self {
                path: path.to_path_buf(),
                entries: BTreeMap::new(),
                dirty: true,
            };
            return Ok(store);
        }

        let file = File::open(path).map_err(|e| StoreError::from_io(path, &e))?;
        let mut reader = BufReader::new(file);

        codec::read_header(&mut reader).map_err(|e| StoreError::corrupt(path, e.to_string()))?;
        let entries: BTreeMap<String, Entry> =
            codec::decode(&mut reader).map_err(|e| StoreError::corrupt(path, e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            dirty: false,
        })
    }

    /// Serialize the full mapping to a sibling temp file, fsync, then
    /// atomically rename over the original.
    fn write_snapshot(&self) -> Result<(), StoreError> {
        let temp_path = self.path.with_extension("tq.tmp");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| StoreError::from_io(&temp_path, &e))?;
        let mut writer = BufWriter::new(file);

        let result = (|| {
            codec::write_header(&mut writer)?;
            let frame = codec::encode(&self.entries)?;
            writer.write_all(&frame)?;
            writer.flush()?;
            writer.get_ref().sync_all()
        })();

        if let Err(e) = result {
            // Best effort: leave no stale temp file behind.
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::from_io(&temp_path, &e));
        }

        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::from_io(&self.path, &e))
    }
}

impl StoreBackend for SnapshotStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Snapshot
    }

    fn get(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        Ok(self.entries.get(&normalize_key(key)).cloned())
    }

    fn put(&mut self, key: &str, entry: Entry) -> Result<(), StoreError> {
        self.entries.insert(normalize_key(key), entry);
        self.dirty = true;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool, StoreError> {
        let removed = self.entries.remove(&normalize_key(key)).is_some();
        if removed {
            self.dirty = true;
        }
        Ok(removed)
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.contains_key(&normalize_key(key)))
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        self.write_snapshot()?;
        self.dirty = false;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.commit()
    }
}
