//! Lazy per-key storage backend.
//!
//! The store is a directory: one codec-framed file per key plus a
//! manifest identifying the format. `open` validates only the manifest
//! and never loads entries; every operation touches just the addressed
//! key and writes through immediately, so `commit` is a no-op kept for
//! interface symmetry. Suited to large stores: a single mutation is
//! O(1) in the store size.
//!
//! Filenames are the hex encoding of the normalized key, which keeps
//! arbitrary key strings filesystem-safe and lets `keys()` recover them
//! by decoding directory listings.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::storage::codec;
use crate::storage::traits::{normalize_key, StoreBackend, StoreError};
use crate::storage::BackendKind;

const MANIFEST_FILE: &str = "store.manifest";
const ENTRY_EXT: &str = "entry";
const FORMAT_TAG: &str = "termquery-lazy";

/// Self-describing marker written once at store creation.
#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    format: String,
}

/// Directory-backed store addressing each record individually by key.
#[derive(Debug)]
pub struct LazyStore {
    dir: PathBuf,
}

impl LazyStore {
    /// Open a lazy store, optionally creating it.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if the directory is absent and
    ///   `create_if_missing` is false
    /// - [`StoreError::Corrupt`] if the path is not a directory of this
    ///   format (missing or unreadable manifest)
    /// - [`StoreError::PermissionDenied`] on permission failures
    pub fn open(path: &Path, create_if_missing: bool) -> Result<Self, StoreError> {
        if !path.exists() {
            if !create_if_missing {
                return Err(StoreError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            fs::create_dir_all(path).map_err(|e| StoreError::from_io(path, &e))?;
            let store = Self {
                dir: path.to_path_buf(),
            };
            store.write_manifest()?;
            return Ok(store);
        }

        if !path.is_dir() {
            return Err(StoreError::corrupt(path, "expected a store directory"));
        }

        let store = Self {
            dir: path.to_path_buf(),
        };
        store.check_manifest()?;
        Ok(store)
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn entry_path(&self, normalized: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{ENTRY_EXT}", hex::encode(normalized.as_bytes())))
    }

    fn write_manifest(&self) -> Result<(), StoreError> {
        let manifest = Manifest {
            format: FORMAT_TAG.to_string(),
        };
        write_frame(&self.manifest_path(), &manifest)
    }

    fn check_manifest(&self) -> Result<(), StoreError> {
        let path = self.manifest_path();
        if !path.exists() {
            return Err(StoreError::corrupt(&self.dir, "missing store manifest"));
        }
        let manifest: Manifest = read_frame(&path)?;
        if manifest.format != FORMAT_TAG {
            return Err(StoreError::corrupt(
                &path,
                format!("unexpected format tag '{}'", manifest.format),
            ));
        }
        Ok(())
    }
}

/// Write a codec frame atomically: temp file, fsync, rename.
fn write_frame<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let temp_path = path.with_extension("tmp");

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| StoreError::from_io(&temp_path, &e))?;
    let mut writer = BufWriter::new(file);

    let result = (|| {
        codec::write_header(&mut writer)?;
        let frame = codec::encode(value)?;
        writer.write_all(&frame)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::from_io(&temp_path, &e));
    }

    fs::rename(&temp_path, path).map_err(|e| StoreError::from_io(path, &e))
}

/// Read one codec frame, mapping decode failures to corruption.
fn read_frame<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::from_io(path, &e))?;
    let mut reader = BufReader::new(file);
    codec::read_header(&mut reader).map_err(|e| StoreError::corrupt(path, e.to_string()))?;
    codec::decode(&mut reader).map_err(|e| StoreError::corrupt(path, e.to_string()))
}

impl StoreBackend for LazyStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Lazy
    }

    fn get(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        let path = self.entry_path(&normalize_key(key));
        if !path.exists() {
            return Ok(None);
        }
        read_frame(&path).map(Some)
    }

    fn put(&mut self, key: &str, entry: Entry) -> Result<(), StoreError> {
        write_frame(&self.entry_path(&normalize_key(key)), &entry)
    }

    fn delete(&mut self, key: &str) -> Result<bool, StoreError> {
        let path = self.entry_path(&normalize_key(key));
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::from_io(&path, &e)),
        }
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entry_path(&normalize_key(key)).exists())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let iter = fs::read_dir(&self.dir).map_err(|e| StoreError::from_io(&self.dir, &e))?;

        for item in iter {
            let item = item.map_err(|e| StoreError::from_io(&self.dir, &e))?;
            let path = item.path();
            if path.extension().map_or(true, |ext| ext != ENTRY_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let bytes = hex::decode(stem).map_err(|e| {
                StoreError::corrupt(&path, format!("unparsable entry filename: {e}"))
            })?;
            let key = String::from_utf8(bytes).map_err(|e| {
                StoreError::corrupt(&path, format!("entry filename is not UTF-8: {e}"))
            })?;
            keys.push(key);
        }

        keys.sort();
        Ok(keys)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        // Every mutation writes through; nothing is pending.
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}
