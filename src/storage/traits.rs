//! Abstract storage trait for termquery.
//!
//! The trait defines the contract both backends implement, so the
//! importer and resolver stay backend-agnostic. Backends normalize keys
//! internally; two keys differing only by case or surrounding whitespace
//! address the same record.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::entry::Entry;
use crate::storage::BackendKind;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store path does not exist and creation was not requested.
    #[error("store not found: {path}")]
    NotFound { path: PathBuf },

    /// The file exists but cannot be parsed as the backend's format.
    #[error("store corrupt: {path}: {detail}")]
    Corrupt { path: PathBuf, detail: String },

    /// An I/O permission failure.
    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Any other backend I/O failure.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Maps an I/O error to a store error, attaching the offending path.
    pub(crate) fn from_io(path: &Path, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Backend(format!("{}: {err}", path.display())),
        }
    }

    /// Maps a decode failure to a corruption error.
    pub(crate) fn corrupt(path: &Path, detail: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }
}

/// Normalizes a key or query string: surrounding whitespace stripped,
/// Unicode-lowercased. Idempotent.
///
/// # Examples
///
/// ```
/// use termquery::normalize_key;
///
/// assert_eq!(normalize_key("  Quick "), "quick");
/// assert_eq!(normalize_key(&normalize_key("QUICK")), "quick");
/// ```
#[must_use]
pub fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Persistence backend for a terminology store.
///
/// Both implementations share identical observable semantics for
/// `get`/`put`/`delete`/`contains`/`keys`; they differ only in cost
/// profile and on-disk layout. `put` on an existing key overwrites —
/// callers needing dedup must check `contains` first, which is exactly
/// what the importer does.
///
/// # Ownership
/// A store is exclusively owned by the handle that opened it. Backends
/// do not attempt file locking; opening the same path twice while a
/// first handle is live is a caller error.
pub trait StoreBackend: std::fmt::Debug {
    /// The kind tag this backend was opened as.
    fn kind(&self) -> BackendKind;

    /// Fetch the entry for a key, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Entry>, StoreError>;

    /// Insert or overwrite the entry for a key.
    fn put(&mut self, key: &str, entry: Entry) -> Result<(), StoreError>;

    /// Remove the entry for a key. Returns false if it was absent.
    fn delete(&mut self, key: &str) -> Result<bool, StoreError>;

    /// Returns true if the key is present.
    fn contains(&self, key: &str) -> Result<bool, StoreError>;

    /// All canonical keys currently in the store, in sorted order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Flush pending state to disk. A no-op for write-through backends.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Commit pending state if dirty and release resources. The handle
    /// must not be used afterwards.
    fn close(&mut self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test: ensure the trait is object-safe
    fn _assert_store_backend_object_safe(_: &dyn StoreBackend) {}

    #[test]
    fn test_normalize_key_basic() {
        assert_eq!(normalize_key("Quick"), "quick");
        assert_eq!(normalize_key("  fast\t"), "fast");
        assert_eq!(normalize_key("ÜBER"), "über");
    }

    #[test]
    fn test_normalize_key_idempotent() {
        for s in ["  Quick ", "FAST", "weird\u{a0}Space", "already normal"] {
            let once = normalize_key(s);
            assert_eq!(normalize_key(&once), once);
        }
    }

    #[test]
    fn test_store_error_from_io() {
        let path = Path::new("/tmp/store.tq");
        let err = StoreError::from_io(
            path,
            &io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(err, StoreError::NotFound { .. }));

        let err = StoreError::from_io(
            path,
            &io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, StoreError::PermissionDenied { .. }));

        let err = StoreError::from_io(
            path,
            &io::Error::new(io::ErrorKind::UnexpectedEof, "eof"),
        );
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::corrupt(Path::new("db.tq"), "bad magic");
        let msg = err.to_string();
        assert!(msg.contains("db.tq"));
        assert!(msg.contains("bad magic"));
    }
}
