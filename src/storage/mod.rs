//! Storage backends for termquery.
//!
//! One [`StoreBackend`] trait, two storage strategies selectable by a
//! configuration tag: [`SnapshotStore`] (whole file in memory, written
//! back on commit) and [`LazyStore`] (per-key write-through directory).

mod codec;
mod lazy;
mod snapshot;
mod traits;

pub use lazy::LazyStore;
pub use snapshot::SnapshotStore;
pub use traits::{normalize_key, StoreBackend, StoreError};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tag selecting which storage strategy backs a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Whole mapping in one file, loaded at open and rewritten at commit.
    Snapshot,
    /// Per-key files, written through immediately.
    Lazy,
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snapshot" => Ok(Self::Snapshot),
            "lazy" => Ok(Self::Lazy),
            other => Err(StoreError::Backend(format!(
                "unknown backend kind '{other}' (expected snapshot or lazy)"
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snapshot => write!(f, "snapshot"),
            Self::Lazy => write!(f, "lazy"),
        }
    }
}

/// Open a store at the given path with the chosen backend.
///
/// # Errors
/// - [`StoreError::NotFound`] if the path is absent and
///   `create_if_missing` is false
/// - [`StoreError::Corrupt`] if the path exists but cannot be parsed as
///   the backend's format
/// - [`StoreError::PermissionDenied`] on permission I/O failures
///
/// # Example
/// ```no_run
/// use termquery::storage::{open_store, BackendKind};
///
/// let store = open_store("glossary.tq".as_ref(), BackendKind::Snapshot, true)?;
/// # Ok::<(), termquery::storage::StoreError>(())
/// ```
pub fn open_store(
    path: &Path,
    kind: BackendKind,
    create_if_missing: bool,
) -> Result<Box<dyn StoreBackend>, StoreError> {
    match kind {
        BackendKind::Snapshot => {
            SnapshotStore::open(path, create_if_missing).map(|s| Box::new(s) as Box<dyn StoreBackend>)
        }
        BackendKind::Lazy => {
            LazyStore::open(path, create_if_missing).map(|s| Box::new(s) as Box<dyn StoreBackend>)
        }
    }
}
