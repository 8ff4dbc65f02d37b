//! Query resolution.
//!
//! Maps an arbitrary input string to a canonical entry, or to a
//! rejection notice pointing at the canonical alternative. Resolution
//! follows a strict priority order; the ordering is a deliberate
//! tie-break, not an implementation accident:
//!
//! 1. canonical key hit
//! 2. synonym hit (unambiguous by store invariant)
//! 3. rejected-alias hit (a redirect, not a successful lookup)
//! 4. no match
//!
//! The scan is O(N) in the number of entries; no secondary index is
//! assumed. Correctness never depends on one.

use std::fmt;

use crate::entry::Entry;
use crate::error::QueryError;
use crate::storage::{normalize_key, StoreBackend};

/// How a query string matched an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedVia {
    /// The normalized query equals the entry's canonical key.
    Key,
    /// The normalized query equals one of the entry's synonyms.
    Synonym,
}

impl fmt::Display for MatchedVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key => write!(f, "key"),
            Self::Synonym => write!(f, "synonym"),
        }
    }
}

/// The outcome of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The query resolved to an entry.
    Found {
        /// Canonical key of the matched entry.
        key: String,
        /// The matched entry.
        entry: Entry,
        /// Which resolution path matched.
        matched_via: MatchedVia,
    },
    /// The query hit a rejected alias. This is NOT a successful
    /// definition lookup; the attached entry is the suggested
    /// alternative.
    Redirect {
        /// Canonical key of the entry rejecting the alias.
        key: String,
        /// The entry to point the user at instead.
        entry: Entry,
    },
    /// Nothing matched.
    NotFound,
}

/// Resolve a query string against the store.
///
/// The input is normalized exactly like store keys before any
/// comparison. If the same string turns out to be a synonym of more
/// than one entry the store invariant has been violated and the
/// resolver fails with [`QueryError::AmbiguousMatch`] rather than
/// silently picking one. Entries are scanned in sorted key order, so
/// a rejected-alias hit is deterministic even if several entries
/// reject the same string.
///
/// # Errors
/// - [`QueryError::AmbiguousMatch`] on a synonym invariant breach
/// - [`QueryError::Store`] on backend I/O failures
pub fn query(store: &dyn StoreBackend, text: &str) -> Result<Resolution, QueryError> {
    let normalized = normalize_key(text);

    // 1. Canonical hit
    if let Some(entry) = store.get(&normalized)? {
        return Ok(Resolution::Found {
            key: normalized,
            entry,
            matched_via: MatchedVia::Key,
        });
    }

    let keys = store.keys()?;

    // 2. Synonym hit
    let mut synonym_hit: Option<(String, Entry)> = None;
    for key in &keys {
        let Some(entry) = store.get(key)? else {
            continue;
        };
        if entry.has_synonym(&normalized) {
            if let Some((first, _)) = &synonym_hit {
                return Err(QueryError::AmbiguousMatch {
                    query: normalized,
                    first: first.clone(),
                    second: key.clone(),
                });
            }
            synonym_hit = Some((key.clone(), entry));
        }
    }
    if let Some((key, entry)) = synonym_hit {
        return Ok(Resolution::Found {
            key,
            entry,
            matched_via: MatchedVia::Synonym,
        });
    }

    // 3. Rejected hit
    for key in &keys {
        let Some(entry) = store.get(key)? else {
            continue;
        };
        if entry.has_rejected(&normalized) {
            return Ok(Resolution::Redirect {
                key: key.clone(),
                entry,
            });
        }
    }

    // 4. No match
    Ok(Resolution::NotFound)
}
