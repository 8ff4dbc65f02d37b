//! # termquery - a personal terminology store
//!
//! A keyed collection of definitional entries (canonical term, synonyms,
//! grammatical type, definition, rejected aliases) that can be
//! bulk-loaded from structured input and queried by any of a term's
//! spellings.
//!
//! ## Core Concepts
//!
//! - **Entry**: a definitional record keyed by a canonical term
//! - **Store backend**: a persistence strategy behind one trait, with a
//!   whole-snapshot and a lazy per-key implementation
//! - **Import**: a best-effort merge that deduplicates incoming records
//!   against the existing store and reports per-row outcomes
//! - **Resolution**: a query outcome - `Found`, `Redirect` (rejected
//!   alias pointing at the canonical entry), or `NotFound`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use termquery::storage::{open_store, BackendKind};
//! use termquery::{merge, parse_rows, query, Resolution};
//!
//! let mut store = open_store("glossary.tq".as_ref(), BackendKind::Snapshot, true)?;
//!
//! let rows = parse_rows("quick;adj;moving with speed;fast,rapid;speedy");
//! let report = merge(store.as_mut(), rows)?;
//! println!("{report}");
//!
//! match query(store.as_ref(), "Fast")? {
//!     Resolution::Found { key, entry, .. } => println!("{key}: {}", entry.definition),
//!     Resolution::Redirect { key, .. } => println!("not a valid term; see '{key}'"),
//!     Resolution::NotFound => println!("no match"),
//! }
//! store.close()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod entry;
pub mod error;
pub mod import;
pub mod resolve;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use config::StoreConfig;
pub use entry::{Entry, TermType};
pub use error::{QueryError, TermqueryError, TermqueryResult, ValidationError};
pub use import::{merge, parse_rows, ImportReport, RawRow, SkipReason, SkippedRow};
pub use resolve::{query, MatchedVia, Resolution};
pub use storage::{normalize_key, open_store, BackendKind, StoreBackend, StoreError};
