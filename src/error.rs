//! Error types for termquery.
//!
//! All errors are strongly typed using thiserror: one enum per concern
//! plus a top-level [`TermqueryError`] that the command layer renders.
//! Per-row import failures are recovered inside the importer and never
//! surface here; only fatal conditions do.

use thiserror::Error;

use crate::storage::StoreError;

/// Validation errors raised while checking a candidate entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid term type '{value}' (expected adjective, noun, or verb)")]
    InvalidType { value: String },

    #[error("definition cannot be empty")]
    EmptyDefinition,

    #[error("duplicate alias '{alias}' in {field}")]
    DuplicateAlias { alias: String, field: &'static str },
}

/// Fatal errors raised while resolving a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The store invariant that a string belongs to at most one entry's
    /// synonyms was violated. The resolver refuses to pick a winner.
    #[error("ambiguous match: '{query}' is a synonym of both '{first}' and '{second}'")]
    AmbiguousMatch {
        query: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Top-level error type for termquery.
///
/// Encompasses every fatal condition the library can surface to the
/// command layer.
#[derive(Debug, Error)]
pub enum TermqueryError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("config error: {message}")]
    Config { message: String },
}

impl TermqueryError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this error originated in a storage backend.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type alias for termquery operations.
pub type TermqueryResult<T> = Result<T, TermqueryError>;
