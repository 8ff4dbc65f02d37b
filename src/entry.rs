//! The definitional entry model.
//!
//! An [`Entry`] is the value type of the store: the synonyms, grammatical
//! type, definition, and rejected aliases attached to one canonical key.
//! The canonical key itself is deliberately NOT a member of `terms`; the
//! resolver treats key equality and synonym equality as separate paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::normalize_key;

/// Grammatical category of a term.
///
/// Unknown categories are rejected when parsing the type code, so a
/// constructed `TermType` is always one of the three known variants.
///
/// # Examples
///
/// ```
/// use termquery::TermType;
///
/// let t: TermType = "adj".parse().unwrap();
/// assert_eq!(t, TermType::Adjective);
/// assert!("adverb".parse::<TermType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermType {
    /// Describes a quality ("quick", "robust").
    Adjective,
    /// Names a thing or concept.
    Noun,
    /// Names an action.
    Verb,
}

impl FromStr for TermType {
    type Err = ValidationError;

    /// Parses a type code. Accepts the short code `adj` as well as the
    /// full category names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adj" | "adjective" => Ok(Self::Adjective),
            "noun" => Ok(Self::Noun),
            "verb" => Ok(Self::Verb),
            other => Err(ValidationError::InvalidType {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adjective => write!(f, "adjective"),
            Self::Noun => write!(f, "noun"),
            Self::Verb => write!(f, "verb"),
        }
    }
}

/// A definitional record, keyed in the store by its canonical term.
///
/// # Examples
///
/// ```
/// use termquery::{Entry, TermType};
///
/// let entry = Entry::new(
///     vec!["fast".into(), "rapid".into()],
///     TermType::Adjective,
///     "moving with speed",
///     vec!["speedy".into()],
/// );
/// assert!(entry.validate("quick").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Alternate valid spellings for the concept. The canonical key is
    /// never a member of this list.
    #[serde(default)]
    pub terms: Vec<String>,

    /// Grammatical category.
    #[serde(rename = "type")]
    pub term_type: TermType,

    /// Exhaustive definition of the term.
    pub definition: String,

    /// Terms a user might try that are deliberately not valid synonyms.
    /// A query hitting one of these is redirected to this entry instead
    /// of silently failing.
    #[serde(default)]
    pub rejected: Vec<String>,
}

impl Entry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(
        terms: Vec<String>,
        term_type: TermType,
        definition: impl Into<String>,
        rejected: Vec<String>,
    ) -> Self {
        Self {
            terms,
            term_type,
            definition: definition.into(),
            rejected,
        }
    }

    /// Validates this entry against its canonical key.
    ///
    /// Checks that the definition is non-empty, that no string repeats
    /// within `terms` or within `rejected` (comparison is on normalized
    /// strings), and that the key itself does not appear in `terms`.
    ///
    /// # Errors
    /// - [`ValidationError::EmptyDefinition`] if the definition is blank
    /// - [`ValidationError::DuplicateAlias`] on any repeated alias
    pub fn validate(&self, key: &str) -> Result<(), ValidationError> {
        if self.definition.trim().is_empty() {
            return Err(ValidationError::EmptyDefinition);
        }

        let norm_key = normalize_key(key);
        check_distinct(&self.terms, "terms")?;
        check_distinct(&self.rejected, "rejected")?;

        for term in &self.terms {
            if normalize_key(term) == norm_key {
                return Err(ValidationError::DuplicateAlias {
                    alias: term.clone(),
                    field: "terms",
                });
            }
        }

        Ok(())
    }

    /// Returns true if `normalized` matches one of the entry's synonyms.
    #[must_use]
    pub fn has_synonym(&self, normalized: &str) -> bool {
        self.terms.iter().any(|t| normalize_key(t) == normalized)
    }

    /// Returns true if `normalized` matches one of the entry's rejected
    /// aliases.
    #[must_use]
    pub fn has_rejected(&self, normalized: &str) -> bool {
        self.rejected.iter().any(|t| normalize_key(t) == normalized)
    }
}

fn check_distinct(values: &[String], field: &'static str) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::new();
    for value in values {
        if !seen.insert(normalize_key(value)) {
            return Err(ValidationError::DuplicateAlias {
                alias: value.clone(),
                field,
            });
        }
    }
    Ok(())
}
