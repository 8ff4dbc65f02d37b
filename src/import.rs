//! Bulk import of terminology records.
//!
//! Converts raw structured rows into entries and merges them into a
//! store under dedup rules. The import is best-effort per row: a bad
//! row is recorded in the [`ImportReport`] and never aborts the whole
//! import. Only backend I/O failures are fatal.
//!
//! # Row format
//!
//! One record per line, five semicolon-separated columns:
//!
//! ```text
//! key;type;definition;terms;rejected
//! ```
//!
//! `type` is `adj`/`adjective`, `noun`, or `verb`. `terms` and
//! `rejected` are comma-separated lists and may be empty. Blank lines
//! and lines starting with `#` are skipped before rows reach the
//! importer.

use std::fmt;

use crate::entry::{Entry, TermType};
use crate::error::ValidationError;
use crate::storage::{normalize_key, StoreBackend, StoreError};

/// One raw input row, tagged with its source line number.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based line number in the source file.
    pub number: usize,
    /// The unparsed row text.
    pub text: String,
}

/// Splits input text into raw rows, skipping blank lines and `#`
/// comments. Line numbers refer to the original input.
#[must_use]
pub fn parse_rows(input: &str) -> Vec<RawRow> {
    input
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            Some(RawRow {
                number: idx + 1,
                text: line.to_string(),
            })
        })
        .collect()
}

/// Why a row was skipped during import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The row could not be parsed into a candidate record.
    Malformed { detail: String },
    /// The candidate entry failed validation.
    Invalid { error: ValidationError },
    /// The key already exists; the store's entry is authoritative.
    Duplicate,
    /// Accepting the record would make some string resolve to two
    /// entries.
    Ambiguous { conflicting_key: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { detail } => write!(f, "malformed: {detail}"),
            Self::Invalid { error } => write!(f, "invalid: {error}"),
            Self::Duplicate => write!(f, "duplicate"),
            Self::Ambiguous { conflicting_key } => {
                write!(f, "ambiguous: conflicts with '{conflicting_key}'")
            }
        }
    }
}

/// A skipped row and the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number of the offending row.
    pub row: usize,
    /// The normalized key, when the row parsed far enough to have one.
    pub key: Option<String>,
    /// Why the row was not imported.
    pub reason: SkipReason,
}

/// Aggregated outcome of one import run.
///
/// Counts per outcome plus the list of skipped rows with reasons, so
/// the caller can report exactly what happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows merged into the store.
    pub imported: usize,
    /// Rows that could not be parsed.
    pub malformed: usize,
    /// Rows whose candidate entry failed validation.
    pub invalid: usize,
    /// Rows whose key already existed.
    pub duplicate: usize,
    /// Rows rejected by the ambiguity invariant.
    pub ambiguous: usize,
    /// Every skipped row, in input order.
    pub skipped: Vec<SkippedRow>,
}

impl ImportReport {
    /// Total number of skipped rows.
    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.malformed + self.invalid + self.duplicate + self.ambiguous
    }

    /// Total number of rows processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.imported + self.total_skipped()
    }

    fn skip(&mut self, row: usize, key: Option<String>, reason: SkipReason) {
        match reason {
            SkipReason::Malformed { .. } => self.malformed += 1,
            SkipReason::Invalid { .. } => self.invalid += 1,
            SkipReason::Duplicate => self.duplicate += 1,
            SkipReason::Ambiguous { .. } => self.ambiguous += 1,
        }
        self.skipped.push(SkippedRow { row, key, reason });
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "imported {} of {} rows (malformed: {}, invalid: {}, duplicate: {}, ambiguous: {})",
            self.imported,
            self.total(),
            self.malformed,
            self.invalid,
            self.duplicate,
            self.ambiguous
        )?;
        for skipped in &self.skipped {
            match &skipped.key {
                Some(key) => writeln!(f, "  row {} ('{}'): {}", skipped.row, key, skipped.reason)?,
                None => writeln!(f, "  row {}: {}", skipped.row, skipped.reason)?,
            }
        }
        Ok(())
    }
}

/// A parsed but not yet validated record.
#[derive(Debug)]
struct Candidate {
    key: String,
    type_code: String,
    definition: String,
    terms: Vec<String>,
    rejected: Vec<String>,
}

impl Candidate {
    /// Validate the candidate into an entry keyed by `self.key`.
    fn into_entry(self) -> Result<(String, Entry), ValidationError> {
        let term_type: TermType = self.type_code.parse()?;
        let entry = Entry::new(self.terms, term_type, self.definition, self.rejected);
        entry.validate(&self.key)?;
        Ok((self.key, entry))
    }
}

fn split_list(column: &str) -> Vec<String> {
    column
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse one row into a candidate record, or a malformed-ness detail.
fn parse_row(text: &str) -> Result<Candidate, String> {
    let columns: Vec<&str> = text.split(';').collect();
    if columns.len() != 5 {
        return Err(format!("expected 5 columns, found {}", columns.len()));
    }

    let key = normalize_key(columns[0]);
    if key.is_empty() {
        return Err("empty key".to_string());
    }

    Ok(Candidate {
        key,
        type_code: columns[1].to_string(),
        definition: columns[2].trim().to_string(),
        terms: split_list(columns[3]),
        rejected: split_list(columns[4]),
    })
}

/// Scan the store for an existing entry that would make `entry`'s
/// strings ambiguous: a candidate synonym that is already another
/// entry's key or synonym, or the candidate key already used as a
/// synonym elsewhere. Rejected aliases do not participate; pointing a
/// rejected alias at another entry's vocabulary is the intended
/// redirection.
fn find_conflict(
    store: &dyn StoreBackend,
    key: &str,
    entry: &Entry,
) -> Result<Option<String>, StoreError> {
    let candidate_terms: Vec<String> = entry.terms.iter().map(|t| normalize_key(t)).collect();

    for existing_key in store.keys()? {
        let Some(existing) = store.get(&existing_key)? else {
            continue;
        };

        if candidate_terms.iter().any(|t| *t == existing_key)
            || candidate_terms.iter().any(|t| existing.has_synonym(t))
            || existing.has_synonym(key)
        {
            return Ok(Some(existing_key));
        }
    }

    Ok(None)
}

/// Merge raw rows into the store.
///
/// Makes a single forward pass over `rows`. Each row is parsed,
/// validated, checked against the store for duplication and ambiguity,
/// and either put or recorded as skipped. Existing entries are never
/// overwritten. The store is committed exactly once, after the loop,
/// bounding I/O cost for the snapshot backend.
///
/// # Errors
/// Only backend I/O failures; per-row problems end up in the report.
pub fn merge<I>(store: &mut dyn StoreBackend, rows: I) -> Result<ImportReport, StoreError>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut report = ImportReport::default();

    for row in rows {
        let candidate = match parse_row(&row.text) {
            Ok(candidate) => candidate,
            Err(detail) => {
                report.skip(row.number, None, SkipReason::Malformed { detail });
                continue;
            }
        };

        let candidate_key = candidate.key.clone();
        let (key, entry) = match candidate.into_entry() {
            Ok(parsed) => parsed,
            Err(error) => {
                report.skip(row.number, Some(candidate_key), SkipReason::Invalid { error });
                continue;
            }
        };

        if store.contains(&key)? {
            report.skip(row.number, Some(key), SkipReason::Duplicate);
            continue;
        }

        if let Some(conflicting_key) = find_conflict(store, &key, &entry)? {
            report.skip(row.number, Some(key), SkipReason::Ambiguous { conflicting_key });
            continue;
        }

        store.put(&key, entry)?;
        report.imported += 1;
    }

    store.commit()?;
    Ok(report)
}
