//! End-to-end import and query scenarios over both backends.

use termquery::storage::{open_store, BackendKind, StoreBackend};
use termquery::{merge, parse_rows, query, MatchedVia, Resolution};

const QUICK_ROW: &str = "quick;adjective;moving with speed;fast,rapid;speedy";

fn store_path(dir: &tempfile::TempDir, kind: BackendKind) -> std::path::PathBuf {
    match kind {
        BackendKind::Snapshot => dir.path().join("store.tq"),
        BackendKind::Lazy => dir.path().join("store"),
    }
}

fn for_each_kind(test: impl Fn(BackendKind)) {
    test(BackendKind::Snapshot);
    test(BackendKind::Lazy);
}

#[test]
fn scenario_a_import_then_query_all_paths() {
    for_each_kind(|kind| {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&store_path(&dir, kind), kind, true).unwrap();

        let report = merge(store.as_mut(), parse_rows(QUICK_ROW)).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.total_skipped(), 0);

        // Synonym hit, case-insensitively
        let Resolution::Found {
            key, matched_via, ..
        } = query(store.as_ref(), "Fast").unwrap()
        else {
            panic!("{kind}: expected Found for 'Fast'");
        };
        assert_eq!(key, "quick");
        assert_eq!(matched_via, MatchedVia::Synonym);

        // Rejected alias redirects to the canonical entry
        let Resolution::Redirect { key, .. } = query(store.as_ref(), "speedy").unwrap() else {
            panic!("{kind}: expected Redirect for 'speedy'");
        };
        assert_eq!(key, "quick");

        // Unknown string misses
        assert_eq!(query(store.as_ref(), "slow").unwrap(), Resolution::NotFound);
    });
}

#[test]
fn scenario_b_reimport_is_skipped_duplicate() {
    for_each_kind(|kind| {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&store_path(&dir, kind), kind, true).unwrap();

        merge(store.as_mut(), parse_rows(QUICK_ROW)).unwrap();
        let report = merge(store.as_mut(), parse_rows(QUICK_ROW)).unwrap();

        assert_eq!(report.imported, 0);
        assert_eq!(report.duplicate, 1);
        assert_eq!(store.keys().unwrap().len(), 1);
    });
}

#[test]
fn scenario_c_unknown_type_leaves_store_unchanged() {
    for_each_kind(|kind| {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&store_path(&dir, kind), kind, true).unwrap();

        let report = merge(
            store.as_mut(),
            parse_rows("slowly;adverb;in a slow manner;;"),
        )
        .unwrap();

        assert_eq!(report.imported, 0);
        assert_eq!(report.invalid, 1);
        assert!(store.keys().unwrap().is_empty());
    });
}

#[test]
fn query_results_survive_reopen() {
    for_each_kind(|kind| {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir, kind);

        let mut store = open_store(&path, kind, true).unwrap();
        merge(store.as_mut(), parse_rows(QUICK_ROW)).unwrap();

        let before = query(store.as_ref(), "rapid").unwrap();
        store.close().unwrap();
        drop(store);

        let reopened = open_store(&path, kind, false).unwrap();
        let after = query(reopened.as_ref(), "rapid").unwrap();
        assert_eq!(before, after, "{kind}: resolution changed across reopen");
    });
}

#[test]
fn imports_accumulate_across_runs() {
    for_each_kind(|kind| {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir, kind);

        let mut store = open_store(&path, kind, true).unwrap();
        merge(store.as_mut(), parse_rows(QUICK_ROW)).unwrap();
        store.close().unwrap();
        drop(store);

        let mut store = open_store(&path, kind, false).unwrap();
        let report = merge(
            store.as_mut(),
            parse_rows("bright;adj;giving off light;luminous;shiny"),
        )
        .unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(
            store.keys().unwrap(),
            vec!["bright".to_string(), "quick".to_string()]
        );
    });
}

#[test]
fn ambiguous_import_is_rejected_and_resolution_stays_clean() {
    for_each_kind(|kind| {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&store_path(&dir, kind), kind, true).unwrap();

        merge(store.as_mut(), parse_rows(QUICK_ROW)).unwrap();

        // "fast" is already quick's synonym; the record must be skipped,
        // and afterwards "fast" still resolves unambiguously.
        let report = merge(
            store.as_mut(),
            parse_rows("swift;adj;marked by great speed;fast;"),
        )
        .unwrap();
        assert_eq!(report.ambiguous, 1);

        let Resolution::Found { key, .. } = query(store.as_ref(), "fast").unwrap() else {
            panic!("{kind}: expected Found for 'fast'");
        };
        assert_eq!(key, "quick");
    });
}

#[test]
fn key_hit_beats_rejected_alias_elsewhere() {
    for_each_kind(|kind| {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&store_path(&dir, kind), kind, true).unwrap();

        let input = format!(
            "{QUICK_ROW}\nnimble;adj;light and quick in movement;agile;quick\n"
        );
        let report = merge(store.as_mut(), parse_rows(&input)).unwrap();
        assert_eq!(report.imported, 2);

        // "quick" is a canonical key and another entry's rejected alias;
        // the key hit must win.
        let Resolution::Found {
            key, matched_via, ..
        } = query(store.as_ref(), "quick").unwrap()
        else {
            panic!("{kind}: expected Found for 'quick'");
        };
        assert_eq!(key, "quick");
        assert_eq!(matched_via, MatchedVia::Key);
    });
}
