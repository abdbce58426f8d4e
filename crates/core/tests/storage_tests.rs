// ═══════════════════════════════════════════════════════════════════
// Storage Tests — PortfolioFile flat-file store
// ═══════════════════════════════════════════════════════════════════

use std::fs;

use fintech_core::errors::CoreError;
use fintech_core::storage::portfolio_file::PortfolioFile;

fn seeded_store(dir: &tempfile::TempDir, lines: &[&str]) -> PortfolioFile {
    let path = dir.path().join("portfolio.txt");
    let mut body = String::new();
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    fs::write(&path, body).unwrap();
    PortfolioFile::open(path)
}

// ═══════════════════════════════════════════════════════════════════
// add
// ═══════════════════════════════════════════════════════════════════

mod add {
    use super::*;

    #[test]
    fn add_then_contains() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &[]);

        assert!(!store.contains("TSLA").unwrap());
        store.add("TSLA").unwrap();
        assert!(store.contains("TSLA").unwrap());
    }

    #[test]
    fn add_normalizes_to_uppercase() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &[]);

        store.add("tsla").unwrap();
        assert!(store.contains("TSLA").unwrap());
        assert!(store.contains("tsla").unwrap());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "TSLA\n");
    }

    #[test]
    fn add_appends_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &["MSFT"]);

        store.add("TSLA").unwrap();
        store.add("AAPL").unwrap();
        assert_eq!(store.list().unwrap(), vec!["MSFT", "TSLA", "AAPL"]);
    }

    #[test]
    fn add_duplicate_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &["TSLA", "AAPL"]);
        let before = fs::read(store.path()).unwrap();

        let err = store.add("tsla").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateSymbol(ref s) if s == "TSLA"));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn add_repairs_a_missing_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.txt");
        // an externally edited file may lose its final newline
        fs::write(&path, "AAPL").unwrap();
        let store = PortfolioFile::open(path);

        store.add("TSLA").unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "AAPL\nTSLA\n");
        assert_eq!(store.list().unwrap(), vec!["AAPL", "TSLA"]);
    }

    #[test]
    fn file_stays_newline_terminated() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &[]);

        store.add("TSLA").unwrap();
        store.add("AAPL").unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "TSLA\nAAPL\n");
    }
}

// ═══════════════════════════════════════════════════════════════════
// remove
// ═══════════════════════════════════════════════════════════════════

mod remove {
    use super::*;

    #[test]
    fn remove_deletes_exactly_one_keeping_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &["MSFT", "TSLA", "AAPL"]);

        store.remove("TSLA").unwrap();
        assert_eq!(store.list().unwrap(), vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn remove_normalizes_case() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &["TSLA"]);

        store.remove("tsla").unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn remove_absent_reports_not_found_and_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &["MSFT", "AAPL"]);
        let before = fs::read(store.path()).unwrap();

        let err = store.remove("TSLA").unwrap_err();
        assert!(matches!(err, CoreError::SymbolNotFound(ref s) if s == "TSLA"));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn remove_last_symbol_leaves_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &["TSLA"]);

        store.remove("TSLA").unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
    }
}

// ═══════════════════════════════════════════════════════════════════
// list / load behavior
// ═══════════════════════════════════════════════════════════════════

mod list {
    use super::*;

    #[test]
    fn list_returns_storage_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &["ZZZ", "AAA", "MMM"]);
        assert_eq!(store.list().unwrap(), vec!["ZZZ", "AAA", "MMM"]);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.txt");
        fs::write(&path, "TSLA\n\nAAPL\n  \n").unwrap();
        let store = PortfolioFile::open(path);

        assert_eq!(store.list().unwrap(), vec!["TSLA", "AAPL"]);
    }

    #[test]
    fn empty_file_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir, &[]);
        assert!(store.list().unwrap().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// missing backing file
// ═══════════════════════════════════════════════════════════════════

mod unavailable {
    use super::*;

    fn missing_store(dir: &tempfile::TempDir) -> PortfolioFile {
        PortfolioFile::open(dir.path().join("does-not-exist.txt"))
    }

    #[test]
    fn contains_fails_with_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = missing_store(&dir).contains("TSLA").unwrap_err();
        assert!(matches!(err, CoreError::StoreUnavailable(_)));
    }

    #[test]
    fn add_fails_with_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = missing_store(&dir).add("TSLA").unwrap_err();
        assert!(matches!(err, CoreError::StoreUnavailable(_)));
    }

    #[test]
    fn remove_fails_with_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = missing_store(&dir).remove("TSLA").unwrap_err();
        assert!(matches!(err, CoreError::StoreUnavailable(_)));
    }

    #[test]
    fn list_fails_with_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = missing_store(&dir).list().unwrap_err();
        assert!(matches!(err, CoreError::StoreUnavailable(_)));
    }

    #[test]
    fn ensure_exists_creates_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = missing_store(&dir);

        store.ensure_exists().unwrap();
        assert!(store.list().unwrap().is_empty());

        // idempotent: a second call must not truncate existing content
        store.add("TSLA").unwrap();
        store.ensure_exists().unwrap();
        assert_eq!(store.list().unwrap(), vec!["TSLA"]);
    }
}
