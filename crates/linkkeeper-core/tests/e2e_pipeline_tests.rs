use std::sync::Arc;

use linkkeeper_core::storage::models::BookmarkStatus;
use linkkeeper_core::{
    AppConfig, BookmarkStore, Database, IssueKind, MemoryStore, ScanEngine, SilentReporter,
};
use tempfile::tempdir;

const SEED: &str = r#"[
    {"id": 1, "title": "GitHub repo", "url": "https://github.com/rust-lang/rust",
     "folder": "Other Bookmarks", "dateAdded": "2024-01-02T03:04:05Z"},
    {"id": 2, "title": "GitHub copy", "url": "https://GitHub.com/rust-lang/rust/", "folder": ""},
    {"id": 3, "title": "Old blog", "url": "http://old.example.net/post",
     "folder": "Reading", "status": "dead"},
    {"id": 4, "title": "Netflix", "url": "https://www.netflix.com/", "folder": "Bookmarks Bar"},
    {"Id": 5, "title": "Coursera ML", "url": "https://www.coursera.org/learn/machine-learning"},
    {"id": 6, "title": "Recipes", "url": "https://example.org/pie", "folder": "Kitchen"}
]"#;

fn folder_of(store: &dyn BookmarkStore, id: i64) -> String {
    store.get_bookmark(id).unwrap().unwrap().folder
}

/// Scan, clean every issue, then bundle what is left.
fn run_pipeline(store: Arc<dyn BookmarkStore>) {
    let engine = ScanEngine::new(AppConfig::default(), store.clone());

    let report = engine.scan(&SilentReporter);
    assert_eq!(report.total_scanned, 6);
    assert_eq!(
        report.duplicates.iter().map(|b| b.id).collect::<Vec<_>>(),
        vec![2]
    );
    assert_eq!(
        report.dead_links.iter().map(|b| b.id).collect::<Vec<_>>(),
        vec![3]
    );

    let removal = engine.remove_issues(&report, IssueKind::All);
    assert!(removal.success);
    assert_eq!(removal.removed, 2);
    assert!(!removal.report.has_issues());

    let remaining: Vec<i64> = engine.load_bookmarks().iter().map(|b| b.id).collect();
    assert_eq!(remaining, vec![1, 4, 5, 6]);

    let set = engine.recommend_from_store();
    assert_eq!(set.total_bookmarks, 4);
    assert_eq!(set.unbundled_count, 3);
    assert_eq!(set.suggested_count, 3);

    let applied = engine.apply_bundling(&set, &SilentReporter);
    assert!(applied.success);
    assert_eq!(applied.updated, 3);
    assert_eq!(applied.failed, 0);

    assert_eq!(folder_of(store.as_ref(), 1), "Development Tools");
    assert_eq!(folder_of(store.as_ref(), 4), "Entertainment");
    assert_eq!(folder_of(store.as_ref(), 5), "Learning & Resources");
    assert_eq!(folder_of(store.as_ref(), 6), "Kitchen");

    let again = engine.recommend_from_store();
    assert!(again.folders.is_empty());
    assert_eq!(again.unbundled_count, 0);
    assert_eq!(again.total_bookmarks, 4);

    let rescan = engine.scan(&SilentReporter);
    assert_eq!(rescan.total_scanned, 4);
    assert!(!rescan.has_issues());
}

#[test]
fn test_pipeline_over_memory_store() {
    let store = MemoryStore::from_json(SEED).unwrap();
    assert_eq!(store.len(), 6);
    run_pipeline(Arc::new(store));
}

#[test]
fn test_pipeline_over_sqlite_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bookmarks.db");
    let db = Database::open(path.to_str().unwrap()).unwrap();

    let seed = MemoryStore::from_json(SEED).unwrap().get_all_bookmarks().unwrap();
    assert_eq!(db.restore_bookmarks(&seed).unwrap(), 6);
    assert_eq!(
        db.get_bookmark(3).unwrap().unwrap().status,
        BookmarkStatus::Dead
    );

    run_pipeline(Arc::new(db));

    // Changes are durable across reopen.
    let reopened = Database::open(path.to_str().unwrap()).unwrap();
    assert_eq!(reopened.count_bookmarks().unwrap(), 4);
    assert_eq!(folder_of(&reopened, 1), "Development Tools");
}
