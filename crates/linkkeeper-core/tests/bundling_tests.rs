use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use linkkeeper_core::analysis::bundling::recommend;
use linkkeeper_core::config::BundlingConfig;
use linkkeeper_core::storage::models::NewBookmark;
use linkkeeper_core::{
    AppConfig, ApplyResult, ApplyStrategy, Bookmark, BookmarkStore, Database, Error, MemoryStore,
    ProgressReporter, ScanEngine, SilentReporter,
};

/// Accepts folder updates except for one id, which errors.
struct FlakyStore {
    inner: MemoryStore,
    failing_id: i64,
}

impl BookmarkStore for FlakyStore {
    fn get_all_bookmarks(&self) -> Result<Vec<Bookmark>, Error> {
        self.inner.get_all_bookmarks()
    }

    fn update_bookmark_folder(&self, id: i64, folder: &str) -> Result<bool, Error> {
        if id == self.failing_id {
            return Err(Error::Other(format!("write rejected for {id}")));
        }
        self.inner.update_bookmark_folder(id, folder)
    }

    fn delete_bookmarks(&self, ids: &BTreeSet<i64>) -> Result<bool, Error> {
        self.inner.delete_bookmarks(ids)
    }

    fn get_bookmark(&self, id: i64) -> Result<Option<Bookmark>, Error> {
        self.inner.get_bookmark(id)
    }

    fn insert_bookmark(&self, bookmark: NewBookmark) -> Result<Bookmark, Error> {
        self.inner.insert_bookmark(bookmark)
    }
}

#[derive(Default)]
struct CountingReporter {
    progress_calls: AtomicUsize,
    last_total: AtomicUsize,
}

impl ProgressReporter for CountingReporter {
    fn on_apply_progress(&self, _done: usize, total: usize) {
        self.progress_calls.fetch_add(1, Ordering::SeqCst);
        self.last_total.store(total, Ordering::SeqCst);
    }
}

fn unbundled(id: i64, title: &str, url: &str) -> Bookmark {
    Bookmark::new(id, title, url).with_folder("")
}

fn mixed_collection() -> Vec<Bookmark> {
    vec![
        unbundled(1, "GitHub repo", "https://github.com/x/y"),
        unbundled(2, "Rust tutorial", "https://doc.rust-lang.org/book/tutorial"),
        Bookmark::new(3, "Netflix", "https://www.netflix.com/browse"),
        Bookmark::new(4, "Spotify playlist", "https://open.spotify.com/playlist/1")
            .with_folder("Bookmarks Bar"),
        Bookmark::new(5, "Team Trello", "https://trello.com/b/abc").with_folder("Work"),
        unbundled(6, "Grandma's pie", "https://example.org/pie"),
    ]
}

#[test]
fn test_github_bookmark_suggested_for_development_tools() {
    let bookmarks = vec![unbundled(1, "GitHub repo", "https://github.com/x/y")];
    let set = recommend(&bookmarks, &BundlingConfig::default());

    let dev = set
        .folders
        .iter()
        .find(|f| f.name == "Development Tools")
        .expect("development folder suggested");
    assert_eq!(dev.count, 1);
    assert_eq!(dev.bookmarks[0].bookmark.id, 1);
    assert!(dev.bookmarks[0].match_score >= 2);
}

#[test]
fn test_no_bookmarks_at_all() {
    let set = recommend(&[], &BundlingConfig::default());
    assert!(set.folders.is_empty());
    assert_eq!(set.total_bookmarks, 0);
    assert_eq!(set.suggested_count, 0);
}

#[test]
fn test_everything_already_filed() {
    let bookmarks = vec![
        Bookmark::new(1, "GitHub", "https://github.com").with_folder("Code"),
        Bookmark::new(2, "Netflix", "https://netflix.com").with_folder("Fun"),
    ];
    let set = recommend(&bookmarks, &BundlingConfig::default());
    assert!(set.folders.is_empty());
    assert_eq!(set.total_bookmarks, 2);
    assert_eq!(set.unbundled_count, 0);
    assert!(!set.message.unwrap_or_default().is_empty());
}

#[test]
fn test_only_unbundled_bookmarks_are_considered() {
    let set = recommend(&mixed_collection(), &BundlingConfig::default());
    assert_eq!(set.total_bookmarks, 6);
    assert_eq!(set.unbundled_count, 5);

    let proposed: HashSet<i64> = set
        .folders
        .iter()
        .flat_map(|f| f.bookmarks.iter().map(|s| s.bookmark.id))
        .collect();
    assert!(!proposed.contains(&5));
    assert!(!proposed.contains(&6));
    assert!(proposed.contains(&3));
    assert!(proposed.contains(&4));
}

#[test]
fn test_folders_sorted_by_size_and_counts_sum() {
    let set = recommend(&mixed_collection(), &BundlingConfig::default());
    for pair in set.folders.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }
    for folder in &set.folders {
        assert_eq!(folder.count, folder.bookmarks.len());
        for pair in folder.bookmarks.windows(2) {
            assert!(pair[0].match_score >= pair[1].match_score);
        }
    }
    let sum: usize = set.folders.iter().map(|f| f.count).sum();
    assert_eq!(set.suggested_count, sum);
}

#[test]
fn test_multi_category_match_is_not_deduplicated() {
    // "tutorial" (Learning) and "docs"/"code" (Development Tools)
    let bookmarks = vec![unbundled(
        1,
        "Code tutorial",
        "https://docs.example.com/code/tutorial",
    )];
    let set = recommend(&bookmarks, &BundlingConfig::default());
    let names: Vec<&str> = set.folders.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"Development Tools"));
    assert!(names.contains(&"Learning & Resources"));
    assert!(set.suggested_count > set.unbundled_count);
}

#[test]
fn test_recommend_is_idempotent() {
    let bookmarks = mixed_collection();
    let config = BundlingConfig::default();
    assert_eq!(recommend(&bookmarks, &config), recommend(&bookmarks, &config));
}

#[test]
fn test_apply_counts_partial_failure() {
    let store = Arc::new(FlakyStore {
        inner: MemoryStore::new(vec![
            unbundled(1, "GitHub repo", "https://github.com/x/y"),
            unbundled(2, "GitLab mirror", "https://gitlab.com/x/y"),
        ]),
        failing_id: 2,
    });
    let engine = ScanEngine::new(AppConfig::default(), store.clone());
    let set = engine.recommend_from_store();
    assert_eq!(set.suggested_count, 2);

    let result = engine.apply_bundling(&set, &SilentReporter);
    assert_eq!(
        result,
        ApplyResult {
            success: true,
            updated: 1,
            failed: 1,
            total_attempted: 2,
        }
    );
    assert_eq!(
        store.get_bookmark(1).unwrap().unwrap().folder,
        "Development Tools"
    );
    assert_eq!(store.get_bookmark(2).unwrap().unwrap().folder, "");
}

#[test]
fn test_apply_every_proposal_double_counts() {
    let store = Arc::new(MemoryStore::new(vec![unbundled(
        1,
        "Code tutorial",
        "https://docs.example.com/code/tutorial",
    )]));
    let engine = ScanEngine::new(AppConfig::default(), store.clone());
    let set = engine.recommend_from_store();
    let result = engine.apply_bundling(&set, &SilentReporter);

    assert_eq!(result.total_attempted, set.suggested_count);
    assert_eq!(result.updated, set.suggested_count);
    assert!(result.updated > 1);
}

#[test]
fn test_apply_best_category_updates_once() {
    let store = Arc::new(MemoryStore::new(vec![unbundled(
        1,
        "Code tutorial",
        "https://docs.example.com/code/tutorial",
    )]));
    let mut config = AppConfig::default();
    config.bundling.apply_strategy = ApplyStrategy::BestCategoryPerBookmark;
    let engine = ScanEngine::new(config, store.clone());

    let set = engine.recommend_from_store();
    let result = engine.apply_bundling(&set, &SilentReporter);
    assert_eq!(result.total_attempted, 1);
    assert_eq!(result.updated, 1);

    // url "docs" + "code" and title "code" outweigh the tutorial match
    assert_eq!(
        store.get_bookmark(1).unwrap().unwrap().folder,
        "Development Tools"
    );
}

#[test]
fn test_concurrent_apply_against_sqlite() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let sites = [
        ("GitHub repo", "https://github.com/org/repo"),
        ("Netflix show", "https://www.netflix.com/title/1"),
        ("Amazon deal", "https://www.amazon.com/dp/1"),
        ("Coursera course", "https://www.coursera.org/learn/ml"),
    ];
    let new_bookmarks: Vec<NewBookmark> = (0..40)
        .map(|i| {
            let (title, url) = sites[i % sites.len()];
            NewBookmark {
                folder: Some(String::new()),
                ..NewBookmark::new(title, format!("{url}?n={i}"))
            }
        })
        .collect();
    db.insert_bookmarks(&new_bookmarks).unwrap();

    let engine = ScanEngine::new(AppConfig::default(), db.clone());
    let set = engine.recommend_from_store();
    let reporter = CountingReporter::default();
    let result = engine.apply_bundling(&set, &reporter);

    assert!(result.success);
    assert_eq!(result.failed, 0);
    assert_eq!(result.updated, result.total_attempted);
    assert_eq!(result.total_attempted, set.suggested_count);
    assert_eq!(
        reporter.progress_calls.load(Ordering::SeqCst),
        result.total_attempted
    );
    assert_eq!(
        reporter.last_total.load(Ordering::SeqCst),
        result.total_attempted
    );

    let unfiled = db
        .get_all_bookmarks()
        .unwrap()
        .into_iter()
        .filter(|b| b.folder.is_empty())
        .count();
    assert_eq!(unfiled, 0);
}

#[test]
fn test_apply_empty_set() {
    let engine = ScanEngine::new(AppConfig::default(), Arc::new(MemoryStore::default()));
    let set = engine.recommend_from_store();
    let result = engine.apply_bundling(&set, &SilentReporter);
    assert!(result.success);
    assert_eq!(result.updated, 0);
    assert_eq!(result.total_attempted, 0);
}
