use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

use crate::analysis::apply::{self, ApplyResult};
use crate::analysis::bundling::{self, BundlingSuggestionSet};
use crate::analysis::removal::{self, IssueKind, RemovalResult};
use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::{ChannelReporter, ProgressReporter};
use crate::scanner::{
    run_scan, CancelToken, LivenessChecker, ScanContext, ScanProgressEvent, ScanReport,
    StoredStatusChecker,
};
use crate::storage::models::Bookmark;
use crate::storage::BookmarkStore;

/// Entry point for scanning, bundling and remediation over one bookmark store.
///
/// None of the operations return errors to the caller: data-access failures
/// are logged and folded into the returned report or tally. The only
/// exception is a cancelled [`ScanTask`].
#[derive(Clone)]
pub struct ScanEngine {
    config: AppConfig,
    store: Arc<dyn BookmarkStore>,
    checker: Arc<dyn LivenessChecker>,
}

impl ScanEngine {
    pub fn new(config: AppConfig, store: Arc<dyn BookmarkStore>) -> Self {
        let checker = Arc::new(StoredStatusChecker::new(config.scan.delay()));
        Self {
            config,
            store,
            checker,
        }
    }

    pub fn with_checker(mut self, checker: Arc<dyn LivenessChecker>) -> Self {
        self.checker = checker;
        self
    }

    /// Current snapshot of the store; an unreadable store reads as empty.
    pub fn load_bookmarks(&self) -> Vec<Bookmark> {
        match self.store.get_all_bookmarks() {
            Ok(bookmarks) => bookmarks,
            Err(e) => {
                warn!("Could not load bookmarks, treating collection as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Scan every bookmark in the store.
    pub fn scan(&self, reporter: &dyn ProgressReporter) -> ScanReport {
        let bookmarks = self.load_bookmarks();
        self.scan_bookmarks(&bookmarks, reporter)
    }

    /// Scan a caller-supplied snapshot.
    pub fn scan_bookmarks(
        &self,
        bookmarks: &[Bookmark],
        reporter: &dyn ProgressReporter,
    ) -> ScanReport {
        let cancel = CancelToken::new();
        run_scan(bookmarks, &self.scan_context(reporter, &cancel)).unwrap_or_else(|e| {
            warn!("Scan did not complete: {}", e);
            ScanReport::empty()
        })
    }

    /// Run a store scan on a worker thread. Progress arrives on
    /// [`ScanTask::events`]; [`ScanTask::cancel`] stops it between bookmarks.
    pub fn spawn_scan(&self) -> Result<ScanTask, Error> {
        let (tx, rx) = mpsc::channel();
        let cancel = CancelToken::new();
        let engine = self.clone();
        let worker_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name("linkkeeper-scan".to_string())
            .spawn(move || {
                let reporter = ChannelReporter::new(tx);
                let bookmarks = engine.load_bookmarks();
                run_scan(&bookmarks, &engine.scan_context(&reporter, &worker_cancel))
            })?;

        Ok(ScanTask {
            events: rx,
            cancel,
            handle,
        })
    }

    fn scan_context<'a>(
        &'a self,
        reporter: &'a dyn ProgressReporter,
        cancel: &'a CancelToken,
    ) -> ScanContext<'a> {
        ScanContext {
            checker: self.checker.as_ref(),
            reporter,
            cancel,
            estimate_per_item_ms: self.config.scan.estimate_per_item_ms,
        }
    }

    pub fn recommend_bundling(&self, bookmarks: &[Bookmark]) -> BundlingSuggestionSet {
        bundling::recommend(bookmarks, &self.config.bundling)
    }

    /// Recommend from a fresh store snapshot.
    pub fn recommend_from_store(&self) -> BundlingSuggestionSet {
        let bookmarks = self.load_bookmarks();
        self.recommend_bundling(&bookmarks)
    }

    pub fn apply_bundling(
        &self,
        suggestions: &BundlingSuggestionSet,
        reporter: &dyn ProgressReporter,
    ) -> ApplyResult {
        apply::apply(
            suggestions,
            self.store.as_ref(),
            self.config.bundling.apply_strategy,
            reporter,
        )
    }

    pub fn remove_issues(&self, report: &ScanReport, kind: IssueKind) -> RemovalResult {
        info!("Removing {} issues", kind);
        removal::remove_issues(report, kind, self.store.as_ref())
    }

    pub fn remove_bookmark(&self, report: &ScanReport, id: i64) -> RemovalResult {
        removal::remove_one(report, id, self.store.as_ref())
    }
}

/// A scan running on its own thread.
pub struct ScanTask {
    events: Receiver<ScanProgressEvent>,
    cancel: CancelToken,
    handle: JoinHandle<Result<ScanReport, Error>>,
}

impl ScanTask {
    /// Progress events in emission order. The channel closes when the scan ends.
    pub fn events(&self) -> &Receiver<ScanProgressEvent> {
        &self.events
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Block until the scan ends. Returns [`Error::Cancelled`] if it was cancelled.
    pub fn wait(self) -> Result<ScanReport, Error> {
        self.handle
            .join()
            .map_err(|_| Error::Other("scan worker panicked".to_string()))?
    }
}
