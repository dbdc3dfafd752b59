pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod progress;
pub mod scanner;
pub mod storage;

pub use analysis::apply::{ApplyResult, ApplyStrategy};
pub use analysis::bundling::{BundlingSuggestionSet, FolderSuggestion, ScoredBookmark};
pub use analysis::duplicates::{find_duplicate_groups, find_duplicates, DuplicateGroup};
pub use analysis::removal::{IssueKind, RemovalResult};
pub use config::AppConfig;
pub use engine::{ScanEngine, ScanTask};
pub use error::Error;
pub use progress::{ChannelReporter, FnReporter, ProgressReporter, SilentReporter};
pub use scanner::{
    normalize_url, CancelToken, Liveness, LivenessChecker, ScanProgressEvent, ScanReport,
    StoredStatusChecker,
};
pub use storage::models::{Bookmark, BookmarkStatus, NewBookmark};
pub use storage::{BookmarkStore, Database, MemoryStore};
