pub mod memory;
pub mod models;
pub mod queries;
pub mod sqlite;

use std::collections::BTreeSet;

use crate::error::Error;
use models::{Bookmark, NewBookmark};

pub use memory::MemoryStore;
pub use sqlite::Database;

/// Data-access collaborator the engine reads bookmarks from and writes
/// remediation back to.
///
/// Implementations must be shareable across threads: the bundling applicator
/// issues folder updates concurrently.
pub trait BookmarkStore: Send + Sync {
    fn get_all_bookmarks(&self) -> Result<Vec<Bookmark>, Error>;

    /// Returns `Ok(false)` when no bookmark has that id.
    fn update_bookmark_folder(&self, id: i64, folder: &str) -> Result<bool, Error>;

    fn delete_bookmarks(&self, ids: &BTreeSet<i64>) -> Result<bool, Error>;

    fn get_bookmark(&self, id: i64) -> Result<Option<Bookmark>, Error>;

    fn insert_bookmark(&self, bookmark: NewBookmark) -> Result<Bookmark, Error>;

    fn remove_bookmark(&self, id: i64) -> Result<bool, Error> {
        let ids = BTreeSet::from([id]);
        if self.get_bookmark(id)?.is_none() {
            return Ok(false);
        }
        self.delete_bookmarks(&ids)
    }
}
