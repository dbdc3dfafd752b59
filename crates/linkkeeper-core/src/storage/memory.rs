use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use tracing::debug;

use super::models::{Bookmark, NewBookmark};
use super::BookmarkStore;
use crate::error::Error;

/// In-memory bookmark collection. Hands out copies; callers never alias the
/// stored records.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bookmarks: RwLock<Vec<Bookmark>>,
}

impl MemoryStore {
    pub fn new(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            bookmarks: RwLock::new(bookmarks),
        }
    }

    /// Parse a JSON array of bookmarks (`Id` or `id` keys are both accepted).
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let bookmarks: Vec<Bookmark> = serde_json::from_str(json)?;
        debug!("Loaded {} bookmarks from JSON", bookmarks.len());
        Ok(Self::new(bookmarks))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Bookmark>> {
        self.bookmarks
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Bookmark>> {
        self.bookmarks
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BookmarkStore for MemoryStore {
    fn get_all_bookmarks(&self) -> Result<Vec<Bookmark>, Error> {
        Ok(self.read().clone())
    }

    fn update_bookmark_folder(&self, id: i64, folder: &str) -> Result<bool, Error> {
        let mut bookmarks = self.write();
        match bookmarks.iter_mut().find(|b| b.id == id) {
            Some(bookmark) => {
                bookmark.folder = folder.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_bookmarks(&self, ids: &BTreeSet<i64>) -> Result<bool, Error> {
        self.write().retain(|b| !ids.contains(&b.id));
        Ok(true)
    }

    fn get_bookmark(&self, id: i64) -> Result<Option<Bookmark>, Error> {
        Ok(self.read().iter().find(|b| b.id == id).cloned())
    }

    fn insert_bookmark(&self, bookmark: NewBookmark) -> Result<Bookmark, Error> {
        let mut bookmarks = self.write();
        let next_id = bookmarks.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let bookmark = bookmark.into_bookmark(next_id);
        bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }
}
