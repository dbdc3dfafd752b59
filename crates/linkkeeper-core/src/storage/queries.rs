use super::models::{Bookmark, BookmarkStatus, NewBookmark};
use super::sqlite::Database;
use super::BookmarkStore;
use crate::error::Error;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Result, Row};
use std::collections::BTreeSet;
use tracing::debug;

const BOOKMARK_COLUMNS: &str = "id, title, url, folder, date_added, status";

fn bookmark_from_row(row: &Row<'_>) -> Result<Bookmark> {
    let status: String = row.get(5)?;
    let status = status
        .parse::<BookmarkStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into()))?;
    Ok(Bookmark {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        folder: row.get(3)?,
        date_added: row.get(4)?,
        status,
    })
}

impl Database {
    // ── Bookmarks ────────────────────────────────────────────────

    pub fn insert_bookmarks(&self, bookmarks: &[NewBookmark]) -> Result<usize> {
        let mut conn = self.connection();
        let tx = conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO bookmark (title, url, folder, date_added, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for bookmark in bookmarks {
                let bookmark = bookmark.clone().into_bookmark(0);
                count += stmt.execute(params![
                    bookmark.title,
                    bookmark.url,
                    bookmark.folder,
                    bookmark.date_added,
                    bookmark.status.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        debug!("Inserted {} bookmarks", count);
        Ok(count)
    }

    /// Insert bookmarks under their own ids. Fails on an id that is already
    /// taken, leaving the table unchanged.
    pub fn restore_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<usize> {
        let mut conn = self.connection();
        let tx = conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO bookmark (id, title, url, folder, date_added, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for bookmark in bookmarks {
                count += stmt.execute(params![
                    bookmark.id,
                    bookmark.title,
                    bookmark.url,
                    bookmark.folder,
                    bookmark.date_added,
                    bookmark.status.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        debug!("Restored {} bookmarks with their ids", count);
        Ok(count)
    }

    pub fn list_bookmarks(&self) -> Result<Vec<Bookmark>> {
        let conn = self.connection();
        let mut stmt = conn.prepare(&format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmark ORDER BY id"
        ))?;
        let bookmarks = stmt
            .query_map([], bookmark_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(bookmarks)
    }

    pub fn find_bookmark(&self, id: i64) -> Result<Option<Bookmark>> {
        self.connection()
            .query_row(
                &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmark WHERE id = ?1"),
                params![id],
                bookmark_from_row,
            )
            .optional()
    }

    pub fn count_bookmarks(&self) -> Result<i64> {
        self.connection()
            .query_row("SELECT COUNT(*) FROM bookmark", [], |row| row.get(0))
    }

    /// Folder names with their bookmark counts, largest first.
    pub fn folder_counts(&self) -> Result<Vec<(String, i64)>> {
        let conn = self.connection();
        let mut stmt = conn.prepare(
            "SELECT folder, COUNT(*) AS n FROM bookmark \
             GROUP BY folder ORDER BY n DESC, folder",
        )?;
        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>>>()?;
        Ok(counts)
    }

    pub fn set_folder(&self, id: i64, folder: &str) -> Result<usize> {
        self.connection().execute(
            "UPDATE bookmark SET folder = ?1 WHERE id = ?2",
            params![folder, id],
        )
    }

    pub fn set_status(&self, id: i64, status: BookmarkStatus) -> Result<usize> {
        self.connection().execute(
            "UPDATE bookmark SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )
    }

    pub fn delete_bookmark_ids(&self, ids: &BTreeSet<i64>) -> Result<usize> {
        let mut conn = self.connection();
        let tx = conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare_cached("DELETE FROM bookmark WHERE id = ?1")?;
            for id in ids {
                count += stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        debug!("Deleted {} of {} requested bookmarks", count, ids.len());
        Ok(count)
    }
}

impl BookmarkStore for Database {
    fn get_all_bookmarks(&self) -> std::result::Result<Vec<Bookmark>, Error> {
        Ok(self.list_bookmarks()?)
    }

    fn update_bookmark_folder(&self, id: i64, folder: &str) -> std::result::Result<bool, Error> {
        Ok(self.set_folder(id, folder)? > 0)
    }

    fn delete_bookmarks(&self, ids: &BTreeSet<i64>) -> std::result::Result<bool, Error> {
        self.delete_bookmark_ids(ids)?;
        Ok(true)
    }

    fn get_bookmark(&self, id: i64) -> std::result::Result<Option<Bookmark>, Error> {
        Ok(self.find_bookmark(id)?)
    }

    fn insert_bookmark(&self, bookmark: NewBookmark) -> std::result::Result<Bookmark, Error> {
        let bookmark = bookmark.into_bookmark(0);
        let id = {
            let conn = self.connection();
            conn.execute(
                "INSERT INTO bookmark (title, url, folder, date_added, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    bookmark.title,
                    bookmark.url,
                    bookmark.folder,
                    bookmark.date_added,
                    bookmark.status.as_str(),
                ],
            )?;
            conn.last_insert_rowid()
        };
        self.find_bookmark(id)?.ok_or(Error::NotFound(id))
    }
}
