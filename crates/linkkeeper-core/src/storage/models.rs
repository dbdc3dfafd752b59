use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_FOLDER: &str = "Other Bookmarks";
pub const BOOKMARKS_BAR: &str = "Bookmarks Bar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkStatus {
    #[default]
    Active,
    Dead,
    Duplicate,
}

impl BookmarkStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            BookmarkStatus::Active => "active",
            BookmarkStatus::Dead => "dead",
            BookmarkStatus::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for BookmarkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookmarkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(BookmarkStatus::Active),
            "dead" => Ok(BookmarkStatus::Dead),
            "duplicate" => Ok(BookmarkStatus::Duplicate),
            other => Err(format!("unknown bookmark status: {other}")),
        }
    }
}

/// A saved URL record, as handed out by a [`crate::storage::BookmarkStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(alias = "Id")]
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default = "default_folder")]
    pub folder: String,
    #[serde(default = "Utc::now")]
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub status: BookmarkStatus,
}

impl Bookmark {
    pub fn new(id: i64, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            folder: default_folder(),
            date_added: Utc::now(),
            status: BookmarkStatus::Active,
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_status(mut self, status: BookmarkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_dead(&self) -> bool {
        self.status == BookmarkStatus::Dead
    }
}

/// Fields accepted when creating a bookmark; the store assigns the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub status: Option<BookmarkStatus>,
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
}

impl NewBookmark {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn into_bookmark(self, id: i64) -> Bookmark {
        Bookmark {
            id,
            title: self.title,
            url: self.url,
            folder: self.folder.unwrap_or_else(default_folder),
            date_added: self.date_added.unwrap_or_else(Utc::now),
            status: self.status.unwrap_or_default(),
        }
    }
}

impl From<Bookmark> for NewBookmark {
    fn from(bookmark: Bookmark) -> Self {
        Self {
            title: bookmark.title,
            url: bookmark.url,
            folder: Some(bookmark.folder),
            status: Some(bookmark.status),
            date_added: Some(bookmark.date_added),
        }
    }
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}
