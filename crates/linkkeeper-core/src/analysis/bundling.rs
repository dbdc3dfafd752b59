use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, info};

use super::catalog::{builtin_catalog, CategoryPattern};
use crate::config::BundlingConfig;
use crate::storage::models::Bookmark;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredBookmark {
    #[serde(flatten)]
    pub bookmark: Bookmark,
    pub match_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSuggestion {
    pub name: String,
    pub bookmarks: Vec<ScoredBookmark>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlingSuggestionSet {
    pub folders: Vec<FolderSuggestion>,
    pub total_bookmarks: usize,
    pub unbundled_count: usize,
    /// Sum of per-folder counts; a bookmark proposed for two folders counts twice.
    pub suggested_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BundlingSuggestionSet {
    fn without_folders(total_bookmarks: usize, unbundled_count: usize, message: String) -> Self {
        Self {
            folders: Vec::new(),
            total_bookmarks,
            unbundled_count,
            suggested_count: 0,
            message: Some(message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

/// Propose folders for bookmarks that sit in no specific folder.
///
/// Every unbundled bookmark is scored against every category; a bookmark is
/// proposed for each category where it reaches `min_score`, so it can appear
/// under several folders. Folders are ordered by size, bookmarks within a
/// folder by score (input order on ties).
pub fn recommend(bookmarks: &[Bookmark], config: &BundlingConfig) -> BundlingSuggestionSet {
    let total = bookmarks.len();
    if total == 0 {
        return BundlingSuggestionSet::without_folders(
            0,
            0,
            "No bookmarks found to organize.".to_string(),
        );
    }

    let unbundled: Vec<&Bookmark> = bookmarks
        .iter()
        .filter(|b| config.is_generic_folder(&b.folder))
        .collect();
    if unbundled.is_empty() {
        return BundlingSuggestionSet::without_folders(
            total,
            0,
            "All bookmarks are already organized into folders.".to_string(),
        );
    }

    let lowered: Vec<(String, String)> = unbundled
        .iter()
        .map(|b| (b.url.to_lowercase(), b.title.to_lowercase()))
        .collect();

    let catalog: Vec<CategoryPattern> = builtin_catalog()
        .into_iter()
        .chain(config.extra_categories.iter().map(CategoryPattern::lowercased))
        .collect();

    let mut folders: Vec<FolderSuggestion> = catalog
        .par_iter()
        .filter_map(|category| propose(category, &unbundled, &lowered, config.min_score))
        .collect();
    folders.sort_by_key(|folder| Reverse(folder.count));

    let suggested_count = folders.iter().map(|f| f.count).sum();
    let message = if folders.is_empty() {
        format!(
            "None of the {} unorganized bookmarks matched a known category.",
            unbundled.len()
        )
    } else {
        format!(
            "Found {} folder suggestion{} for {} unorganized bookmarks.",
            folders.len(),
            if folders.len() == 1 { "" } else { "s" },
            unbundled.len()
        )
    };

    info!(
        "{} of {} bookmarks unbundled, {} proposals across {} folders",
        unbundled.len(),
        total,
        suggested_count,
        folders.len()
    );

    BundlingSuggestionSet {
        folders,
        total_bookmarks: total,
        unbundled_count: unbundled.len(),
        suggested_count,
        message: Some(message),
    }
}

fn propose(
    category: &CategoryPattern,
    unbundled: &[&Bookmark],
    lowered: &[(String, String)],
    min_score: u32,
) -> Option<FolderSuggestion> {
    let mut scored: Vec<ScoredBookmark> = unbundled
        .iter()
        .zip(lowered)
        .filter_map(|(bookmark, (url, title))| {
            let match_score = category.score(url, title);
            (match_score >= min_score).then(|| ScoredBookmark {
                bookmark: (*bookmark).clone(),
                match_score,
            })
        })
        .collect();

    if scored.is_empty() {
        return None;
    }

    scored.sort_by_key(|s| Reverse(s.match_score));
    debug!("{}: {} proposals", category.name, scored.len());
    Some(FolderSuggestion {
        name: category.name.clone(),
        count: scored.len(),
        bookmarks: scored,
    })
}
