use ahash::{AHashMap, AHashSet};
use serde::Serialize;

use crate::scanner::normalize_url;
use crate::storage::models::Bookmark;

/// Every bookmark whose normalized URL was already seen earlier in the input,
/// in input order. The first occurrence of each URL is canonical and never
/// reported.
pub fn find_duplicates(bookmarks: &[Bookmark]) -> Vec<Bookmark> {
    let mut seen: AHashSet<String> = AHashSet::with_capacity(bookmarks.len());
    bookmarks
        .iter()
        .filter(|bookmark| !seen.insert(normalize_url(&bookmark.url)))
        .cloned()
        .collect()
}

/// Bookmarks sharing one normalized URL: the first-seen copy and the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub normalized_url: String,
    pub canonical: Bookmark,
    pub copies: Vec<Bookmark>,
}

/// Groups with at least one copy, ordered by where their canonical bookmark
/// appears in the input.
pub fn find_duplicate_groups(bookmarks: &[Bookmark]) -> Vec<DuplicateGroup> {
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for bookmark in bookmarks {
        let key = normalize_url(&bookmark.url);
        match index.get(&key) {
            Some(&slot) => groups[slot].copies.push(bookmark.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup {
                    normalized_url: key,
                    canonical: bookmark.clone(),
                    copies: Vec::new(),
                });
            }
        }
    }

    groups.retain(|group| !group.copies.is_empty());
    groups
}
