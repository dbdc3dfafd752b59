use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use super::bundling::BundlingSuggestionSet;
use crate::progress::ProgressReporter;
use crate::storage::BookmarkStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStrategy {
    /// One update per proposal. A bookmark proposed under two folders is
    /// updated twice; the later update wins and both are counted.
    #[default]
    EveryProposal,
    /// One update per bookmark, to its highest-scoring folder (earliest
    /// folder on ties).
    BestCategoryPerBookmark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResult {
    pub success: bool,
    pub updated: usize,
    pub failed: usize,
    pub total_attempted: usize,
}

/// The (bookmark id, folder name) updates a strategy issues, in dispatch order.
pub fn planned_updates(
    suggestions: &BundlingSuggestionSet,
    strategy: ApplyStrategy,
) -> Vec<(i64, String)> {
    match strategy {
        ApplyStrategy::EveryProposal => suggestions
            .folders
            .iter()
            .flat_map(|folder| {
                folder
                    .bookmarks
                    .iter()
                    .map(move |scored| (scored.bookmark.id, folder.name.clone()))
            })
            .collect(),
        ApplyStrategy::BestCategoryPerBookmark => {
            let mut best: AHashMap<i64, usize> = AHashMap::new();
            let mut picks: Vec<(i64, u32, &str)> = Vec::new();
            for folder in &suggestions.folders {
                for scored in &folder.bookmarks {
                    let id = scored.bookmark.id;
                    match best.get(&id) {
                        Some(&slot) => {
                            if scored.match_score > picks[slot].1 {
                                picks[slot] = (id, scored.match_score, folder.name.as_str());
                            }
                        }
                        None => {
                            best.insert(id, picks.len());
                            picks.push((id, scored.match_score, folder.name.as_str()));
                        }
                    }
                }
            }
            picks
                .into_iter()
                .map(|(id, _, name)| (id, name.to_string()))
                .collect()
        }
    }
}

/// Move every proposed bookmark into its suggested folder.
///
/// Updates run concurrently and independently: an update that errors or
/// reports a missing bookmark is counted as failed and the rest carry on.
/// `success` is always true once dispatch completes.
pub fn apply(
    suggestions: &BundlingSuggestionSet,
    store: &dyn BookmarkStore,
    strategy: ApplyStrategy,
    reporter: &dyn ProgressReporter,
) -> ApplyResult {
    let updates = planned_updates(suggestions, strategy);
    let total = updates.len();
    if total == 0 {
        debug!("No bundling suggestions to apply");
        return ApplyResult {
            success: true,
            updated: 0,
            failed: 0,
            total_attempted: 0,
        };
    }

    info!("Applying {} folder updates ({:?})...", total, strategy);
    reporter.on_apply_start(total);

    let updated = AtomicUsize::new(0);
    let done = AtomicUsize::new(0);

    updates.par_iter().for_each(|(id, folder)| {
        match store.update_bookmark_folder(*id, folder) {
            Ok(true) => {
                updated.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => warn!("Bookmark {} not found, cannot move to '{}'", id, folder),
            Err(e) => warn!("Failed to move bookmark {} to '{}': {}", id, folder, e),
        }
        let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.on_apply_progress(finished, total);
    });

    let updated = updated.into_inner();
    let result = ApplyResult {
        success: true,
        updated,
        failed: total - updated,
        total_attempted: total,
    };
    info!(
        "Bundling applied: {} updated, {} failed",
        result.updated, result.failed
    );
    reporter.on_apply_complete(&result);
    result
}
