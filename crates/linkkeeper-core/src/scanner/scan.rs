use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::liveness::{Liveness, LivenessChecker};
use crate::analysis::duplicates::find_duplicates;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::storage::models::Bookmark;

/// Snapshot of scan progress, taken before each bookmark is checked and once
/// more at completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProgressEvent {
    pub percent_complete: f64,
    pub current_url: String,
    pub total_bookmarks: usize,
    pub scanned_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub total_scanned: usize,
    pub duplicates: Vec<Bookmark>,
    pub dead_links: Vec<Bookmark>,
    pub scan_duration_estimate_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl ScanReport {
    /// All-zero report handed back when no bookmarks could be read.
    pub fn empty() -> Self {
        Self {
            total_scanned: 0,
            duplicates: Vec::new(),
            dead_links: Vec::new(),
            scan_duration_estimate_ms: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn issue_count(&self) -> usize {
        self.duplicates.len() + self.dead_links.len()
    }

    pub fn has_issues(&self) -> bool {
        self.issue_count() > 0
    }

    /// One-sentence result summary for the assistant conversation.
    pub fn summary(&self) -> String {
        let duplicates = self.duplicates.len();
        let dead = self.dead_links.len();
        if duplicates == 0 && dead == 0 {
            return format!(
                "Great news! I scanned {} bookmarks and everything looks clean. \
                 No duplicates or dead links found.",
                self.total_scanned
            );
        }
        format!(
            "I found {} duplicate{} and {} dead link{} in your {} bookmarks.",
            duplicates,
            plural(duplicates),
            dead,
            plural(dead),
            self.total_scanned
        )
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Shared cancellation flag between a scan worker and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct ScanContext<'a> {
    pub checker: &'a dyn LivenessChecker,
    pub reporter: &'a dyn ProgressReporter,
    pub cancel: &'a CancelToken,
    pub estimate_per_item_ms: u64,
}

/// Scan `bookmarks` in order: duplicate detection over the whole set, then one
/// liveness check per bookmark with a progress event before each check and a
/// final event at 100%.
///
/// Only fails with [`Error::Cancelled`]; a cancelled scan emits nothing after
/// the cancellation is observed.
pub fn run_scan(bookmarks: &[Bookmark], ctx: &ScanContext<'_>) -> Result<ScanReport, Error> {
    let total = bookmarks.len();
    info!("Scanning {} bookmarks...", total);
    let start = Instant::now();
    ctx.reporter.on_scan_start(total);

    let duplicates = find_duplicates(bookmarks);
    debug!("{} duplicate bookmarks found", duplicates.len());

    let mut dead_links = Vec::new();
    let mut scanned_count = 0usize;

    for bookmark in bookmarks {
        if ctx.cancel.is_cancelled() {
            info!("Scan cancelled after {} of {} bookmarks", scanned_count, total);
            return Err(Error::Cancelled);
        }

        ctx.reporter.on_scan_progress(&ScanProgressEvent {
            percent_complete: scanned_count as f64 / total as f64 * 100.0,
            current_url: bookmark.url.clone(),
            total_bookmarks: total,
            scanned_count,
        });

        if ctx.checker.check(bookmark) == Liveness::Dead {
            dead_links.push(bookmark.clone());
        }

        scanned_count += 1;
    }

    if ctx.cancel.is_cancelled() {
        info!("Scan cancelled after {} of {} bookmarks", scanned_count, total);
        return Err(Error::Cancelled);
    }

    ctx.reporter.on_scan_progress(&ScanProgressEvent {
        percent_complete: 100.0,
        current_url: String::new(),
        total_bookmarks: total,
        scanned_count,
    });

    let report = ScanReport {
        total_scanned: total,
        duplicates,
        dead_links,
        scan_duration_estimate_ms: scanned_count as u64 * ctx.estimate_per_item_ms,
        timestamp: Utc::now(),
    };
    debug!(
        "Scan completed in {:.2}s, {} duplicates, {} dead links",
        start.elapsed().as_secs_f64(),
        report.duplicates.len(),
        report.dead_links.len(),
    );
    ctx.reporter.on_scan_complete(&report);
    Ok(report)
}
