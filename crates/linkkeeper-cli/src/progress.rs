use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use linkkeeper_core::{ApplyResult, ProgressReporter, ScanProgressEvent, ScanReport};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// Both phases know their total up front, so each gets a sized bar.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn start_bar(&self, total: usize, template: &str) {
        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars(TICK_CHARS);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));

        let mut guard = self.slot();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.slot().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, total: usize) {
        self.start_bar(
            total,
            "  {spinner:.cyan} Scanning [{bar:30.cyan/dim}] {pos}/{len} bookmarks {wide_msg:.dim}",
        );
    }

    fn on_scan_progress(&self, event: &ScanProgressEvent) {
        if let Some(pb) = self.slot().as_ref() {
            pb.set_position(event.scanned_count as u64);
            pb.set_message(event.current_url.clone());
        }
    }

    fn on_scan_complete(&self, report: &ScanReport) {
        self.finish_bar();
        eprintln!(
            "  {} Scan complete: {} bookmarks, {} duplicates, {} dead links",
            "✓".green(),
            report.total_scanned,
            report.duplicates.len(),
            report.dead_links.len()
        );
    }

    fn on_apply_start(&self, total: usize) {
        self.start_bar(
            total,
            "  {spinner:.cyan} Filing [{bar:30.cyan/dim}] {pos}/{len} updates ({eta} remaining)",
        );
    }

    fn on_apply_progress(&self, done: usize, _total: usize) {
        if let Some(pb) = self.slot().as_ref() {
            pb.set_position(done as u64);
        }
    }

    fn on_apply_complete(&self, result: &ApplyResult) {
        self.finish_bar();
        eprintln!(
            "  {} Bundling applied: {} updated, {} failed",
            "✓".green(),
            result.updated,
            result.failed
        );
    }
}
