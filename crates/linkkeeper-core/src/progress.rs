use std::sync::mpsc::Sender;
use std::sync::Mutex;

use crate::analysis::apply::ApplyResult;
use crate::scanner::{ScanProgressEvent, ScanReport};

/// Trait for reporting scan and apply progress.
///
/// CLI implements with indicatif, library callers with a closure or a channel.
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self, _total: usize) {}
    fn on_scan_progress(&self, _event: &ScanProgressEvent) {}
    fn on_scan_complete(&self, _report: &ScanReport) {}
    fn on_apply_start(&self, _total: usize) {}
    fn on_apply_progress(&self, _done: usize, _total: usize) {}
    fn on_apply_complete(&self, _result: &ApplyResult) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// Forwards scan progress events to a callback.
pub struct FnReporter<F> {
    callback: F,
}

impl<F> FnReporter<F>
where
    F: Fn(&ScanProgressEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for FnReporter<F>
where
    F: Fn(&ScanProgressEvent) + Send + Sync,
{
    fn on_scan_progress(&self, event: &ScanProgressEvent) {
        (self.callback)(event);
    }
}

/// Sends scan progress events down an mpsc channel. A hung-up receiver is
/// ignored; the scan keeps going.
pub struct ChannelReporter {
    tx: Mutex<Sender<ScanProgressEvent>>,
}

impl ChannelReporter {
    pub fn new(tx: Sender<ScanProgressEvent>) -> Self {
        Self { tx: Mutex::new(tx) }
    }
}

impl ProgressReporter for ChannelReporter {
    fn on_scan_progress(&self, event: &ScanProgressEvent) {
        let tx = self.tx.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = tx.send(event.clone());
    }
}
