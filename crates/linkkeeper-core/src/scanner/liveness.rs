use std::thread;
use std::time::Duration;

use crate::storage::models::Bookmark;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

/// Decides whether a bookmark's target is reachable.
///
/// Called once per bookmark, sequentially, from the scan loop. Implementations
/// may block; the scan's progress events are paced by these calls.
pub trait LivenessChecker: Send + Sync {
    fn check(&self, bookmark: &Bookmark) -> Liveness;
}

/// Trusts the stored `status` flag. No network traffic is generated; the
/// optional latency only simulates the time a real probe would take.
#[derive(Debug, Clone, Default)]
pub struct StoredStatusChecker {
    latency: Duration,
}

impl StoredStatusChecker {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl LivenessChecker for StoredStatusChecker {
    fn check(&self, bookmark: &Bookmark) -> Liveness {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        if bookmark.is_dead() {
            Liveness::Dead
        } else {
            Liveness::Alive
        }
    }
}
