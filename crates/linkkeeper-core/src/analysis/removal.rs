use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};

use crate::scanner::ScanReport;
use crate::storage::BookmarkStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    All,
    Duplicates,
    DeadLinks,
}

impl IssueKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            IssueKind::All => "all",
            IssueKind::Duplicates => "duplicates",
            IssueKind::DeadLinks => "dead",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(IssueKind::All),
            "duplicates" | "duplicate" => Ok(IssueKind::Duplicates),
            "dead" | "dead_links" | "dead-links" => Ok(IssueKind::DeadLinks),
            other => Err(format!("unknown issue kind: {other} (all|duplicates|dead)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalResult {
    pub success: bool,
    pub removed: usize,
    /// The scan report with the removed bookmarks filtered out.
    pub report: ScanReport,
}

impl ScanReport {
    /// Ids flagged under `kind`. A bookmark that is both duplicate and dead
    /// appears once.
    pub fn issue_ids(&self, kind: IssueKind) -> BTreeSet<i64> {
        let duplicates = self.duplicates.iter().map(|b| b.id);
        let dead = self.dead_links.iter().map(|b| b.id);
        match kind {
            IssueKind::All => duplicates.chain(dead).collect(),
            IssueKind::Duplicates => duplicates.collect(),
            IssueKind::DeadLinks => dead.collect(),
        }
    }

    /// A copy of this report with `ids` dropped from both issue lists.
    pub fn without(&self, ids: &BTreeSet<i64>) -> ScanReport {
        ScanReport {
            duplicates: self
                .duplicates
                .iter()
                .filter(|b| !ids.contains(&b.id))
                .cloned()
                .collect(),
            dead_links: self
                .dead_links
                .iter()
                .filter(|b| !ids.contains(&b.id))
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}

/// Delete the bookmarks flagged under `kind` in one bulk call.
pub fn remove_issues(
    report: &ScanReport,
    kind: IssueKind,
    store: &dyn BookmarkStore,
) -> RemovalResult {
    let ids = report.issue_ids(kind);
    remove_ids(report, ids, store)
}

pub fn remove_one(report: &ScanReport, id: i64, store: &dyn BookmarkStore) -> RemovalResult {
    remove_ids(report, BTreeSet::from([id]), store)
}

fn remove_ids(report: &ScanReport, ids: BTreeSet<i64>, store: &dyn BookmarkStore) -> RemovalResult {
    if ids.is_empty() {
        return RemovalResult {
            success: true,
            removed: 0,
            report: report.clone(),
        };
    }

    match store.delete_bookmarks(&ids) {
        Ok(true) => {
            info!("Removed {} problematic bookmarks", ids.len());
            RemovalResult {
                success: true,
                removed: ids.len(),
                report: report.without(&ids),
            }
        }
        Ok(false) => {
            error!("Store declined to remove {} bookmarks", ids.len());
            failed(report)
        }
        Err(e) => {
            error!("Failed to remove {} bookmarks: {}", ids.len(), e);
            failed(report)
        }
    }
}

fn failed(report: &ScanReport) -> RemovalResult {
    RemovalResult {
        success: false,
        removed: 0,
        report: report.clone(),
    }
}
