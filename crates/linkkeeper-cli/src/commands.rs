use std::path::PathBuf;

use clap::{Parser, Subcommand};
use linkkeeper_core::IssueKind;

#[derive(Debug, Parser)]
#[command(name = "linkkeeper")]
#[command(about = "Find duplicate and dead bookmarks, and file loose ones into folders", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ./LinkKeeper.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load bookmarks from a JSON array into the database.
    ///
    /// Into an empty database (or with --replace) bookmarks keep their JSON ids.
    /// Into a database that already holds bookmarks they are given new ids.
    Import {
        path: PathBuf,
        /// Empty the database before importing
        #[arg(long)]
        replace: bool,
        #[arg(long, short)]
        yes: bool,
    },
    /// Report duplicate and dead bookmarks
    Scan {
        #[arg(long)]
        json: bool,
    },
    /// Scan, then delete the flagged bookmarks
    Clean {
        #[arg(long, default_value = "all")]
        kind: IssueKind,
        #[arg(long, short)]
        yes: bool,
    },
    /// Suggest folders for bookmarks that are not filed anywhere specific
    Bundle {
        #[arg(long)]
        json: bool,
        /// Move the bookmarks into the suggested folders
        #[arg(long)]
        apply: bool,
        #[arg(long, short)]
        yes: bool,
    },
    /// Print configuration values
    PrintConfig,
}
