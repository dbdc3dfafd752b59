mod commands;
mod logging;
mod progress;

use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use linkkeeper_core::config::{load_configuration, load_configuration_from};
use linkkeeper_core::{
    find_duplicate_groups, AppConfig, BookmarkStore, BundlingSuggestionSet, Database, IssueKind,
    MemoryStore, NewBookmark, ScanEngine, ScanReport, SilentReporter,
};
use progress::CliReporter;
use tracing::{error, info};

fn main() -> Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let loaded = match &args.config {
        Some(path) => load_configuration_from(path),
        None => load_configuration(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let outcome = match args.command {
        Some(Commands::Import { path, replace, yes }) => run_import(&config, &path, replace, yes),
        Some(Commands::Scan { json }) => run_scan(&config, json),
        Some(Commands::Clean { kind, yes }) => run_clean(&config, kind, yes),
        Some(Commands::Bundle { json, apply, yes }) => run_bundle(&config, json, apply, yes),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = outcome {
        error!("Error: {:#}", err);
        process::exit(1);
    }
    Ok(())
}

fn open_engine(config: &AppConfig) -> Result<ScanEngine> {
    let db = Database::open(&config.database_path)
        .with_context(|| format!("opening database {}", config.database_path))?;
    Ok(ScanEngine::new(config.clone(), Arc::new(db)))
}

fn run_import(config: &AppConfig, path: &Path, replace: bool, yes: bool) -> Result<()> {
    let seed = MemoryStore::from_json_file(path)
        .with_context(|| format!("loading bookmarks from {}", path.display()))?;
    let bookmarks = seed.get_all_bookmarks()?;

    let db = Database::open(&config.database_path)
        .with_context(|| format!("opening database {}", config.database_path))?;

    if replace {
        if !yes
            && !prompt_confirm(
                "Are you SURE you want to DELETE every bookmark before importing?",
                Some(false),
            )?
        {
            return Ok(());
        }
        db.truncate_all().context("truncating database")?;
    }

    // Seed ids survive into an empty database; otherwise they could collide.
    let inserted = if db.count_bookmarks().context("counting bookmarks")? == 0 {
        db.restore_bookmarks(&bookmarks)
            .context("importing bookmarks with their ids")?
    } else {
        info!("Database already holds bookmarks, imported ones get new ids");
        let rows: Vec<NewBookmark> = bookmarks.into_iter().map(NewBookmark::from).collect();
        db.insert_bookmarks(&rows).context("inserting bookmarks")?
    };
    info!(
        "Imported {} bookmarks into {}",
        format!("{}", inserted).green(),
        config.database_path
    );
    Ok(())
}

fn run_scan(config: &AppConfig, json: bool) -> Result<()> {
    let engine = open_engine(config)?;
    let report = if json {
        engine.scan(&SilentReporter)
    } else {
        engine.scan(&CliReporter::new())
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        print_duplicate_groups(&engine);
    }
    Ok(())
}

fn run_clean(config: &AppConfig, kind: IssueKind, yes: bool) -> Result<()> {
    let engine = open_engine(config)?;
    let report = engine.scan(&CliReporter::new());
    print_report(&report);
    if kind != IssueKind::DeadLinks {
        print_duplicate_groups(&engine);
    }

    let flagged = report.issue_ids(kind);
    if flagged.is_empty() {
        println!("Nothing to remove.");
        return Ok(());
    }

    let prompt = format!("Delete {} bookmarks flagged as {}?", flagged.len(), kind);
    if !yes && !prompt_confirm(&prompt, Some(false))? {
        return Ok(());
    }

    let result = engine.remove_issues(&report, kind);
    if !result.success {
        anyhow::bail!("the store refused the deletion; nothing was removed");
    }
    println!(
        "Removed {} bookmarks. {} issues remain.",
        format!("{}", result.removed).red(),
        result.report.issue_count()
    );
    Ok(())
}

fn run_bundle(config: &AppConfig, json: bool, apply: bool, yes: bool) -> Result<()> {
    let engine = open_engine(config)?;
    let suggestions = engine.recommend_from_store();

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else {
        print_suggestions(&suggestions);
    }

    if !apply || suggestions.is_empty() {
        return Ok(());
    }

    let prompt = format!(
        "Move bookmarks into {} suggested folders?",
        suggestions.folders.len()
    );
    if !yes && !prompt_confirm(&prompt, Some(true))? {
        return Ok(());
    }

    let result = engine.apply_bundling(&suggestions, &CliReporter::new());
    if result.failed > 0 {
        println!(
            "{} of {} updates failed; see the log for details.",
            format!("{}", result.failed).red(),
            result.total_attempted
        );
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    println!();
    println!("{}", report.summary());
    for bookmark in &report.duplicates {
        println!(
            "  {} #{} {} {}",
            "duplicate".yellow(),
            bookmark.id,
            bookmark.title,
            bookmark.url.dimmed()
        );
    }
    for bookmark in &report.dead_links {
        println!(
            "  {} #{} {} {}",
            "dead".red(),
            bookmark.id,
            bookmark.title,
            bookmark.url.dimmed()
        );
    }
}

fn print_duplicate_groups(engine: &ScanEngine) {
    let groups = find_duplicate_groups(&engine.load_bookmarks());
    if groups.is_empty() {
        return;
    }
    println!();
    println!("{}", "Duplicate groups".bold());
    for group in &groups {
        println!(
            "  {} #{} {}",
            "keep".green(),
            group.canonical.id,
            group.canonical.url
        );
        for copy in &group.copies {
            println!("    {} #{} {}", "copy".yellow(), copy.id, copy.url.dimmed());
        }
    }
}

fn print_suggestions(suggestions: &BundlingSuggestionSet) {
    if let Some(message) = &suggestions.message {
        println!("{}", message);
    }
    for folder in &suggestions.folders {
        println!();
        println!("{} ({})", folder.name.cyan().bold(), folder.count);
        for scored in &folder.bookmarks {
            println!(
                "  [{}] #{} {} {}",
                scored.match_score,
                scored.bookmark.id,
                scored.bookmark.title,
                scored.bookmark.url.dimmed()
            );
        }
    }
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(default.unwrap_or(false));
        }

        match input.trim().to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
