use anyhow::{Context, Result};
use log::warn;

use WinDeck::dispatch::Outcome;
use WinDeck::AliasEntry;

fn print_listing(entries: &[AliasEntry], json: bool) -> Result<()> {
    if json {
        let rows: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| serde_json::json!({ "alias": e.alias, "location": e.location }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("(no aliases)");
        return Ok(());
    }
    let width = entries.iter().map(|e| e.alias.len()).max().unwrap_or(0);
    for (i, e) in entries.iter().enumerate() {
        println!("{:>3}. {:<width$}  {}", i + 1, e.alias, e.location, width = width);
    }
    Ok(())
}

/// Print (or act on) a dispatch outcome.
pub fn render(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Added(e) => println!("Added '{}' -> {}", e.alias, e.location),
        Outcome::Removed(Some(e)) => println!("Removed '{}' ({})", e.alias, e.location),
        Outcome::Removed(None) => println!("Nothing to remove"),
        Outcome::Listing { entries, json } => print_listing(&entries, json)?,
        Outcome::OpenBrowser(dir) => {
            opener::open(&dir).with_context(|| format!("open file browser at {}", dir.display()))?;
        }
        Outcome::BackedUp(p) => println!("Backup written to {}", p.display()),
        Outcome::Imported { source, stats } => {
            println!("Imported {}", source.display());
            println!("  added    = {}", stats.added);
            println!("  replaced = {}", stats.replaced);
            println!("  merged   = {}", stats.merged);
            println!("  skipped  = {}", stats.skipped);
        }
        Outcome::Help(text) => println!("{}", text),
        Outcome::ChangeDirectory(dir) => {
            // Процесс не может сменить cwd родительской оболочки: печатаем цель для обёртки `cd`.
            if !dir.is_dir() {
                warn!("{} does not exist (yet)", dir.display());
            }
            println!("{}", dir.display());
        }
    }
    Ok(())
}
