use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};

use WinDeck::dispatch::{dispatch, parse_command};
use WinDeck::{AliasStore, DeckConfig};

mod cli;
mod render;
mod shell;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт - warn (вывод команд не засоряем).
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();

    let mut cfg = DeckConfig::from_env();
    if let Some(p) = cli.store {
        cfg = cfg.with_store_path(p);
    }
    let store = AliasStore::new(cfg.store_path.clone());
    store
        .initialize()
        .with_context(|| format!("initialize alias file {}", store.path().display()))?;

    if cli.command.is_empty() {
        return shell::run(&store);
    }

    let cmd = parse_command(cli.command.as_slice())?;
    let cwd = std::env::current_dir()?;
    let outcome = dispatch(&store, cmd, &cwd)?;
    render::render(outcome)
}
