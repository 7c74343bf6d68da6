use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use WinDeck::DeckConfig;

mod cli;
mod cmd_guid;
mod cmd_list;
mod cmd_uninstall;

fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info"))
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
    match cli.cmd {
        cli::Cmd::List { filter, arch, json } =>
            cmd_list::exec(filter, arch, json),

        cli::Cmd::Guid { name } =>
            cmd_guid::exec(name),

        cli::Cmd::Uninstall { name, timeout_secs, dry_run } => {
            let timeout = timeout_secs.unwrap_or(DeckConfig::from_env().uninstall_timeout_secs);
            cmd_uninstall::exec(name, timeout, dry_run)
        }
    }
}
