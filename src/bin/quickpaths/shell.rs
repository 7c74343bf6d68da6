use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use WinDeck::dispatch::{dispatch, parse_command, split_line, Outcome};
use WinDeck::AliasStore;

use crate::render::render;

/// Interactive loop: one command per line until `exit`/`quit`/EOF.
///
/// A bare alias changes the shell's own working directory, so `open` afterwards
/// opens the alias target.
pub fn run(store: &AliasStore) -> Result<()> {
    let stdin = io::stdin();
    let mut cwd: PathBuf = std::env::current_dir()?;

    println!("quickpaths shell ({}). Type 'help' or 'exit'.", store.path().display());
    loop {
        print!("qp {}> ", cwd.display());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }
        let tokens = split_line(&line);
        match tokens.first().map(String::as_str) {
            None => continue,
            Some("exit") | Some("quit") => return Ok(()),
            Some(_) => {}
        }

        let result = parse_command(tokens.as_slice()).and_then(|cmd| dispatch(store, cmd, &cwd));
        match result {
            Ok(Outcome::ChangeDirectory(dir)) if dir.is_dir() => {
                cwd = dir;
                println!("{}", cwd.display());
            }
            Ok(outcome) => {
                if let Err(e) = render(outcome) {
                    eprintln!("error: {:#}", e);
                }
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }
}
