//! Command dispatch for the alias store.
//!
//! parse_command(): токены -> Command (ошибки Usage)
//! dispatch():      Command -> Outcome (без вывода на консоль)
//! Представление (печать, открытие проводника, смена директории) - в бинарнике.

use std::path::{Path, PathBuf};

use crate::error::{Result, WinDeckError};
use crate::store::{AliasEntry, AliasStore, ImportStats, ImportStrategy};

pub const HELP: &str = "\
quickpaths: quick path aliases

  add <alias> <path>                     add an alias (existing paths are stored absolute)
  rm <alias> | rm #<n>                   remove an alias (or the n-th entry of 'ls')
  ls [--json]                            list aliases in document order
  open                                   open a file browser at the current directory
  backup                                 copy the alias file to a timestamped sibling
  import <path> [--merge|--replace|--skip]
                                         import aliases from another file (default --merge)
  help                                   show this help
  <alias>                                print the directory of <alias> (cd target)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    Alias(String),
    /// 1-based position in list order.
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { alias: String, path: String },
    Remove(RemoveTarget),
    List { json: bool },
    Open,
    Backup,
    Import { source: PathBuf, strategy: ImportStrategy },
    Help,
    Go { alias: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(AliasEntry),
    /// None: alias was not present (no-op).
    Removed(Option<AliasEntry>),
    Listing { entries: Vec<AliasEntry>, json: bool },
    OpenBrowser(PathBuf),
    BackedUp(PathBuf),
    Imported { source: PathBuf, stats: ImportStats },
    Help(&'static str),
    ChangeDirectory(PathBuf),
}

fn usage(msg: &str) -> WinDeckError {
    WinDeckError::Usage(msg.to_string())
}

fn parse_remove_target(arg: &str) -> Result<RemoveTarget> {
    if let Some(num) = arg.strip_prefix('#') {
        let n = num
            .parse::<usize>()
            .map_err(|_| usage("rm #<n>: <n> must be a positive number"))?;
        if n == 0 {
            return Err(usage("rm #<n>: numbering starts at 1"));
        }
        return Ok(RemoveTarget::Index(n));
    }
    Ok(RemoveTarget::Alias(arg.to_string()))
}

/// Parse one command line (already split into tokens).
pub fn parse_command<S: AsRef<str>>(args: &[S]) -> Result<Command> {
    let args: Vec<&str> = args.iter().map(|s| s.as_ref()).collect();
    let (head, rest) = match args.split_first() {
        Some((h, r)) => (*h, r),
        None => return Ok(Command::Help),
    };

    match head {
        "add" => match rest {
            [alias, path] => Ok(Command::Add {
                alias: alias.to_string(),
                path: path.to_string(),
            }),
            [_, _, ..] => Err(usage("add <alias> <path> (quote paths with spaces)")),
            _ => Err(usage("add <alias> <path>")),
        },
        "rm" | "remove" => match rest {
            [target] => Ok(Command::Remove(parse_remove_target(target)?)),
            _ => Err(usage("rm <alias> | rm #<n>")),
        },
        "ls" | "list" => match rest {
            [] => Ok(Command::List { json: false }),
            ["--json"] => Ok(Command::List { json: true }),
            _ => Err(usage("ls [--json]")),
        },
        "open" => Ok(Command::Open),
        "backup" => Ok(Command::Backup),
        "import" => {
            let mut source: Option<&str> = None;
            let mut strategy = ImportStrategy::default();
            for a in rest {
                if a.starts_with("--") {
                    strategy = a.parse()?;
                } else if source.is_none() {
                    source = Some(*a);
                } else {
                    return Err(usage("import <path> [--merge|--replace|--skip]"));
                }
            }
            let source = source.ok_or_else(|| usage("import <path> [--merge|--replace|--skip]"))?;
            Ok(Command::Import {
                source: PathBuf::from(source),
                strategy,
            })
        }
        "help" | "-h" | "--help" | "?" => Ok(Command::Help),
        alias => match rest {
            [] => Ok(Command::Go {
                alias: alias.to_string(),
            }),
            _ => Err(usage(&format!(
                "unknown command '{}'; run 'help' for the list of commands",
                alias
            ))),
        },
    }
}

/// Split an interactive line into tokens; double quotes group words.
pub fn split_line(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    out.push(std::mem::take(&mut cur));
                    has_token = false;
                }
            }
            c => {
                cur.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        out.push(cur);
    }
    out
}

/// Relative path that exists under `cwd` -> `cwd`-anchored path; anything else unchanged.
fn anchor_to(cwd: &Path, path: &str) -> String {
    let p = Path::new(path.trim());
    if p.as_os_str().is_empty() || p.is_absolute() {
        return path.to_string();
    }
    let joined = cwd.join(p);
    if joined.exists() {
        joined.display().to_string()
    } else {
        path.to_string()
    }
}

/// Execute `cmd` against `store`. `cwd` is the directory `open` and relative `add` paths refer to.
pub fn dispatch(store: &AliasStore, cmd: Command, cwd: &Path) -> Result<Outcome> {
    match cmd {
        Command::Add { alias, path } => {
            let path = anchor_to(cwd, &path);
            store.add(&alias, &path).map(Outcome::Added)
        }
        Command::Remove(RemoveTarget::Alias(alias)) => store.remove(&alias).map(Outcome::Removed),
        Command::Remove(RemoveTarget::Index(n)) => {
            store.remove_at(n).map(|e| Outcome::Removed(Some(e)))
        }
        Command::List { json } => Ok(Outcome::Listing {
            entries: store.list()?,
            json,
        }),
        Command::Open => Ok(Outcome::OpenBrowser(cwd.to_path_buf())),
        Command::Backup => store.backup().map(Outcome::BackedUp),
        Command::Import { source, strategy } => {
            let stats = store.import(&source, strategy)?;
            Ok(Outcome::Imported { source, stats })
        }
        Command::Help => Ok(Outcome::Help(HELP)),
        Command::Go { alias } => store
            .resolve(&alias)
            .map(|loc| Outcome::ChangeDirectory(PathBuf::from(loc))),
    }
}
