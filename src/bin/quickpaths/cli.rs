use clap::Parser;
use std::path::PathBuf;

/// Quick path aliases (alias -> directory), stored in an XML file
#[derive(Parser, Debug)]
#[command(
    name = "quickpaths",
    version,
    about = "Quick path aliases",
    after_help = "Commands: add <alias> <path> | rm <alias> | ls | open | backup | import <path> [--merge|--replace|--skip] | help | <alias>\n\
                  Without a command an interactive shell is started."
)]
pub struct Cli {
    /// Alias file (default: WD_STORE_PATH or <config_dir>/QuickPaths/quickpaths.xml)
    #[arg(long, env = "WD_STORE_PATH")]
    pub store: Option<PathBuf>,

    /// Command and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}
