use clap::{Parser, Subcommand, ValueEnum};

use WinDeck::monitor::Architecture;

/// Installed software inventory (registry uninstall keys)
#[derive(Parser, Debug)]
#[command(name = "softinv", version, about = "Installed software inventory")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ArchArg {
    #[value(name = "32")]
    X32,
    #[value(name = "64")]
    X64,
}

impl From<ArchArg> for Architecture {
    fn from(a: ArchArg) -> Self {
        match a {
            ArchArg::X32 => Architecture::Bit32,
            ArchArg::X64 => Architecture::Bit64,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// List installed software (native and WOW64 views)
    List {
        /// Case-insensitive substring of the display name
        #[arg(long)]
        filter: Option<String>,
        /// Only one registry view
        #[arg(long, value_enum)]
        arch: Option<ArchArg>,
        /// JSON output (array)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print MSI product codes of matching entries
    Guid {
        /// Case-insensitive substring of the display name
        name: String,
    },
    /// Uninstall every matching entry (msiexec for MSI products, registered command otherwise)
    ///
    /// Каждый процесс ждём не дольше --timeout-secs, затем убиваем.
    /// Ошибка одного элемента не прерывает остальные.
    Uninstall {
        /// Case-insensitive substring of the display name
        name: String,
        /// Wait budget per uninstaller (default: WD_UNINSTALL_TIMEOUT_SECS or 300)
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Only print what would run
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}
