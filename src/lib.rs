#![allow(non_snake_case)]

// Базовые модули
pub mod config;
pub mod error;
pub mod metrics;
pub mod util;

// Монитор процессов/софта (snapshot + diff + отчёт)
pub mod monitor;   // src/monitor/{mod,record,snapshot,capture,report,runner}.rs

// Реестр установленного софта + uninstall
pub mod inventory; // src/inventory/{mod,registry,uninstall}.rs

// Alias store (QuickPaths XML) и диспетчер команд
pub mod store;     // src/store/{mod,document,open,kv,backup,import}.rs
pub mod dispatch;  // src/dispatch/mod.rs

// Удобные реэкспорты
pub use config::DeckConfig;
pub use error::{Result, WinDeckError};
pub use monitor::{
    diff, CancelToken, Diff, Monitor, MonitorOptions, MonitorState, ProcessRecord, Snapshot,
    SoftwareRecord,
};
pub use store::{AliasEntry, AliasStore, ImportStats, ImportStrategy};
pub use dispatch::{dispatch, parse_command, Command, Outcome};
