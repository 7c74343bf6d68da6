//! Centralized configuration for WinDeck tools.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - DeckConfig::from_env() reads WD_* variables; binaries then apply CLI overrides
//!   through the fluent with_* setters.
//!
//! Env:
//! - WD_STORE_PATH              - alias document (quickpaths.xml)
//! - WD_MONITOR_LOG             - sysmonitor log file
//! - WD_POLL_MS                 - poll interval of the monitor loop
//! - WD_PROCESS_DENYLIST        - extra process names to ignore (comma-separated)
//! - WD_UNINSTALL_TIMEOUT_SECS  - wait budget per uninstall process

use std::fmt;
use std::path::PathBuf;

/// Default poll interval of the monitor (sub-second).
pub const DEFAULT_POLL_MS: u64 = 500;

/// Default wait budget for a spawned uninstaller.
pub const DEFAULT_UNINSTALL_TIMEOUT_SECS: u64 = 300;

/// Noisy system processes that the monitor never reports.
pub const DEFAULT_PROCESS_DENYLIST: &[&str] = &[
    "svchost",
    "RuntimeBroker",
    "conhost",
    "backgroundTaskHost",
    "WmiPrvSE",
];

#[derive(Clone, Debug)]
pub struct DeckConfig {
    /// Alias document location.
    /// Env: WD_STORE_PATH (default <config_dir>/QuickPaths/quickpaths.xml)
    pub store_path: PathBuf,

    /// Monitor log file (overwritten on every start).
    /// Env: WD_MONITOR_LOG (default <data_local_dir>/SysMonitor/monitor.log)
    pub monitor_log: PathBuf,

    /// Sleep between two polls, in milliseconds.
    /// Env: WD_POLL_MS (default 500)
    pub poll_interval_ms: u64,

    /// Process names ignored by the monitor (case-insensitive, ".exe" optional).
    /// Env: WD_PROCESS_DENYLIST extends the default list.
    pub process_denylist: Vec<String>,

    /// Wait budget for one uninstall process.
    /// Env: WD_UNINSTALL_TIMEOUT_SECS (default 300)
    pub uninstall_timeout_secs: u64,
}

fn default_store_path() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("QuickPaths")
        .join("quickpaths.xml")
}

fn default_monitor_log() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("SysMonitor")
        .join("monitor.log")
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            monitor_log: default_monitor_log(),
            poll_interval_ms: DEFAULT_POLL_MS,
            process_denylist: DEFAULT_PROCESS_DENYLIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
            uninstall_timeout_secs: DEFAULT_UNINSTALL_TIMEOUT_SECS,
        }
    }
}

impl DeckConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("WD_STORE_PATH") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.store_path = PathBuf::from(s);
            }
        }

        if let Ok(v) = std::env::var("WD_MONITOR_LOG") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.monitor_log = PathBuf::from(s);
            }
        }

        if let Ok(v) = std::env::var("WD_POLL_MS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.poll_interval_ms = n;
            }
        }

        if let Ok(v) = std::env::var("WD_PROCESS_DENYLIST") {
            for name in v.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                cfg.process_denylist.push(name.to_string());
            }
        }

        if let Ok(v) = std::env::var("WD_UNINSTALL_TIMEOUT_SECS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.uninstall_timeout_secs = n;
            }
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_store_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.store_path = path.into();
        self
    }

    pub fn with_monitor_log<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.monitor_log = path.into();
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Append extra names to the process denylist.
    pub fn with_extra_denylist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.process_denylist.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_uninstall_timeout_secs(mut self, secs: u64) -> Self {
        self.uninstall_timeout_secs = secs;
        self
    }
}

impl fmt::Display for DeckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DeckConfig {{ \
             store_path: {}, \
             monitor_log: {}, \
             poll_interval_ms: {}, \
             process_denylist: [{}], \
             uninstall_timeout_secs: {} \
             }}",
            self.store_path.display(),
            self.monitor_log.display(),
            self.poll_interval_ms,
            self.process_denylist.join(","),
            self.uninstall_timeout_secs,
        )
    }
}
