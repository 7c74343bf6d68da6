//! Event formatting and the two sinks (log file + console).
//!
//! Формат блока в логе:
//!   <RULE>
//!   -------<Category>-------
//!   <RULE>
//!   [yyyy-MM-dd HH:mm:ss] <headline>
//!     <Label>: <value>
//!   <RULE>

use chrono::{DateTime, Local};
use log::{info, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, WinDeckError};
use crate::metrics::record_log_write_failure;
use crate::util::{now_stamp, stamp_of};

use super::record::{ChangeKind, Record};

/// Fixed-width rule line between event sections.
pub const RULE: &str = "============================================================";

pub const HEADER_PREFIX: &str = "System Monitoring Started at: ";

/// Full event block, newline-terminated.
pub fn format_event<R: Record>(record: &R, kind: ChangeKind, at: &DateTime<Local>) -> String {
    let mut s = String::new();
    s.push_str(RULE);
    s.push('\n');
    s.push_str(&format!("-------{}-------\n", R::CATEGORY));
    s.push_str(RULE);
    s.push('\n');
    s.push_str(&format!("[{}] {}\n", stamp_of(at), record.headline(kind)));
    for (label, value) in record.fields() {
        s.push_str(&format!("  {}: {}\n", label, value));
    }
    s.push_str(RULE);
    s.push('\n');
    s
}

/// Writes events to the log file (append) and to a console writer.
pub struct Reporter<W: Write> {
    log_path: PathBuf,
    console: W,
    log_failures: u64,
}

impl<W: Write> Reporter<W> {
    pub fn new(log_path: impl Into<PathBuf>, console: W) -> Self {
        Self {
            log_path: log_path.into(),
            console,
            log_failures: 0,
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn log_failures(&self) -> u64 {
        self.log_failures
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    /// Create (or truncate) the log file and write the start header. Fatal on failure.
    pub fn begin(&mut self) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| WinDeckError::io_at("create log dir", parent, e))?;
            }
        }
        let header = format!("{}{}\n", HEADER_PREFIX, now_stamp());
        fs::write(&self.log_path, header.as_bytes())
            .map_err(|e| WinDeckError::io_at("create log file", &self.log_path, e))?;
        info!("monitor: logging to {}", self.log_path.display());
        Ok(())
    }

    /// Emit one change. Never fails: sink errors become warnings.
    pub fn report<R: Record>(&mut self, record: &R, kind: ChangeKind) {
        let block = format_event(record, kind, &Local::now());

        if let Err(e) = self.append_log(&block) {
            self.log_failures += 1;
            record_log_write_failure();
            warn!(
                "monitor: failed to write event to {}: {} (continuing)",
                self.log_path.display(),
                e
            );
        }

        if let Err(e) = self
            .console
            .write_all(block.as_bytes())
            .and_then(|_| self.console.flush())
        {
            warn!("monitor: console write failed: {}", e);
        }
    }

    fn append_log(&self, block: &str) -> std::io::Result<()> {
        let mut f = OpenOptions::new().create(true).append(true).open(&self.log_path)?;
        f.write_all(block.as_bytes())
    }
}
