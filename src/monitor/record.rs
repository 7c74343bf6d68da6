//! Records tracked by the monitor (process / installed software).

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::hash::Hash;

use crate::util::stamp_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Process,
    Software,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Process => f.write_str("Process"),
            Category::Software => f.write_str("Software"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeKind {
    Added,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Architecture {
    #[serde(rename = "32-bit")]
    Bit32,
    #[serde(rename = "64-bit")]
    Bit64,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::Bit32 => f.write_str("32-bit"),
            Architecture::Bit64 => f.write_str("64-bit"),
        }
    }
}

/// Something the monitor can snapshot and diff.
pub trait Record: Clone {
    type Key: Eq + Hash + Clone + fmt::Debug;

    const CATEGORY: Category;

    /// Identity key used by diff.
    fn key(&self) -> Self::Key;

    /// First line of an event body, e.g. "Process Started".
    fn headline(&self, kind: ChangeKind) -> &'static str;

    /// Label/value lines of an event body.
    fn fields(&self) -> Vec<(&'static str, String)>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub id: u32,
    pub name: String,
    pub executable_path: Option<String>,
    pub start_time: DateTime<Local>,
}

impl Record for ProcessRecord {
    type Key = u32;

    const CATEGORY: Category = Category::Process;

    fn key(&self) -> u32 {
        self.id
    }

    fn headline(&self, kind: ChangeKind) -> &'static str {
        match kind {
            ChangeKind::Added => "Process Started",
            ChangeKind::Removed => "Process Stopped",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("PID", self.id.to_string()),
            (
                "Path",
                self.executable_path
                    .clone()
                    .unwrap_or_else(|| "(unavailable)".to_string()),
            ),
            ("Start Time", stamp_of(&self.start_time)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftwareRecord {
    pub display_name: String,
    pub version: Option<String>,
    pub architecture: Architecture,
    pub product_guid: Option<String>,
    pub publisher: Option<String>,
    /// Registered uninstall command (not part of the identity).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uninstall_command: String,
}

impl Record for SoftwareRecord {
    // Ключ - DisplayName: не уникален, две установки с одним именем сливаются.
    type Key = String;

    const CATEGORY: Category = Category::Software;

    fn key(&self) -> String {
        self.display_name.clone()
    }

    fn headline(&self, kind: ChangeKind) -> &'static str {
        match kind {
            ChangeKind::Added => "Software Installed",
            ChangeKind::Removed => "Software Uninstalled",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "Unknown".to_string());
        vec![
            ("Name", self.display_name.clone()),
            (
                "Version",
                self.version
                    .as_deref()
                    .map(format_version)
                    .unwrap_or_else(|| "Unknown".to_string()),
            ),
            ("Architecture", self.architecture.to_string()),
            ("Product GUID", or_unknown(&self.product_guid)),
            ("Publisher", or_unknown(&self.publisher)),
        ]
    }
}

/// Versions that look like a `yyyyMMdd` date are shown as `yyyy-MM-dd`; anything else verbatim.
pub fn format_version(raw: &str) -> String {
    let t = raw.trim();
    match NaiveDate::parse_from_str(t, "%Y%m%d") {
        Ok(d) if t.len() == 8 => d.format("%Y-%m-%d").to_string(),
        _ => raw.to_string(),
    }
}
