//! Installed-software inventory (registry uninstall keys).
//!
//! - registry:  enumeration of HKLM uninstall keys (native + WOW64 views), Windows-only.
//! - uninstall: running the registered uninstaller / msiexec with a wait budget.
//!
//! Pure helpers here (entry -> record, GUID extraction, filtering) are platform-independent.

pub mod registry;
pub mod uninstall;

use regex::Regex;
use std::sync::OnceLock;

use crate::monitor::record::{Architecture, SoftwareRecord};

/// Values read from one uninstall subkey.
#[derive(Debug, Clone, Default)]
pub struct RawUninstallEntry {
    pub display_name: Option<String>,
    pub display_version: Option<String>,
    pub publisher: Option<String>,
    pub uninstall_string: Option<String>,
}

fn guid_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^{}\s]+\}").ok()).as_ref()
}

/// First `{...}` token of an uninstall command, braces included.
pub fn extract_product_guid(uninstall_command: &str) -> Option<String> {
    guid_regex()?
        .find(uninstall_command)
        .map(|m| m.as_str().to_string())
}

fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Entries lacking a display name or an uninstall command are not "installed software".
pub fn record_from_entry(entry: &RawUninstallEntry, arch: Architecture) -> Option<SoftwareRecord> {
    let display_name = non_empty(&entry.display_name)?;
    let uninstall_command = non_empty(&entry.uninstall_string)?;
    Some(SoftwareRecord {
        product_guid: extract_product_guid(&uninstall_command),
        display_name,
        version: non_empty(&entry.display_version),
        architecture: arch,
        publisher: non_empty(&entry.publisher),
        uninstall_command,
    })
}

/// Inventory filter used by `softinv`.
#[derive(Debug, Clone, Default)]
pub struct InventoryQuery {
    /// Case-insensitive substring of the display name.
    pub name: Option<String>,
    pub architecture: Option<Architecture>,
}

impl InventoryQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            architecture: None,
        }
    }

    pub fn matches(&self, r: &SoftwareRecord) -> bool {
        if let Some(arch) = self.architecture {
            if r.architecture != arch {
                return false;
            }
        }
        match &self.name {
            Some(n) => r
                .display_name
                .to_lowercase()
                .contains(&n.trim().to_lowercase()),
            None => true,
        }
    }

    pub fn apply<'a>(&self, records: &'a [SoftwareRecord]) -> Vec<&'a SoftwareRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
