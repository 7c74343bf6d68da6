//! initialize(): создать документ по умолчанию, если его нет.

use log::info;
use std::fs;
use std::path::PathBuf;

use crate::error::{Result, WinDeckError};

use super::document::{AliasDocument, AliasEntry};
use super::AliasStore;

fn seed_dir(known: Option<PathBuf>, fallback: &str) -> String {
    known
        .or_else(|| dirs::home_dir().map(|h| h.join(fallback)))
        .unwrap_or_else(|| PathBuf::from(fallback))
        .display()
        .to_string()
}

/// Seed aliases of a fresh document: `desktop` and `documents`.
pub fn default_entries() -> Vec<AliasEntry> {
    vec![
        AliasEntry::new("desktop", seed_dir(dirs::desktop_dir(), "Desktop")),
        AliasEntry::new("documents", seed_dir(dirs::document_dir(), "Documents")),
    ]
}

impl AliasStore {
    /// Idempotent. Returns true if a new document was written.
    ///
    /// An existing valid document is left byte-identical; an existing invalid one is an
    /// error and is never overwritten.
    pub fn initialize(&self) -> Result<bool> {
        let path = self.path();
        if path.exists() {
            self.load()?;
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| WinDeckError::io_at("create store dir", parent, e))?;
            }
        }

        let mut doc = AliasDocument::new(path.display().to_string(), default_entries());
        self.save(&mut doc)?;
        info!("store: created {}", path.display());
        Ok(true)
    }
}
