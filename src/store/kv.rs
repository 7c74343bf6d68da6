//! add / remove / list / resolve.

use log::{debug, info};
use std::path::Path;

use crate::error::{Result, WinDeckError};
use crate::util::absolutize;

use super::document::AliasEntry;
use super::AliasStore;

impl AliasStore {
    /// Append `alias -> path`. Existing paths are stored absolutized, others verbatim.
    ///
    /// Duplicate aliases are NOT rejected: a second entry is appended and lookups keep
    /// resolving to the first one.
    pub fn add(&self, alias: &str, path: &str) -> Result<AliasEntry> {
        let alias = alias.trim();
        let path = path.trim();
        if alias.is_empty() {
            return Err(WinDeckError::Validation("alias must not be empty".into()));
        }
        if path.is_empty() {
            return Err(WinDeckError::Validation("path must not be empty".into()));
        }

        let mut doc = self.load()?;

        let p = Path::new(path);
        let location = if p.exists() {
            absolutize(p).display().to_string()
        } else {
            path.to_string()
        };

        if doc.find(alias).is_some() {
            debug!("store: alias '{}' already present, appending duplicate", alias);
        }
        let entry = AliasEntry::new(alias, location);
        doc.entries_mut().push(entry.clone());
        self.save(&mut doc)?;
        info!("store: added {} -> {}", entry.alias, entry.location);
        Ok(entry)
    }

    /// Remove the first entry with `alias`. Absent alias is a no-op (None).
    pub fn remove(&self, alias: &str) -> Result<Option<AliasEntry>> {
        let mut doc = self.load()?;
        let idx = match doc.position(alias) {
            Some(i) => i,
            None => return Ok(None),
        };
        let removed = doc.entries_mut().remove(idx);
        self.save(&mut doc)?;
        info!("store: removed {}", removed.alias);
        Ok(Some(removed))
    }

    /// Remove by 1-based position in list() order.
    pub fn remove_at(&self, index: usize) -> Result<AliasEntry> {
        let mut doc = self.load()?;
        let len = doc.entries().len();
        if index == 0 || index > len {
            return Err(WinDeckError::NotFound(format!(
                "no entry #{} (store has {} entr(y/ies)); run 'ls' to see numbers",
                index, len
            )));
        }
        let removed = doc.entries_mut().remove(index - 1);
        self.save(&mut doc)?;
        info!("store: removed #{} {}", index, removed.alias);
        Ok(removed)
    }

    /// Entries in document order.
    pub fn list(&self) -> Result<Vec<AliasEntry>> {
        Ok(self.load()?.entries().to_vec())
    }

    /// Location of the first entry with `alias`.
    pub fn resolve(&self, alias: &str) -> Result<String> {
        let doc = self.load()?;
        doc.find(alias)
            .map(|e| e.location.clone())
            .ok_or_else(|| {
                WinDeckError::NotFound(format!(
                    "alias '{}' is not defined; run 'ls' to list aliases",
                    alias
                ))
            })
    }
}
