//! Backup of the live document to a timestamped sibling, and restore from it.
//!
//! Имя копии: <stem>_backup_<yyyyMMdd_HHmmss_fff>.<ext>, в той же директории.
//! Живой файл при бэкапе не трогается.

use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WinDeckError};
use crate::metrics::{record_store_backup, record_store_restore};
use crate::util::backup_stamp;

use super::AliasStore;

/// Sibling backup path for `live` with the given stamp.
pub fn backup_path_for(live: &Path, stamp: &str) -> PathBuf {
    let stem = live
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "quickpaths".to_string());
    let name = match live.extension() {
        Some(ext) => format!("{}_backup_{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}_backup_{}", stem, stamp),
    };
    live.with_file_name(name)
}

impl AliasStore {
    /// Copy the live document next to itself. Returns the backup path.
    pub fn backup(&self) -> Result<PathBuf> {
        let live = self.path();
        let dst = backup_path_for(live, &backup_stamp());
        fs::copy(live, &dst).map_err(|e| WinDeckError::io_at("backup", live, e))?;
        record_store_backup();
        info!("store: backup {} -> {}", live.display(), dst.display());
        Ok(dst)
    }

    /// Replace the live document with `backup` byte-for-byte.
    pub fn restore_from(&self, backup: &Path) -> Result<()> {
        let live = self.path();
        fs::copy(backup, live).map_err(|e| WinDeckError::io_at("restore", backup, e))?;
        record_store_restore();
        warn!("store: restored {} from {}", live.display(), backup.display());
        Ok(())
    }
}
