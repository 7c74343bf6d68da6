//! Import of another alias document into the live one.
//!
//! Порядок: load+validate живого документа -> backup -> load+validate источника ->
//! применение политики -> save. Любая ошибка после бэкапа восстанавливает живой файл
//! из бэкапа (атомарность через restore, не через транзакцию).
//!
//! Политика для alias, уже существующего в живом документе:
//! - Replace: location перезаписывается                       (replaced)
//! - Skip:    ничего                                           (skipped)
//! - Merge:   другой location -> новая запись `<alias>_imported` (merged),
//!            тот же location -> молча отбрасывается,
//!            `<alias>_imported` уже занят другим location -> skipped
//! Alias без конфликта просто добавляется                      (added)

use log::{info, warn};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, WinDeckError};
use crate::metrics::record_store_import;

use super::document::{AliasDocument, AliasEntry};
use super::AliasStore;

pub const MERGED_SUFFIX: &str = "_imported";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ImportStrategy {
    #[default]
    Merge,
    Replace,
    Skip,
}

impl FromStr for ImportStrategy {
    type Err = WinDeckError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('-').to_ascii_lowercase().as_str() {
            "merge" | "" => Ok(ImportStrategy::Merge),
            "replace" => Ok(ImportStrategy::Replace),
            "skip" => Ok(ImportStrategy::Skip),
            other => Err(WinDeckError::Usage(format!(
                "invalid import strategy '{}': use --merge|--replace|--skip",
                other
            ))),
        }
    }
}

impl fmt::Display for ImportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStrategy::Merge => f.write_str("merge"),
            ImportStrategy::Replace => f.write_str("replace"),
            ImportStrategy::Skip => f.write_str("skip"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub added: usize,
    pub replaced: usize,
    pub merged: usize,
    pub skipped: usize,
}

impl fmt::Display for ImportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added={} replaced={} merged={} skipped={}",
            self.added, self.replaced, self.merged, self.skipped
        )
    }
}

/// Apply `incoming` to `doc` in memory.
pub fn apply_import(
    doc: &mut AliasDocument,
    incoming: &[AliasEntry],
    strategy: ImportStrategy,
) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    for src in incoming {
        let alias = src.alias.trim();
        let location = src.location.trim();
        if alias.is_empty() || location.is_empty() {
            return Err(WinDeckError::Validation(format!(
                "import source has an entry with empty alias or location (alias='{}')",
                src.alias
            )));
        }

        let pos = match doc.position(alias) {
            None => {
                doc.entries_mut().push(AliasEntry::new(alias, location));
                stats.added += 1;
                continue;
            }
            Some(p) => p,
        };

        match strategy {
            ImportStrategy::Replace => {
                doc.entries_mut()[pos].location = location.to_string();
                stats.replaced += 1;
            }
            ImportStrategy::Skip => {
                stats.skipped += 1;
            }
            ImportStrategy::Merge => {
                if doc.entries()[pos].location == location {
                    continue;
                }
                let derived = format!("{}{}", alias, MERGED_SUFFIX);
                match doc.find(&derived) {
                    None => {
                        doc.entries_mut().push(AliasEntry::new(derived, location));
                        stats.merged += 1;
                    }
                    // Уже импортировано ранее с тем же путём.
                    Some(e) if e.location == location => {}
                    // Производный alias занят другим путём: второй не добавляем.
                    Some(_) => stats.skipped += 1,
                }
            }
        }
    }

    Ok(stats)
}

impl AliasStore {
    /// Import `source` with `strategy`. The live file is restored from a fresh backup
    /// if anything fails after that backup was taken.
    pub fn import(&self, source: &Path, strategy: ImportStrategy) -> Result<ImportStats> {
        let mut doc = self.load()?;
        let backup = self.backup()?;

        let result = (|| -> Result<ImportStats> {
            let src = AliasDocument::load(source)?;
            let stats = apply_import(&mut doc, src.entries(), strategy)?;
            self.save(&mut doc)?;
            Ok(stats)
        })();

        match result {
            Ok(stats) => {
                record_store_import();
                info!(
                    "store: imported {} ({}): {}",
                    source.display(),
                    strategy,
                    stats
                );
                Ok(stats)
            }
            Err(e) => {
                warn!("store: import of {} failed: {}", source.display(), e);
                if let Err(re) = self.restore_from(&backup) {
                    warn!(
                        "store: restore from {} failed too: {}",
                        backup.display(),
                        re
                    );
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_flags() {
        assert_eq!("--merge".parse::<ImportStrategy>().unwrap(), ImportStrategy::Merge);
        assert_eq!("--replace".parse::<ImportStrategy>().unwrap(), ImportStrategy::Replace);
        assert_eq!("Skip".parse::<ImportStrategy>().unwrap(), ImportStrategy::Skip);
        assert!("--force".parse::<ImportStrategy>().is_err());
    }

    #[test]
    fn merge_same_location_is_dropped() {
        let mut doc = AliasDocument::new("s", vec![AliasEntry::new("a", "/x")]);
        let st = apply_import(&mut doc, &[AliasEntry::new("a", "/x")], ImportStrategy::Merge).unwrap();
        assert_eq!(st, ImportStats::default());
        assert_eq!(doc.entries().len(), 1);
    }

    #[test]
    fn merge_twice_does_not_duplicate_derived() {
        let mut doc = AliasDocument::new("s", vec![AliasEntry::new("a", "/x")]);
        let inc = [AliasEntry::new("a", "/y")];
        let st1 = apply_import(&mut doc, &inc, ImportStrategy::Merge).unwrap();
        let st2 = apply_import(&mut doc, &inc, ImportStrategy::Merge).unwrap();
        assert_eq!(st1.merged, 1);
        assert_eq!(st2.merged, 0);
        assert_eq!(doc.entries().len(), 2);
        assert_eq!(doc.entries()[1], AliasEntry::new("a_imported", "/y"));
    }

    #[test]
    fn merge_keeps_derived_alias_unique() {
        let mut doc = AliasDocument::new(
            "s",
            vec![AliasEntry::new("a", "/x"), AliasEntry::new("a_imported", "/old")],
        );
        let st = apply_import(&mut doc, &[AliasEntry::new("a", "/y")], ImportStrategy::Merge).unwrap();
        assert_eq!(st, ImportStats { skipped: 1, ..ImportStats::default() });
        let derived: Vec<_> = doc.entries().iter().filter(|e| e.alias == "a_imported").collect();
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].location, "/old");
    }
}
