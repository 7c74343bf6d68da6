//! Alias store ("quick paths"): alias -> filesystem path, persisted as an XML document.
//!
//! Раскладка:
//! - document.rs - формат документа (parse/render/load/save)
//! - open.rs     - initialize (создание документа с seed-алиасами)
//! - kv.rs       - add / remove / list / resolve
//! - backup.rs   - копия рядом с живым файлом + восстановление
//! - import.rs   - импорт с политикой Merge | Replace | Skip
//!
//! Каждая операция: чтение + валидация документа -> изменение в памяти -> запись целиком.
//! Конкурентные писатели не поддерживаются (последний выигрывает).

pub mod backup;
pub mod document;
pub mod import;
pub mod kv;
pub mod open;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::metrics::record_store_save;

pub use document::{AliasDocument, AliasEntry, Configuration};
pub use import::{ImportStats, ImportStrategy};

/// Handle to one alias document. Cheap to clone; holds no open file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasStore {
    path: PathBuf,
}

impl AliasStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the live document.
    pub fn load(&self) -> Result<AliasDocument> {
        AliasDocument::load(&self.path)
    }

    /// Refresh LastUpdated and replace the live document.
    pub(crate) fn save(&self, doc: &mut AliasDocument) -> Result<()> {
        doc.touch();
        doc.save(&self.path)?;
        record_store_save();
        Ok(())
    }
}
