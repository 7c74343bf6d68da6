//! Snapshot of one record kind and the diff between two snapshots.

use chrono::{DateTime, Local};
use std::collections::HashSet;

use super::record::Record;

/// Immutable ordered collection of records captured at one instant.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    taken_at: DateTime<Local>,
    records: Vec<T>,
}

impl<T: Record> Snapshot<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self::taken_at(Local::now(), records)
    }

    pub fn taken_at(taken_at: DateTime<Local>, records: Vec<T>) -> Self {
        Self { taken_at, records }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn time(&self) -> DateTime<Local> {
        self.taken_at
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn keys(&self) -> HashSet<T::Key> {
        self.records.iter().map(Record::key).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Diff<T> {
    /// In current snapshot order.
    pub added: Vec<T>,
    /// In previous snapshot order.
    pub removed: Vec<T>,
}

impl<T> Diff<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Set difference by identity key.
///
/// Дубликаты ключа внутри одного снапшота (одинаковый DisplayName) не схлопываются:
/// каждая запись с ключом, отсутствующим в другом снапшоте, попадает в вывод.
pub fn diff<T: Record>(previous: &Snapshot<T>, current: &Snapshot<T>) -> Diff<T> {
    let prev_keys = previous.keys();
    let cur_keys = current.keys();

    let added = current
        .records
        .iter()
        .filter(|r| !prev_keys.contains(&r.key()))
        .cloned()
        .collect();
    let removed = previous
        .records
        .iter()
        .filter(|r| !cur_keys.contains(&r.key()))
        .cloned()
        .collect();

    Diff { added, removed }
}
