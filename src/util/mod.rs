//! util - общие утилиты (время, пути, имена процессов).
//!
//! Содержит:
//! - now_stamp() / stamp_of(): формат `yyyy-MM-dd HH:mm:ss` (лог монитора, LastUpdated).
//! - backup_stamp(): компактная метка для имён резервных копий.
//! - absolutize(): абсолютный путь без `\\?\` префикса.
//! - process_name_matches(): сравнение имени процесса с denylist.

use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};

/// Формат отметок времени в логе и в документе алиасов.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Текущее локальное время в формате STAMP_FORMAT.
pub fn now_stamp() -> String {
    stamp_of(&Local::now())
}

pub fn stamp_of<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format(STAMP_FORMAT).to_string()
}

/// Метка для имени файла бэкапа (с миллисекундами, чтобы два бэкапа подряд не совпали).
pub fn backup_stamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S_%3f").to_string()
}

/// Absolute form of `p` (relative paths are joined to the cwd). Falls back to `p` as is.
pub fn absolutize(p: &Path) -> PathBuf {
    std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf())
}

/// True if `name` equals `pattern` case-insensitively, ignoring a trailing ".exe" on either.
pub fn process_name_matches(name: &str, pattern: &str) -> bool {
    fn strip(s: &str) -> &str {
        let s = s.trim();
        match s.len().checked_sub(4).and_then(|i| s.get(i..).map(|tail| (i, tail))) {
            Some((i, tail)) if i > 0 && tail.eq_ignore_ascii_case(".exe") => &s[..i],
            _ => s,
        }
    }
    strip(name).eq_ignore_ascii_case(strip(pattern))
}
