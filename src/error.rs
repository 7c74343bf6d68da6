//! Error type shared by the library modules.
//!
//! Таксономия:
//! - Validation      - битый документ / пустой alias / невалидный ввод
//! - NotFound        - неизвестный alias, отсутствующий файл
//! - Io              - ошибки файловой системы (backup, save, log)
//! - ExternalProcess - ненулевой код выхода дочернего процесса
//! - Timeout         - процесс не уложился в бюджет ожидания (убит)
//! - Usage           - неверные аргументы команды
//!
//! Binaries wrap these into anyhow at the top level.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WinDeckError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}")]
    ExternalProcess { program: String, code: i32 },

    #[error("{program} did not finish within {secs}s and was terminated")]
    Timeout { program: String, secs: u64 },

    #[error("usage: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, WinDeckError>;

impl WinDeckError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        WinDeckError::Io {
            context: context.into(),
            source,
        }
    }

    /// Io error about a concrete path; missing files become NotFound.
    pub fn io_at(op: &str, path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            WinDeckError::NotFound(format!("{} ({} failed)", path.display(), op))
        } else {
            WinDeckError::io(format!("{} {}", op, path.display()), source)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WinDeckError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, WinDeckError::Validation(_))
    }
}
