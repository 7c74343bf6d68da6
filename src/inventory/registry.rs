//! Registry enumeration of installed software.
//!
//! Порядок: сначала нативное представление (64-bit), затем WOW6432Node (32-bit).
//! Нечитаемые подключи пропускаются; отсутствие ветки целиком - только warning.

use crate::error::Result;
use crate::monitor::record::SoftwareRecord;

pub const NATIVE_UNINSTALL_KEY: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";
pub const WOW64_UNINSTALL_KEY: &str =
    r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall";

#[cfg(windows)]
pub fn scan_installed() -> Result<Vec<SoftwareRecord>> {
    use crate::monitor::record::Architecture;

    let mut out = Vec::new();
    out.extend(win::scan_view(NATIVE_UNINSTALL_KEY, Architecture::Bit64)?);
    out.extend(win::scan_view(WOW64_UNINSTALL_KEY, Architecture::Bit32)?);
    Ok(out)
}

/// Not Windows: there is no uninstall registry, the inventory is empty.
#[cfg(not(windows))]
pub fn scan_installed() -> Result<Vec<SoftwareRecord>> {
    log::debug!("inventory: registry scan skipped (not Windows)");
    Ok(Vec::new())
}

#[cfg(windows)]
mod win {
    use log::{debug, warn};
    use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_64KEY};
    use winreg::RegKey;

    use crate::error::Result;
    use crate::inventory::{record_from_entry, RawUninstallEntry};
    use crate::monitor::record::{Architecture, SoftwareRecord};

    fn read_entry(key: &RegKey) -> RawUninstallEntry {
        RawUninstallEntry {
            display_name: key.get_value::<String, _>("DisplayName").ok(),
            display_version: key.get_value::<String, _>("DisplayVersion").ok(),
            publisher: key.get_value::<String, _>("Publisher").ok(),
            uninstall_string: key.get_value::<String, _>("UninstallString").ok(),
        }
    }

    pub(super) fn scan_view(path: &str, arch: Architecture) -> Result<Vec<SoftwareRecord>> {
        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        let flags = match arch {
            Architecture::Bit64 => KEY_READ | KEY_WOW64_64KEY,
            Architecture::Bit32 => KEY_READ,
        };
        let root = match hklm.open_subkey_with_flags(path, flags) {
            Ok(k) => k,
            Err(e) => {
                // На 32-битной Windows ветки WOW6432Node нет - это не ошибка.
                warn!("inventory: cannot open HKLM\\{}: {}", path, e);
                return Ok(Vec::new());
            }
        };

        let mut out = Vec::new();
        for name in root.enum_keys().filter_map(|r| r.ok()) {
            let sub = match root.open_subkey_with_flags(&name, flags) {
                Ok(k) => k,
                Err(e) => {
                    debug!("inventory: skip {}\\{}: {}", path, name, e);
                    continue;
                }
            };
            if let Some(rec) = record_from_entry(&read_entry(&sub), arch) {
                out.push(rec);
            }
        }
        debug!("inventory: {} entr(y/ies) under HKLM\\{}", out.len(), path);
        Ok(out)
    }
}
