//! Snapshot sources: running processes (sysinfo) and installed software (registry).
//!
//! Источники спрятаны за трейтами, чтобы цикл монитора тестировался на фейках.

use chrono::{Local, TimeZone};
use log::debug;
use sysinfo::System;

use crate::error::Result;
use crate::inventory;
use crate::util::process_name_matches;

use super::record::{ProcessRecord, SoftwareRecord};
use super::snapshot::Snapshot;

pub trait ProcessSource {
    fn capture_processes(&mut self) -> Result<Snapshot<ProcessRecord>>;
}

pub trait SoftwareSource {
    fn capture_software(&mut self) -> Result<Snapshot<SoftwareRecord>>;
}

/// Live process table via sysinfo, minus the denylist.
pub struct SystemProcessSource {
    sys: System,
    denylist: Vec<String>,
}

impl SystemProcessSource {
    pub fn new(denylist: Vec<String>) -> Self {
        Self {
            sys: System::new(),
            denylist,
        }
    }

    fn is_denied(&self, name: &str) -> bool {
        self.denylist.iter().any(|d| process_name_matches(name, d))
    }
}

impl ProcessSource for SystemProcessSource {
    fn capture_processes(&mut self) -> Result<Snapshot<ProcessRecord>> {
        self.sys.refresh_processes();

        let mut out = Vec::with_capacity(self.sys.processes().len());
        for (pid, p) in self.sys.processes() {
            let name = p.name();
            // Процессы без имени (нет доступа / уже завершились) пропускаем молча.
            if name.is_empty() || self.is_denied(name) {
                continue;
            }
            let start_time = match Local.timestamp_opt(p.start_time() as i64, 0).single() {
                Some(t) => t,
                None => {
                    debug!("capture: pid {} has no usable start time, skipped", pid);
                    continue;
                }
            };
            out.push(ProcessRecord {
                id: pid.as_u32(),
                name: name.to_string(),
                executable_path: p.exe().map(|e| e.display().to_string()),
                start_time,
            });
        }
        out.sort_by_key(|r| r.id);
        debug!("capture: {} process(es)", out.len());
        Ok(Snapshot::new(out))
    }
}

/// Uninstall keys of both registry views (native, then WOW64).
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistrySoftwareSource;

impl SoftwareSource for RegistrySoftwareSource {
    fn capture_software(&mut self) -> Result<Snapshot<SoftwareRecord>> {
        let records = inventory::registry::scan_installed()?;
        debug!("capture: {} software entr(y/ies)", records.len());
        Ok(Snapshot::new(records))
    }
}
