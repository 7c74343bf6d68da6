//! Uninstall of registry entries with a wait budget.
//!
//! - MSI-продукт (msiexec в UninstallString + найден {GUID}) -> `msiexec /x {GUID} /qn /norestart`
//! - иначе -> зарегистрированная команда через `cmd /C`
//!
//! Exit codes 0 / 1641 / 3010 count as success (3010/1641 = reboot required/initiated).
//! Сбой одного элемента не прерывает пакет.

use log::{info, warn};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, WinDeckError};
use crate::metrics::{record_uninstall_attempt, record_uninstall_failure};
use crate::monitor::record::SoftwareRecord;

const POLL_STEP: Duration = Duration::from_millis(100);

pub const SUCCESS_EXIT_CODES: &[i32] = &[0, 1641, 3010];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallPlan {
    pub program: String,
    pub args: Vec<String>,
}

impl UninstallPlan {
    pub fn for_record(r: &SoftwareRecord) -> Self {
        let is_msi = r.uninstall_command.to_ascii_lowercase().contains("msiexec");
        match (&r.product_guid, is_msi) {
            (Some(guid), true) => Self {
                program: "msiexec.exe".to_string(),
                args: vec![
                    "/x".to_string(),
                    guid.clone(),
                    "/qn".to_string(),
                    "/norestart".to_string(),
                ],
            },
            _ => Self {
                program: "cmd.exe".to_string(),
                args: vec!["/C".to_string(), r.uninstall_command.clone()],
            },
        }
    }

    pub fn command_line(&self) -> String {
        let mut s = self.program.clone();
        for a in &self.args {
            s.push(' ');
            s.push_str(a);
        }
        s
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// Spawn `cmd` and wait at most `timeout`; on overrun the child is killed.
pub fn run_with_timeout(cmd: &mut Command, label: &str, timeout: Duration) -> Result<i32> {
    let mut child = cmd
        .stdin(Stdio::null())
        .spawn()
        .map_err(|e| WinDeckError::io(format!("spawn {}", label), e))?;

    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let code = status.code().unwrap_or(-1);
                return if SUCCESS_EXIT_CODES.contains(&code) {
                    Ok(code)
                } else {
                    Err(WinDeckError::ExternalProcess {
                        program: label.to_string(),
                        code,
                    })
                };
            }
            Ok(None) => {}
            Err(e) => return Err(WinDeckError::io(format!("wait {}", label), e)),
        }

        if started.elapsed() >= timeout {
            // Принудительно завершаем; ошибки kill/wait уже ничего не меняют.
            let _ = child.kill();
            let _ = child.wait();
            return Err(WinDeckError::Timeout {
                program: label.to_string(),
                secs: timeout.as_secs(),
            });
        }
        thread::sleep(POLL_STEP);
    }
}

#[derive(Debug)]
pub struct UninstallOutcome {
    pub display_name: String,
    pub command_line: String,
    pub executed: bool,
    pub result: Result<i32>,
}

impl UninstallOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Uninstall every record in order; failures are collected, not propagated.
pub fn uninstall_batch(
    records: &[&SoftwareRecord],
    timeout: Duration,
    dry_run: bool,
) -> Vec<UninstallOutcome> {
    let mut out = Vec::with_capacity(records.len());
    for r in records {
        let plan = UninstallPlan::for_record(r);
        let command_line = plan.command_line();

        if dry_run {
            out.push(UninstallOutcome {
                display_name: r.display_name.clone(),
                command_line,
                executed: false,
                result: Ok(0),
            });
            continue;
        }

        record_uninstall_attempt();
        info!("uninstall: {} -> {}", r.display_name, command_line);
        let result = run_with_timeout(&mut plan.to_command(), &plan.program, timeout);
        if let Err(e) = &result {
            record_uninstall_failure();
            warn!("uninstall: {} failed: {}", r.display_name, e);
        }
        out.push(UninstallOutcome {
            display_name: r.display_name.clone(),
            command_line,
            executed: true,
            result,
        });
    }
    out
}
