//! Poll loop: Idle -> Initializing -> Running -> Stopped.
//!
//! Каждая итерация: проверка отмены -> сон poll_interval (нарезкой) -> снимки обоих видов
//! -> diff -> отчёт -> previous = current. Сбой захвата одного вида - warning, для этой
//! итерации previous этого вида остаётся прежним.

use chrono::{DateTime, Local};
use log::{info, warn};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::{Result, WinDeckError};
use crate::metrics::{
    record_capture_failure, record_monitor_poll, record_process_event, record_software_event,
};
use crate::util::stamp_of;

use super::capture::{ProcessSource, SoftwareSource};
use super::record::{Category, ChangeKind, ProcessRecord, Record, SoftwareRecord};
use super::report::Reporter;
use super::snapshot::{diff, Diff, Snapshot};

const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Cooperative stop flag shared between the loop and whoever stops it (Ctrl+C handler, tests).
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Initializing,
    Running,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub log_path: PathBuf,
    pub poll_interval: Duration,
}

impl MonitorOptions {
    pub fn new(log_path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            log_path: log_path.into(),
            poll_interval,
        }
    }
}

/// Per-run counters, printed as the closing summary.
#[derive(Debug, Clone, Default)]
pub struct MonitorSummary {
    pub started_at: Option<DateTime<Local>>,
    pub stopped_at: Option<DateTime<Local>>,
    pub polls: u64,
    pub processes_started: u64,
    pub processes_stopped: u64,
    pub software_installed: u64,
    pub software_removed: u64,
    pub capture_failures: u64,
    pub log_write_failures: u64,
}

impl fmt::Display for MonitorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = |t: &Option<DateTime<Local>>| {
            t.as_ref().map(stamp_of).unwrap_or_else(|| "-".to_string())
        };
        writeln!(f, "Monitoring summary")?;
        writeln!(f, "  started            = {}", at(&self.started_at))?;
        writeln!(f, "  stopped            = {}", at(&self.stopped_at))?;
        writeln!(f, "  polls              = {}", self.polls)?;
        writeln!(f, "  processes started  = {}", self.processes_started)?;
        writeln!(f, "  processes stopped  = {}", self.processes_stopped)?;
        writeln!(f, "  software installed = {}", self.software_installed)?;
        writeln!(f, "  software removed   = {}", self.software_removed)?;
        writeln!(f, "  capture failures   = {}", self.capture_failures)?;
        write!(f, "  log write failures = {}", self.log_write_failures)
    }
}

/// Changes found by one poll.
#[derive(Debug, Clone)]
pub struct PollReport {
    pub processes: Option<Diff<ProcessRecord>>,
    pub software: Option<Diff<SoftwareRecord>>,
}

impl PollReport {
    pub fn event_count(&self) -> usize {
        let p = self
            .processes
            .as_ref()
            .map(|d| d.added.len() + d.removed.len())
            .unwrap_or(0);
        let s = self
            .software
            .as_ref()
            .map(|d| d.added.len() + d.removed.len())
            .unwrap_or(0);
        p + s
    }
}

pub struct Monitor<P, S, W: Write> {
    opts: MonitorOptions,
    processes: P,
    software: S,
    reporter: Reporter<W>,
    prev_processes: Snapshot<ProcessRecord>,
    prev_software: Snapshot<SoftwareRecord>,
    state: MonitorState,
    summary: MonitorSummary,
}

impl<P, S, W> Monitor<P, S, W>
where
    P: ProcessSource,
    S: SoftwareSource,
    W: Write,
{
    pub fn new(opts: MonitorOptions, processes: P, software: S, console: W) -> Self {
        let reporter = Reporter::new(opts.log_path.clone(), console);
        Self {
            opts,
            processes,
            software,
            reporter,
            prev_processes: Snapshot::empty(),
            prev_software: Snapshot::empty(),
            state: MonitorState::Idle,
            summary: MonitorSummary::default(),
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn summary(&self) -> &MonitorSummary {
        &self.summary
    }

    pub fn reporter(&self) -> &Reporter<W> {
        &self.reporter
    }

    /// Create the log file and take the baseline snapshots (no events for the baseline).
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != MonitorState::Idle {
            return Err(WinDeckError::Validation(format!(
                "monitor cannot initialize from state {:?}",
                self.state
            )));
        }
        self.state = MonitorState::Initializing;

        let setup = self.reporter.begin().and_then(|_| {
            let p = self.processes.capture_processes()?;
            let s = self.software.capture_software()?;
            Ok((p, s))
        });
        match setup {
            Ok((p, s)) => {
                info!(
                    "monitor: baseline {} process(es), {} software entr(y/ies)",
                    p.len(),
                    s.len()
                );
                self.prev_processes = p;
                self.prev_software = s;
                self.summary.started_at = Some(Local::now());
                self.state = MonitorState::Running;
                Ok(())
            }
            Err(e) => {
                self.state = MonitorState::Stopped;
                Err(e)
            }
        }
    }

    /// One iteration without the sleep.
    pub fn poll_once(&mut self) -> Result<PollReport> {
        if self.state != MonitorState::Running {
            return Err(WinDeckError::Validation(format!(
                "monitor is not running (state {:?})",
                self.state
            )));
        }
        record_monitor_poll();
        self.summary.polls += 1;

        let processes = match self.processes.capture_processes() {
            Ok(cur) => {
                let d = diff(&self.prev_processes, &cur);
                self.emit(&d);
                self.prev_processes = cur;
                Some(d)
            }
            Err(e) => {
                self.capture_failed("processes", &e);
                None
            }
        };

        let software = match self.software.capture_software() {
            Ok(cur) => {
                let d = diff(&self.prev_software, &cur);
                self.emit(&d);
                self.prev_software = cur;
                Some(d)
            }
            Err(e) => {
                self.capture_failed("software", &e);
                None
            }
        };

        self.summary.log_write_failures = self.reporter.log_failures();
        Ok(PollReport {
            processes,
            software,
        })
    }

    /// Loop until `cancel` fires. Initializes first if still Idle.
    pub fn run(&mut self, cancel: &CancelToken) -> Result<MonitorSummary> {
        if self.state == MonitorState::Idle {
            self.initialize()?;
        }
        info!(
            "monitor: running, poll interval {} ms",
            self.opts.poll_interval.as_millis()
        );

        while !cancel.is_cancelled() {
            if !sleep_unless_cancelled(self.opts.poll_interval, cancel) {
                break;
            }
            self.poll_once()?;
        }

        self.stop();
        Ok(self.summary.clone())
    }

    pub fn stop(&mut self) {
        if self.state != MonitorState::Stopped {
            self.state = MonitorState::Stopped;
            self.summary.stopped_at = Some(Local::now());
            info!("monitor: stopped after {} poll(s)", self.summary.polls);
        }
    }

    fn emit<R: Record>(&mut self, d: &Diff<R>) {
        for r in &d.added {
            self.reporter.report(r, ChangeKind::Added);
            self.count(R::CATEGORY, ChangeKind::Added);
        }
        for r in &d.removed {
            self.reporter.report(r, ChangeKind::Removed);
            self.count(R::CATEGORY, ChangeKind::Removed);
        }
    }

    fn count(&mut self, category: Category, kind: ChangeKind) {
        match (category, kind) {
            (Category::Process, ChangeKind::Added) => self.summary.processes_started += 1,
            (Category::Process, ChangeKind::Removed) => self.summary.processes_stopped += 1,
            (Category::Software, ChangeKind::Added) => self.summary.software_installed += 1,
            (Category::Software, ChangeKind::Removed) => self.summary.software_removed += 1,
        }
        match category {
            Category::Process => record_process_event(),
            Category::Software => record_software_event(),
        }
    }

    fn capture_failed(&mut self, what: &str, e: &WinDeckError) {
        self.summary.capture_failures += 1;
        record_capture_failure();
        warn!("monitor: {} capture failed: {} (keeping previous snapshot)", what, e);
    }
}

/// Sleep `total` in small slices. Returns false if cancelled meanwhile.
fn sleep_unless_cancelled(total: Duration, cancel: &CancelToken) -> bool {
    let mut left = total;
    while !left.is_zero() {
        if cancel.is_cancelled() {
            return false;
        }
        let step = left.min(SLEEP_SLICE);
        thread::sleep(step);
        left = left.saturating_sub(step);
    }
    !cancel.is_cancelled()
}
