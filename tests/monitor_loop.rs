// tests/monitor_loop.rs
//
// Цикл монитора на фейковых источниках:
// 1) {A,B} -> {B,C}: removed(A), added(C), формат блоков в логе.
// 2) Пустой diff ничего не пишет.
// 3) Сбой записи в лог не останавливает цикл.
// 4) run() останавливается по CancelToken из другого потока.
// 5) initialize() с недоступным логом - ошибка, состояние Stopped.

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use chrono::{Local, TimeZone};

use WinDeck::monitor::report::{HEADER_PREFIX, RULE};
use WinDeck::monitor::{
    Architecture, CancelToken, Monitor, MonitorOptions, MonitorState, ProcessRecord,
    ProcessSource, Record, Snapshot, SoftwareRecord, SoftwareSource,
};
use WinDeck::WinDeckError;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("wdtest-monitor-{prefix}-{pid}-{t}-{id}"))
}

fn proc(id: u32, name: &str) -> ProcessRecord {
    ProcessRecord {
        id,
        name: name.to_string(),
        executable_path: Some(format!("/opt/{name}")),
        start_time: Local
            .with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
            .single()
            .unwrap_or_else(Local::now),
    }
}

fn app(name: &str) -> SoftwareRecord {
    SoftwareRecord {
        display_name: name.to_string(),
        version: Some("20240131".to_string()),
        architecture: Architecture::Bit64,
        product_guid: Some("{1234-ABCD}".to_string()),
        publisher: None,
        uninstall_command: "MsiExec.exe /X{1234-ABCD}".to_string(),
    }
}

/// Отдаёт заготовленные снапшоты по очереди; последний повторяется.
struct Scripted<T> {
    queue: VecDeque<Vec<T>>,
    last: Vec<T>,
}

impl<T: Record> Scripted<T> {
    fn new(steps: Vec<Vec<T>>) -> Self {
        Self { queue: steps.into(), last: Vec::new() }
    }

    fn next(&mut self) -> Snapshot<T> {
        if let Some(s) = self.queue.pop_front() {
            self.last = s;
        }
        Snapshot::new(self.last.clone())
    }
}

impl ProcessSource for Scripted<ProcessRecord> {
    fn capture_processes(&mut self) -> WinDeck::Result<Snapshot<ProcessRecord>> {
        Ok(self.next())
    }
}

impl SoftwareSource for Scripted<SoftwareRecord> {
    fn capture_software(&mut self) -> WinDeck::Result<Snapshot<SoftwareRecord>> {
        Ok(self.next())
    }
}

/// Источник софта, который всегда падает.
struct Broken;

/// Первый снимок удачный, дальше - ошибки.
struct Flaky {
    calls: u32,
}

impl SoftwareSource for Flaky {
    fn capture_software(&mut self) -> WinDeck::Result<Snapshot<SoftwareRecord>> {
        self.calls += 1;
        if self.calls == 1 {
            Ok(Snapshot::new(vec![app("Tool")]))
        } else {
            Err(WinDeckError::Validation("registry unavailable".into()))
        }
    }
}

impl SoftwareSource for Broken {
    fn capture_software(&mut self) -> WinDeck::Result<Snapshot<SoftwareRecord>> {
        Err(WinDeckError::Validation("registry unavailable".into()))
    }
}

fn opts(log: PathBuf) -> MonitorOptions {
    MonitorOptions::new(log, Duration::from_millis(20))
}

#[test]
fn process_churn_is_reported() -> Result<()> {
    let root = unique_root("churn");
    let log = root.join("logs").join("monitor.log");

    let procs = Scripted::new(vec![
        vec![proc(1, "alpha"), proc(2, "beta")],
        vec![proc(2, "beta"), proc(3, "gamma")],
    ]);
    let soft = Scripted::new(vec![vec![app("Tool")]]);
    let mut m = Monitor::new(opts(log.clone()), procs, soft, Vec::<u8>::new());

    m.initialize()?;
    assert_eq!(m.state(), MonitorState::Running);
    let header = fs::read_to_string(&log)?;
    assert!(header.starts_with(HEADER_PREFIX), "{header}");
    assert_eq!(header.lines().count(), 1, "baseline must not produce events");

    let rep = m.poll_once()?;
    let pd = rep.processes.as_ref().expect("process diff");
    assert_eq!(pd.added.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3]);
    assert_eq!(pd.removed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
    assert!(rep.software.as_ref().expect("software diff").is_empty());
    assert_eq!(rep.event_count(), 2);

    let text = fs::read_to_string(&log)?;
    assert!(text.contains("-------Process-------"));
    assert!(text.contains("] Process Started\n  Name: gamma\n  PID: 3\n"), "{text}");
    assert!(text.contains("] Process Stopped\n  Name: alpha\n  PID: 1\n"), "{text}");
    assert!(text.contains("  Start Time: 2024-03-01 09:30:00\n"));
    assert!(text.lines().filter(|l| *l == RULE).count() >= 6);

    // Консоль получает те же блоки
    let console = String::from_utf8(m.reporter().console().clone())?;
    assert!(console.contains("Name: gamma"));
    assert!(!console.contains(HEADER_PREFIX));

    assert_eq!(m.summary().processes_started, 1);
    assert_eq!(m.summary().processes_stopped, 1);
    Ok(())
}

#[test]
fn software_install_and_removal() -> Result<()> {
    let root = unique_root("software");
    let log = root.join("monitor.log");

    let procs = Scripted::new(vec![vec![proc(1, "alpha")]]);
    let soft = Scripted::new(vec![vec![app("Old")], vec![app("New")]]);
    let mut m = Monitor::new(opts(log.clone()), procs, soft, std::io::sink());
    m.initialize()?;
    m.poll_once()?;

    let text = fs::read_to_string(&log)?;
    assert!(text.contains("-------Software-------"));
    assert!(text.contains("] Software Installed\n  Name: New\n  Version: 2024-01-31\n"), "{text}");
    assert!(text.contains("] Software Uninstalled\n  Name: Old\n"), "{text}");
    assert!(text.contains("  Architecture: 64-bit\n"));
    assert!(text.contains("  Product GUID: {1234-ABCD}\n"));
    assert!(text.contains("  Publisher: Unknown\n"));
    Ok(())
}

#[test]
fn unchanged_snapshots_write_nothing() -> Result<()> {
    let root = unique_root("quiet");
    let log = root.join("monitor.log");
    let procs = Scripted::new(vec![vec![proc(1, "alpha")]]);
    let soft = Scripted::new(vec![vec![app("Tool")]]);
    let mut m = Monitor::new(opts(log.clone()), procs, soft, Vec::<u8>::new());
    m.initialize()?;
    let before = fs::read(&log)?;

    for _ in 0..3 {
        assert_eq!(m.poll_once()?.event_count(), 0);
    }
    assert_eq!(before, fs::read(&log)?);
    assert!(m.reporter().console().is_empty());
    assert_eq!(m.summary().polls, 3);
    Ok(())
}

#[test]
fn log_write_failure_is_not_fatal() -> Result<()> {
    let root = unique_root("logfail");
    let log = root.join("monitor.log");
    let procs = Scripted::new(vec![vec![proc(1, "alpha")], vec![proc(2, "beta")]]);
    let soft = Scripted::new(vec![vec![]]);
    let mut m = Monitor::new(opts(log.clone()), procs, soft, Vec::<u8>::new());
    m.initialize()?;

    // Лог-файл подменяем директорией: append будет падать
    fs::remove_file(&log)?;
    fs::create_dir_all(&log)?;

    let rep = m.poll_once()?;
    assert_eq!(rep.event_count(), 2);
    assert_eq!(m.state(), MonitorState::Running);
    assert_eq!(m.summary().log_write_failures, 2);
    let console = String::from_utf8(m.reporter().console().clone())?;
    assert!(console.contains("Name: beta"), "console still receives events");
    Ok(())
}

#[test]
fn capture_failure_keeps_running() -> Result<()> {
    let root = unique_root("capfail");
    let procs = Scripted::new(vec![vec![proc(1, "alpha")], vec![proc(2, "beta")]]);
    let mut m = Monitor::new(opts(root.join("monitor.log")), procs, Flaky { calls: 0 }, std::io::sink());
    m.initialize()?;

    let rep = m.poll_once()?;
    assert!(rep.software.is_none(), "failed capture yields no software diff");
    assert_eq!(rep.processes.map(|d| d.added.len()), Some(1));
    assert_eq!(m.state(), MonitorState::Running);
    assert_eq!(m.summary().capture_failures, 1);
    Ok(())
}

#[test]
fn baseline_capture_failure_is_fatal() -> Result<()> {
    let root = unique_root("basefail");
    let procs = Scripted::new(vec![vec![proc(1, "alpha")]]);
    let mut m = Monitor::new(opts(root.join("monitor.log")), procs, Broken, std::io::sink());

    // Базовый снимок софта не удался -> initialize падает
    let err = m.initialize().unwrap_err();
    assert!(err.is_validation(), "got {err:?}");
    assert_eq!(m.state(), MonitorState::Stopped);
    assert!(m.poll_once().is_err());
    Ok(())
}

#[test]
fn initialize_fails_on_unwritable_log() -> Result<()> {
    let root = unique_root("unwritable");
    fs::create_dir_all(&root)?;
    // Родитель лога - обычный файл
    let blocker = root.join("blocker");
    fs::write(&blocker, b"x")?;

    let procs = Scripted::new(vec![vec![proc(1, "alpha")]]);
    let soft = Scripted::new(vec![vec![]]);
    let mut m = Monitor::new(
        opts(blocker.join("monitor.log")),
        procs,
        soft,
        std::io::sink(),
    );
    assert!(m.initialize().is_err());
    assert_eq!(m.state(), MonitorState::Stopped);
    Ok(())
}

#[test]
fn run_stops_on_cancel() -> Result<()> {
    let root = unique_root("cancel");
    let procs = Scripted::new(vec![vec![proc(1, "alpha")], vec![proc(1, "alpha"), proc(2, "beta")]]);
    let soft = Scripted::new(vec![vec![app("Tool")]]);
    let mut m = Monitor::new(opts(root.join("monitor.log")), procs, soft, std::io::sink());

    let cancel = CancelToken::new();
    let stopper = {
        let c = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            c.cancel();
        })
    };

    let t0 = Instant::now();
    let summary = m.run(&cancel)?;
    stopper.join().expect("stopper thread");

    assert!(t0.elapsed() < Duration::from_secs(5));
    assert_eq!(m.state(), MonitorState::Stopped);
    assert!(summary.polls >= 1, "polls = {}", summary.polls);
    assert_eq!(summary.processes_started, 1);
    assert!(summary.started_at.is_some() && summary.stopped_at.is_some());
    Ok(())
}
