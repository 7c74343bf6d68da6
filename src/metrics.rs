//! Lightweight global metrics for WinDeck.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Monitor (polls, events, log write failures, capture failures)
//! - Alias store (saves, backups, imports, restores)
//! - Inventory (uninstall attempts/failures)

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Monitor -----
static MONITOR_POLLS: AtomicU64 = AtomicU64::new(0);
static MONITOR_PROCESS_EVENTS: AtomicU64 = AtomicU64::new(0);
static MONITOR_SOFTWARE_EVENTS: AtomicU64 = AtomicU64::new(0);
static MONITOR_LOG_WRITE_FAILURES: AtomicU64 = AtomicU64::new(0);
static MONITOR_CAPTURE_FAILURES: AtomicU64 = AtomicU64::new(0);

// ----- Alias store -----
static STORE_SAVES: AtomicU64 = AtomicU64::new(0);
static STORE_BACKUPS: AtomicU64 = AtomicU64::new(0);
static STORE_IMPORTS: AtomicU64 = AtomicU64::new(0);
static STORE_RESTORES: AtomicU64 = AtomicU64::new(0);

// ----- Inventory -----
static UNINSTALL_ATTEMPTS: AtomicU64 = AtomicU64::new(0);
static UNINSTALL_FAILURES: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    // Monitor
    pub monitor_polls: u64,
    pub monitor_process_events: u64,
    pub monitor_software_events: u64,
    pub monitor_log_write_failures: u64,
    pub monitor_capture_failures: u64,

    // Alias store
    pub store_saves: u64,
    pub store_backups: u64,
    pub store_imports: u64,
    pub store_restores: u64,

    // Inventory
    pub uninstall_attempts: u64,
    pub uninstall_failures: u64,
}

impl MetricsSnapshot {
    pub fn monitor_events_total(&self) -> u64 {
        self.monitor_process_events + self.monitor_software_events
    }
}

// ----- Recorders (Monitor) -----
pub fn record_monitor_poll() {
    MONITOR_POLLS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_process_event() {
    MONITOR_PROCESS_EVENTS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_software_event() {
    MONITOR_SOFTWARE_EVENTS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_log_write_failure() {
    MONITOR_LOG_WRITE_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_capture_failure() {
    MONITOR_CAPTURE_FAILURES.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Alias store) -----
pub fn record_store_save() {
    STORE_SAVES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_store_backup() {
    STORE_BACKUPS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_store_import() {
    STORE_IMPORTS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_store_restore() {
    STORE_RESTORES.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Inventory) -----
pub fn record_uninstall_attempt() {
    UNINSTALL_ATTEMPTS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_uninstall_failure() {
    UNINSTALL_FAILURES.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        monitor_polls: MONITOR_POLLS.load(Ordering::Relaxed),
        monitor_process_events: MONITOR_PROCESS_EVENTS.load(Ordering::Relaxed),
        monitor_software_events: MONITOR_SOFTWARE_EVENTS.load(Ordering::Relaxed),
        monitor_log_write_failures: MONITOR_LOG_WRITE_FAILURES.load(Ordering::Relaxed),
        monitor_capture_failures: MONITOR_CAPTURE_FAILURES.load(Ordering::Relaxed),

        store_saves: STORE_SAVES.load(Ordering::Relaxed),
        store_backups: STORE_BACKUPS.load(Ordering::Relaxed),
        store_imports: STORE_IMPORTS.load(Ordering::Relaxed),
        store_restores: STORE_RESTORES.load(Ordering::Relaxed),

        uninstall_attempts: UNINSTALL_ATTEMPTS.load(Ordering::Relaxed),
        uninstall_failures: UNINSTALL_FAILURES.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    MONITOR_POLLS.store(0, Ordering::Relaxed);
    MONITOR_PROCESS_EVENTS.store(0, Ordering::Relaxed);
    MONITOR_SOFTWARE_EVENTS.store(0, Ordering::Relaxed);
    MONITOR_LOG_WRITE_FAILURES.store(0, Ordering::Relaxed);
    MONITOR_CAPTURE_FAILURES.store(0, Ordering::Relaxed);

    STORE_SAVES.store(0, Ordering::Relaxed);
    STORE_BACKUPS.store(0, Ordering::Relaxed);
    STORE_IMPORTS.store(0, Ordering::Relaxed);
    STORE_RESTORES.store(0, Ordering::Relaxed);

    UNINSTALL_ATTEMPTS.store(0, Ordering::Relaxed);
    UNINSTALL_FAILURES.store(0, Ordering::Relaxed);
}
