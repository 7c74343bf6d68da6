//! Snapshot-diff monitor for running processes and installed software.

pub mod capture;
pub mod record;
pub mod report;
pub mod runner;
pub mod snapshot;

pub use capture::{ProcessSource, RegistrySoftwareSource, SoftwareSource, SystemProcessSource};
pub use record::{Architecture, Category, ChangeKind, ProcessRecord, Record, SoftwareRecord};
pub use report::{format_event, Reporter};
pub use runner::{CancelToken, Monitor, MonitorOptions, MonitorState, MonitorSummary, PollReport};
pub use snapshot::{diff, Diff, Snapshot};
