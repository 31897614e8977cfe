pub mod config;
pub mod engine;
pub mod error;
pub mod naming;
pub mod platform;
pub mod progress;
pub mod scanner;
pub mod scheduler;
pub mod storage;

pub use crate::config::AppConfig;
pub use crate::engine::{EntryOutcome, RenameEngine, ScanOutcome, SkipReason};
pub use crate::error::Error;
pub use crate::progress::{ScanReporter, SilentReporter};
pub use crate::scheduler::{RunSummary, Scheduler, SchedulerStatus, StatusHandle};
pub use crate::storage::AuditStore;
