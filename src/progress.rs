use crate::engine::{EntryOutcome, ScanOutcome};
use std::path::Path;

/// Trait for reporting scan progress.
///
/// The CLI implements it with an indicatif bar; scheduled runs stay silent.
/// All methods have default no-op implementations.
pub trait ScanReporter: Send + Sync {
    fn on_scan_start(&self, _root: &Path) {}
    fn on_entries_found(&self, _count: usize) {}
    fn on_entry(&self, _name: &str, _outcome: &EntryOutcome) {}
    fn on_scan_complete(&self, _outcome: &ScanOutcome, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ScanReporter for SilentReporter {}
