use crate::config::AppConfig;
use crate::error::Error;
use crate::naming;
use crate::platform;
use crate::progress::ScanReporter;
use crate::scanner::{self, ScanEntry};
use crate::storage::{AuditStore, FileDetails, RenameRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const SQLITE_SIDE_SUFFIXES: [&str; 4] = ["", "-wal", "-shm", "-journal"];

/// Renames files under one root to identifier names and logs every attempt.
///
/// Entries are handled one at a time in walk order. The audit store is the
/// only memory between scans, so running the engine again over the same
/// tree skips everything it already logged.
pub struct RenameEngine {
    store: Arc<AuditStore>,
    root: PathBuf,
    recursive: bool,
    dry_run: bool,
    excluded_name: Option<String>,
}

/// Totals for one scan. `failed` entries are in the audit log but are
/// neither renamed nor skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The audit store's own file or one of its SQLite side files.
    Excluded,
    AlreadyIdentifier,
    AlreadySeen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Renamed { new_name: String },
    Skipped(SkipReason),
    Failed { reason: String },
}

impl RenameEngine {
    pub fn new(store: Arc<AuditStore>, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            root: root.into(),
            recursive: true,
            dry_run: false,
            excluded_name: None,
        }
    }

    pub fn from_config(config: &AppConfig, store: Arc<AuditStore>) -> Self {
        Self::new(store, config.watched_path())
            .recursive(config.recursive)
            .dry_run(config.dry_run)
            .with_excluded_name(config.excluded_name())
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_excluded_name(mut self, name: Option<String>) -> Self {
        self.excluded_name = name;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run one pass over the root. Only failing to list the root itself is
    /// an error; everything per-file ends up in the audit store instead.
    pub fn scan(&self, reporter: &dyn ScanReporter) -> Result<ScanOutcome, Error> {
        info!("Scanning directory: {}", self.root.display());
        if self.dry_run {
            info!("DRY RUN MODE - no files will be renamed");
        }

        let start = Instant::now();
        reporter.on_scan_start(&self.root);

        let files: Vec<ScanEntry> = scanner::collect_entries(&self.root, self.recursive)?
            .into_iter()
            .filter(|entry| !entry.is_directory)
            .collect();
        debug!("Found {} files to process", files.len());
        reporter.on_entries_found(files.len());

        let root_label = self.root.to_string_lossy().into_owned();
        let mut outcome = ScanOutcome::default();

        for entry in &files {
            let result = self.process_entry(entry, &root_label);
            match &result {
                EntryOutcome::Renamed { .. } => outcome.renamed += 1,
                EntryOutcome::Skipped(_) => outcome.skipped += 1,
                EntryOutcome::Failed { .. } => outcome.failed += 1,
            }
            reporter.on_entry(&entry.name, &result);
        }

        if self.dry_run {
            info!(
                "Would rename {} files (skipped {}, failed {})",
                outcome.renamed, outcome.skipped, outcome.failed
            );
        } else {
            info!(
                "Renamed {} files (skipped {}, failed {})",
                outcome.renamed, outcome.skipped, outcome.failed
            );
        }

        reporter.on_scan_complete(&outcome, start.elapsed().as_secs_f64());
        Ok(outcome)
    }

    /// The audit store file and the `-wal`/`-shm`/`-journal` files SQLite
    /// keeps beside it.
    fn is_excluded(&self, name: &str) -> bool {
        let Some(excluded) = self.excluded_name.as_deref() else {
            return false;
        };
        match name.strip_prefix(excluded) {
            Some(rest) => SQLITE_SIDE_SUFFIXES.contains(&rest),
            None => false,
        }
    }

    fn skip_reason(&self, name: &str) -> Result<Option<SkipReason>, rusqlite::Error> {
        if self.is_excluded(name) {
            return Ok(Some(SkipReason::Excluded));
        }
        if naming::looks_like_generated(name) {
            return Ok(Some(SkipReason::AlreadyIdentifier));
        }
        if self.store.has_seen(name)? {
            return Ok(Some(SkipReason::AlreadySeen));
        }
        Ok(None)
    }

    fn process_entry(&self, entry: &ScanEntry, root_label: &str) -> EntryOutcome {
        let name = entry.name.as_str();

        match self.skip_reason(name) {
            Ok(Some(reason)) => {
                debug!("Skipping {} ({:?})", name, reason);
                return EntryOutcome::Skipped(reason);
            }
            Ok(None) => {}
            // Nothing is written here: without the lookup we cannot tell
            // whether the name was already handled.
            Err(err) => {
                warn!("Audit lookup failed for {}: {}", name, err);
                return EntryOutcome::Failed {
                    reason: format!("audit lookup failed: {}", err),
                };
            }
        }

        let new_name = naming::generate_name(name);

        let details = match read_details(&entry.full_path) {
            Ok(details) => details,
            Err(err) => {
                let reason = format!("Failed to get file info: {}", err);
                warn!("{}: {}", name, reason);
                let record = RenameRecord::failed(name, &new_name, root_label, None, reason.clone());
                self.record(&record);
                return EntryOutcome::Failed { reason };
            }
        };

        let record = if self.dry_run {
            info!("[dry-run] {} -> {}", name, new_name);
            RenameRecord::succeeded(name, &new_name, root_label, details)
        } else {
            let parent = entry.full_path.parent().unwrap_or(&self.root);
            match fs::rename(&entry.full_path, parent.join(&new_name)) {
                Ok(()) => {
                    info!("{} -> {}", name, new_name);
                    RenameRecord::succeeded(name, &new_name, root_label, details)
                }
                Err(err) => {
                    warn!("Failed to rename {}: {}", name, err);
                    RenameRecord::failed(name, &new_name, root_label, Some(details), err.to_string())
                }
            }
        };

        self.record(&record);

        if record.success {
            EntryOutcome::Renamed { new_name }
        } else {
            EntryOutcome::Failed {
                reason: record.error_msg.unwrap_or_default(),
            }
        }
    }

    /// Best effort: a failed insert is logged and the scan carries on.
    fn record(&self, record: &RenameRecord) {
        if let Err(err) = self.store.insert(record) {
            error!(
                "Failed to record rename attempt for {}: {}",
                record.original_name, err
            );
        }
    }
}

fn read_details(path: &Path) -> io::Result<FileDetails> {
    let metadata = fs::metadata(path)?;
    Ok(FileDetails {
        size: metadata.len() as i64,
        mode: platform::mode_string(&metadata),
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(excluded: Option<&str>) -> RenameEngine {
        let store = Arc::new(AuditStore::open_in_memory().unwrap());
        RenameEngine::new(store, "/inbox").with_excluded_name(excluded.map(str::to_string))
    }

    #[test]
    fn test_excludes_store_and_side_files() {
        let engine = engine(Some("file_renames.db"));
        assert!(engine.is_excluded("file_renames.db"));
        assert!(engine.is_excluded("file_renames.db-wal"));
        assert!(engine.is_excluded("file_renames.db-shm"));
        assert!(engine.is_excluded("file_renames.db-journal"));
        assert!(!engine.is_excluded("file_renames.db.bak"));
        assert!(!engine.is_excluded("file_renames"));
        assert!(!engine.is_excluded("other.db"));
    }

    #[test]
    fn test_nothing_excluded_without_name() {
        let engine = engine(None);
        assert!(!engine.is_excluded("file_renames.db"));
        assert!(!engine.is_excluded(""));
    }

    #[test]
    fn test_skip_reason_order() {
        let engine = engine(Some("123e4567-e89b-12d3-a456-426614174000.db"));
        assert_eq!(
            engine
                .skip_reason("123e4567-e89b-12d3-a456-426614174000.db")
                .unwrap(),
            Some(SkipReason::Excluded)
        );
        assert_eq!(
            engine
                .skip_reason("123e4567-e89b-12d3-a456-426614174000.txt")
                .unwrap(),
            Some(SkipReason::AlreadyIdentifier)
        );
        assert_eq!(engine.skip_reason("fresh.txt").unwrap(), None);
    }
}
