pub mod status;

pub use status::{RunSummary, SchedulerStatus, RUN_LOG_CAPACITY};

use crate::engine::RenameEngine;
use crate::progress::SilentReporter;
use chrono::Utc;
use std::io;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Read-only access to the scheduler's status for other threads.
#[derive(Clone)]
pub struct StatusHandle {
    inner: Arc<RwLock<SchedulerStatus>>,
}

impl StatusHandle {
    pub fn snapshot(&self) -> SchedulerStatus {
        read_lock(&self.inner).clone()
    }
}

/// Runs the rename engine on a fixed period.
///
/// Runs never overlap: the loop calls the engine inline and only waits for
/// the next deadline once the current run has returned. A run that takes
/// longer than the interval delays the next one instead of stacking up.
pub struct Scheduler {
    engine: Arc<RenameEngine>,
    interval: Duration,
    status: Arc<RwLock<SchedulerStatus>>,
}

impl Scheduler {
    pub fn new(engine: Arc<RenameEngine>, interval: Duration) -> Self {
        let status = SchedulerStatus::new(
            engine.root().to_string_lossy().into_owned(),
            interval.as_secs(),
        );
        Self {
            engine,
            interval,
            status: Arc::new(RwLock::new(status)),
        }
    }

    pub fn status(&self) -> StatusHandle {
        StatusHandle {
            inner: Arc::clone(&self.status),
        }
    }

    /// One tick. Returns `None` without scanning if a run is in progress.
    pub fn run_once(&self) -> Option<RunSummary> {
        let started_at = Utc::now();
        if !write_lock(&self.status).mark_started(started_at) {
            info!(target: "cron", "previous run still in progress, skipping tick");
            return None;
        }

        info!(target: "cron", "running scan of {}", self.engine.root().display());
        let result = self.engine.scan(&SilentReporter);
        let finished_at = Utc::now();

        let (processed, skipped, err) = match result {
            Ok(outcome) => (outcome.renamed, outcome.skipped, None),
            Err(err) => {
                error!(target: "cron", "scan failed: {}", err);
                (0, 0, Some(err.to_string()))
            }
        };

        let summary = write_lock(&self.status).mark_completed(
            started_at,
            finished_at,
            processed,
            skipped,
            err,
        );
        info!(
            target: "cron",
            "run summary: processed={} skipped={} error={}",
            summary.processed,
            summary.skipped,
            if summary.is_error() { summary.error.as_str() } else { "none" }
        );
        Some(summary)
    }

    /// Enable scheduling and spawn the timer thread. The first run happens
    /// one interval from now; the thread lives until the process exits.
    pub fn start(self) -> io::Result<(StatusHandle, JoinHandle<()>)> {
        write_lock(&self.status).mark_enabled(Utc::now());
        let handle = self.status();

        info!(
            target: "cron",
            "scheduler started for {} every {}s",
            self.engine.root().display(),
            self.interval.as_secs()
        );

        let join = thread::Builder::new()
            .name("auto-rename-cron".to_string())
            .spawn(move || self.run_forever())?;

        Ok((handle, join))
    }

    fn run_forever(self) {
        let mut deadline = Instant::now() + self.interval;
        loop {
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            }
            let started = Instant::now();
            self.run_once();
            deadline = started + self.interval;
        }
    }
}

fn read_lock(lock: &RwLock<SchedulerStatus>) -> RwLockReadGuard<'_, SchedulerStatus> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock(lock: &RwLock<SchedulerStatus>) -> RwLockWriteGuard<'_, SchedulerStatus> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
