use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Number of run summaries kept; the oldest is evicted first.
pub const RUN_LOG_CAPACITY: usize = 100;

/// One finished scheduled run. `error` is empty when the run succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Utc>,
    pub processed: usize,
    pub skipped: usize,
    pub error: String,
}

impl RunSummary {
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Diagnostic view of the scheduler. Lives as long as the process and is
/// never persisted; the audit store stays authoritative.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub enabled: bool,
    pub directory: String,
    pub interval_seconds: u64,
    pub is_running: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub last_completed: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub total_scans: u64,
    pub files_processed: u64,
    pub files_skipped: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub recent_runs: VecDeque<RunSummary>,
}

impl SchedulerStatus {
    pub fn new(directory: impl Into<String>, interval_seconds: u64) -> Self {
        Self {
            enabled: false,
            directory: directory.into(),
            interval_seconds,
            is_running: false,
            last_run: None,
            last_completed: None,
            next_run: None,
            total_scans: 0,
            files_processed: 0,
            files_skipped: 0,
            last_error: None,
            recent_runs: VecDeque::with_capacity(RUN_LOG_CAPACITY),
        }
    }

    fn interval(&self) -> Duration {
        Duration::seconds(self.interval_seconds as i64)
    }

    pub(crate) fn mark_enabled(&mut self, now: DateTime<Utc>) {
        self.enabled = true;
        self.next_run = Some(now + self.interval());
    }

    /// Idle -> Running. Returns false, changing nothing, if a run is
    /// already in progress.
    pub(crate) fn mark_started(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        self.last_run = Some(now);
        self.total_scans += 1;
        true
    }

    /// Running -> Idle. The next run is due one interval after this run's
    /// start, not its end.
    pub(crate) fn mark_completed(
        &mut self,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        processed: usize,
        skipped: usize,
        error: Option<String>,
    ) -> RunSummary {
        self.is_running = false;
        self.last_completed = Some(finished_at);
        self.files_processed += processed as u64;
        self.files_skipped += skipped as u64;
        self.next_run = Some(started_at + self.interval());
        self.last_error = error.clone();

        let summary = RunSummary {
            timestamp: finished_at,
            processed,
            skipped,
            error: error.unwrap_or_default(),
        };
        self.push_run(summary.clone());
        summary
    }

    fn push_run(&mut self, summary: RunSummary) {
        while self.recent_runs.len() >= RUN_LOG_CAPACITY {
            self.recent_runs.pop_front();
        }
        self.recent_runs.push_back(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle_and_disabled() {
        let status = SchedulerStatus::new("/inbox", 60);
        assert!(!status.enabled);
        assert!(!status.is_running);
        assert_eq!(status.total_scans, 0);
        assert!(status.next_run.is_none());
        assert!(status.recent_runs.is_empty());
    }

    #[test]
    fn test_start_rejects_overlap() {
        let mut status = SchedulerStatus::new("/inbox", 60);
        let now = Utc::now();
        assert!(status.mark_started(now));
        assert!(!status.mark_started(now));
        assert_eq!(status.total_scans, 1);
    }

    #[test]
    fn test_completion_accumulates_and_schedules_from_start() {
        let mut status = SchedulerStatus::new("/inbox", 30);
        let start = Utc::now();
        let end = start + Duration::seconds(5);

        status.mark_started(start);
        let summary = status.mark_completed(start, end, 3, 2, None);
        assert!(!summary.is_error());
        assert!(!status.is_running);
        assert_eq!(status.next_run, Some(start + Duration::seconds(30)));

        status.mark_started(end);
        status.mark_completed(end, end, 1, 4, Some("boom".to_string()));
        assert_eq!(status.files_processed, 4);
        assert_eq!(status.files_skipped, 6);
        assert_eq!(status.last_error.as_deref(), Some("boom"));

        status.mark_started(end);
        status.mark_completed(end, end, 0, 0, None);
        assert!(status.last_error.is_none());
        assert_eq!(status.recent_runs.len(), 3);
        assert_eq!(status.recent_runs[1].error, "boom");
    }

    #[test]
    fn test_run_log_is_bounded() {
        let mut status = SchedulerStatus::new("/inbox", 1);
        let now = Utc::now();
        for i in 0..(RUN_LOG_CAPACITY + 5) {
            status.mark_started(now);
            status.mark_completed(now, now, i, 0, None);
        }
        assert_eq!(status.recent_runs.len(), RUN_LOG_CAPACITY);
        assert_eq!(status.recent_runs.front().unwrap().processed, 5);
        assert_eq!(
            status.recent_runs.back().unwrap().processed,
            RUN_LOG_CAPACITY + 4
        );
        assert_eq!(status.total_scans, (RUN_LOG_CAPACITY + 5) as u64);
    }
}
