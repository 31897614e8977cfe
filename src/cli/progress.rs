use auto_rename::{EntryOutcome, ScanOutcome, ScanReporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;

/// CLI progress reporter: one bar over the files found in the walk.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn with_bar<F: FnOnce(&ProgressBar)>(&self, f: F) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }
}

impl ScanReporter for CliReporter {
    fn on_scan_start(&self, root: &Path) {
        eprintln!("  Scanning {}", root.display());
    }

    fn on_entries_found(&self, count: usize) {
        let pb = ProgressBar::new(count as u64);
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} Renaming [{bar:30.cyan/dim}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn on_entry(&self, name: &str, outcome: &EntryOutcome) {
        self.with_bar(|pb| {
            if let EntryOutcome::Failed { reason } = outcome {
                pb.println(format!("  \x1b[31m✗\x1b[0m {}: {}", name, reason));
            }
            pb.set_message(name.to_string());
            pb.inc(1);
        });
    }

    fn on_scan_complete(&self, outcome: &ScanOutcome, duration_secs: f64) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} renamed, {} skipped, {} failed in {:.2}s",
            outcome.renamed, outcome.skipped, outcome.failed, duration_secs
        );
    }
}
