use auto_rename::storage::{AuditStats, RecordPage, RenameRecord};
use auto_rename::{ScanOutcome, SchedulerStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use colored::*;
use std::path::Path;

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn print_outcome(outcome: &ScanOutcome, dry_run: bool) {
    let verb = if dry_run { "Would rename" } else { "Successfully renamed" };
    println!(
        "{} {} files (skipped {}, failed {})",
        verb,
        format!("{}", outcome.renamed).green(),
        format!("{}", outcome.skipped).yellow(),
        format!("{}", outcome.failed).red(),
    );
}

pub fn print_records(page: &RecordPage) {
    for record in &page.records {
        let marker = if record.success { "✓".green() } else { "✗".red() };
        println!(
            "{} #{:<6} {}  {} -> {}",
            marker,
            record.id,
            timestamp(&record.renamed_at).dimmed(),
            record.original_name,
            record.new_name.cyan(),
        );
        if let Some(msg) = &record.error_msg {
            println!("          {}", msg.red());
        }
    }
    println!(
        "{} of {} records",
        page.records.len(),
        format!("{}", page.total).bold()
    );
}

pub fn print_stats(stats: &AuditStats) {
    println!("Total operations: {}", format!("{}", stats.total_records).bold());
    println!("Successful:       {}", format!("{}", stats.successful_renames).green());
    println!("Failed:           {}", format!("{}", stats.failed_renames).red());
    println!("Last 24h:         {}", format!("{}", stats.recent_activity).cyan());
}

pub fn status_line(status: &SchedulerStatus) -> String {
    let next = status
        .next_run
        .as_ref()
        .map(timestamp)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "scans={} processed={} skipped={} running={} next_run={} last_error={}",
        status.total_scans,
        status.files_processed,
        status.files_skipped,
        status.is_running,
        next,
        status.last_error.as_deref().unwrap_or("none"),
    )
}

const CSV_HEADER: [&str; 10] = [
    "id",
    "original_name",
    "new_name",
    "file_path",
    "file_size",
    "file_mode",
    "mod_time",
    "renamed_at",
    "success",
    "error_msg",
];

pub fn export_csv(records: &[RenameRecord], output: &Path) -> Result<usize, csv::Error> {
    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.id.to_string(),
            record.original_name.clone(),
            record.new_name.clone(),
            record.file_path.clone(),
            record.file_size.map(|s| s.to_string()).unwrap_or_default(),
            record.file_mode.clone().unwrap_or_default(),
            record.mod_time.as_ref().map(timestamp).unwrap_or_default(),
            timestamp(&record.renamed_at),
            record.success.to_string(),
            record.error_msg.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(records.len())
}
