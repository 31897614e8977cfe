use chrono::{DateTime, Utc};
use serde::Serialize;

/// One rename attempt. Rows are append-only; `id` is assigned by the store
/// and ignored on insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenameRecord {
    pub id: i64,
    pub original_name: String,
    pub new_name: String,
    /// Scan root the file was found under, not the full file path.
    pub file_path: String,
    pub file_size: Option<i64>,
    pub file_mode: Option<String>,
    pub mod_time: Option<DateTime<Utc>>,
    pub renamed_at: DateTime<Utc>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
}

/// Metadata captured before the rename. Absent when the stat call failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDetails {
    pub size: i64,
    pub mode: String,
    pub modified: Option<DateTime<Utc>>,
}

impl RenameRecord {
    pub fn succeeded(
        original_name: &str,
        new_name: &str,
        file_path: &str,
        details: FileDetails,
    ) -> Self {
        Self {
            id: 0,
            original_name: original_name.to_string(),
            new_name: new_name.to_string(),
            file_path: file_path.to_string(),
            file_size: Some(details.size),
            file_mode: Some(details.mode),
            mod_time: details.modified,
            renamed_at: Utc::now(),
            success: true,
            error_msg: None,
        }
    }

    pub fn failed(
        original_name: &str,
        new_name: &str,
        file_path: &str,
        details: Option<FileDetails>,
        error_msg: String,
    ) -> Self {
        let (file_size, file_mode, mod_time) = match details {
            Some(d) => (Some(d.size), Some(d.mode), d.modified),
            None => (None, None, None),
        };
        Self {
            id: 0,
            original_name: original_name.to_string(),
            new_name: new_name.to_string(),
            file_path: file_path.to_string(),
            file_size,
            file_mode,
            mod_time,
            renamed_at: Utc::now(),
            success: false,
            error_msg: Some(error_msg),
        }
    }
}

/// Listing parameters. `page` is 1-based; no `page_size` means everything.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub filter: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl RecordQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }
}

/// A page of records plus the number of rows matching the filter.
#[derive(Debug, Clone, Serialize)]
pub struct RecordPage {
    pub records: Vec<RenameRecord>,
    pub total: i64,
}

impl RecordPage {
    /// Zero or one record, as returned by a lookup.
    pub fn single(record: Option<RenameRecord>) -> Self {
        let records: Vec<RenameRecord> = record.into_iter().collect();
        let total = records.len() as i64;
        RecordPage { records, total }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditStats {
    pub total_records: i64,
    pub successful_renames: i64,
    pub failed_renames: i64,
    /// Records written during the 24 hours before the query.
    pub recent_activity: i64,
}
