use super::models::*;
use super::sqlite::AuditStore;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Result, Row};
use tracing::debug;

const RECORD_COLUMNS: &str = "id, original_name, new_name, file_path, file_size, \
                              file_mode, mod_time, renamed_at, success, error_msg";

/// Fixed-width RFC 3339 so that text order matches time order.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn record_from_row(row: &Row) -> Result<RenameRecord> {
    let mod_time: Option<String> = row.get(6)?;
    let renamed_at: String = row.get(7)?;
    Ok(RenameRecord {
        id: row.get(0)?,
        original_name: row.get(1)?,
        new_name: row.get(2)?,
        file_path: row.get(3)?,
        file_size: row.get(4)?,
        file_mode: row.get(5)?,
        mod_time: mod_time
            .as_deref()
            .map(|raw| parse_timestamp(6, raw))
            .transpose()?,
        renamed_at: parse_timestamp(7, &renamed_at)?,
        success: row.get(8)?,
        error_msg: row.get(9)?,
    })
}

/// Literal, case-insensitive substring pattern for `LIKE ... ESCAPE '\'`.
fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for ch in filter.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl AuditStore {
    /// True if any attempt, successful or not, was logged for this name.
    pub fn has_seen(&self, original_name: &str) -> Result<bool> {
        self.connection().query_row(
            "SELECT EXISTS(SELECT 1 FROM file_renames WHERE original_name = ?1)",
            params![original_name],
            |row| row.get(0),
        )
    }

    /// Append one record and return its id. A single INSERT is its own
    /// transaction, so the row is either fully written or absent.
    pub fn insert(&self, record: &RenameRecord) -> Result<i64> {
        let conn = self.connection();
        conn.execute(
            "INSERT INTO file_renames (original_name, new_name, file_path, file_size, \
             file_mode, mod_time, renamed_at, success, error_msg) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.original_name,
                record.new_name,
                record.file_path,
                record.file_size,
                record.file_mode,
                record.mod_time.as_ref().map(format_timestamp),
                format_timestamp(&record.renamed_at),
                record.success,
                record.error_msg,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("Recorded rename attempt {} for {}", id, record.original_name);
        Ok(id)
    }

    /// Newest first (`renamed_at` then `id`, both descending).
    pub fn list(&self, query: &RecordQuery) -> Result<RecordPage> {
        let pattern = query
            .filter
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(like_pattern);

        // SQLite treats a negative LIMIT as "no limit".
        let (limit, offset) = match query.page_size {
            Some(size) if size > 0 => {
                let page = query.page.unwrap_or(1).max(1) as i64;
                (size as i64, (page - 1).saturating_mul(size as i64))
            }
            _ => (-1, 0),
        };

        let conn = self.connection();
        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM file_renames \
             WHERE (?1 IS NULL OR original_name LIKE ?1 ESCAPE '\\')",
            params![pattern],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM file_renames \
             WHERE (?1 IS NULL OR original_name LIKE ?1 ESCAPE '\\') \
             ORDER BY renamed_at DESC, id DESC \
             LIMIT ?2 OFFSET ?3",
            RECORD_COLUMNS
        ))?;
        let records = stmt
            .query_map(params![pattern, limit, offset], record_from_row)?
            .collect::<Result<Vec<_>>>()?;

        Ok(RecordPage { records, total })
    }

    /// The attempt that produced `new_name`, if any.
    pub fn find_by_new_name(&self, new_name: &str) -> Result<Option<RenameRecord>> {
        match self.connection().query_row(
            &format!(
                "SELECT {} FROM file_renames WHERE new_name = ?1 ORDER BY id DESC LIMIT 1",
                RECORD_COLUMNS
            ),
            params![new_name],
            record_from_row,
        ) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn stats(&self) -> Result<AuditStats> {
        self.stats_at(Utc::now())
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> Result<AuditStats> {
        let cutoff = format_timestamp(&(now - Duration::hours(24)));
        self.connection().query_row(
            "SELECT COUNT(*), \
                    COALESCE(SUM(CASE WHEN success THEN 1 ELSE 0 END), 0), \
                    COALESCE(SUM(CASE WHEN success THEN 0 ELSE 1 END), 0), \
                    COALESCE(SUM(CASE WHEN renamed_at > ?1 THEN 1 ELSE 0 END), 0) \
             FROM file_renames",
            params![cutoff],
            |row| {
                Ok(AuditStats {
                    total_records: row.get(0)?,
                    successful_renames: row.get(1)?,
                    failed_renames: row.get(2)?,
                    recent_activity: row.get(3)?,
                })
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_timestamp_round_trip_keeps_order() {
        let early = Utc::now();
        let late = early + Duration::microseconds(1);
        let (a, b) = (format_timestamp(&early), format_timestamp(&late));
        assert!(a < b);
        assert_eq!(a.len(), b.len());
        let parsed = parse_timestamp(0, &a).unwrap();
        assert_eq!(format_timestamp(&parsed), a);
    }
}
