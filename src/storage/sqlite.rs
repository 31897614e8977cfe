use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

const SCHEMA_VERSION: i64 = 1;

/// Append-only log of rename attempts backed by a single SQLite file.
///
/// The connection sits behind a mutex so one store can be shared between the
/// scheduler thread and a manual scan. SQLite's own locking covers other
/// processes pointing at the same file.
pub struct AuditStore {
    conn: Mutex<Connection>,
}

impl AuditStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::configure_pragmas(&conn)?;
        Self::migrate_schema(&conn)?;
        debug!("Audit store opened at {}", path.as_ref().display());
        Ok(AuditStore {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure_pragmas(&conn)?;
        Self::migrate_schema(&conn)?;
        Ok(AuditStore {
            conn: Mutex::new(conn),
        })
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        conn.busy_timeout(Duration::from_millis(5000))?;
        debug!("SQLite pragmas configured (journal_mode={}, synchronous=FULL)", journal_mode);
        Ok(())
    }

    /// Create the table and indexes if absent. Never drops existing rows.
    fn migrate_schema(conn: &Connection) -> Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            warn!(
                "Audit store schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            );
            return Ok(());
        }

        conn.execute_batch(include_str!("schema.sql"))?;
        debug!("SQLite schema initialized (version {})", SCHEMA_VERSION);
        Ok(())
    }

    /// Lock the connection. A panic while holding the lock leaves SQLite in a
    /// consistent state, so a poisoned mutex is recovered rather than propagated.
    pub(crate) fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        conn.close().map_err(|(_, err)| err)
    }
}
