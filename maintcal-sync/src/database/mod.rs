pub mod migrations;
pub mod schedule;

pub use schedule::ScheduleRecord;

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Local SQLite log of every maintenance window a run has seen.
pub struct ScheduleStore {
    conn: Connection,
}

impl ScheduleStore {
    /// Opens (creating if needed) the store at `db_path` and runs migrations.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        migrations::run_migrations(&conn)?;

        tracing::debug!("Schedule store opened at {}", db_path.display());
        Ok(Self { conn })
    }
}
