use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS maintenance_schedule (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_uuid VARCHAR NOT NULL,
            partner VARCHAR NOT NULL,
            cid VARCHAR NOT NULL,
            subject VARCHAR NOT NULL,
            start_time BIGINT NOT NULL,
            end_time BIGINT NOT NULL,
            original_message VARCHAR NOT NULL,
            recorded_at BIGINT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_maintenance_schedule_event_uuid
         ON maintenance_schedule (event_uuid)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_maintenance_schedule_start_time
         ON maintenance_schedule (start_time)",
        [],
    )?;

    Ok(())
}
