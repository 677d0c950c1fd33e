use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::Serialize;
use shared_types::MaintenanceNotification;

use crate::database::ScheduleStore;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRecord {
    pub id: i64,
    pub notification: MaintenanceNotification,
    pub recorded_at: i64,
}

impl ScheduleStore {
    /// Appends a notification. Records are never updated or removed.
    pub fn record(&self, notification: &MaintenanceNotification) -> Result<i64> {
        let now = Utc::now().timestamp();

        let id: i64 = self.conn.query_row(
            "INSERT INTO maintenance_schedule
             (event_uuid, partner, cid, subject, start_time, end_time, original_message, recorded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
            params![
                &notification.event_uuid,
                &notification.partner,
                &notification.cid,
                &notification.subject,
                notification.start_time.timestamp(),
                notification.end_time.timestamp(),
                &notification.original_message,
                now
            ],
            |row| row.get(0),
        )?;

        Ok(id)
    }

    /// All records, oldest first.
    pub fn list_records(&self) -> Result<Vec<ScheduleRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_uuid, partner, cid, subject, start_time, end_time,
                    original_message, recorded_at
             FROM maintenance_schedule
             ORDER BY id",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(ScheduleRecord {
                    id: row.get(0)?,
                    notification: MaintenanceNotification {
                        event_uuid: row.get(1)?,
                        partner: row.get(2)?,
                        cid: row.get(3)?,
                        subject: row.get(4)?,
                        start_time: timestamp_column(row, 5)?,
                        end_time: timestamp_column(row, 6)?,
                        original_message: row.get(7)?,
                    },
                    recorded_at: row.get(8)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}
