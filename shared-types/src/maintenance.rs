use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A maintenance window extracted from one email by one pattern rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceNotification {
    pub subject: String,
    pub cid: String,
    pub partner: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Body text the match came from, kept for the event description
    pub original_message: String,
    /// Deduplication key derived from (cid, start_time, end_time)
    pub event_uuid: String,
}

/// Canonical ISO-8601 rendering used in event bodies and calendar requests.
/// Fractional seconds are kept when present.
pub fn iso_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
