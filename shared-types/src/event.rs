use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::maintenance::{iso_timestamp, MaintenanceNotification};

pub const EVENT_TIME_ZONE: &str = "UTC";

/// Calendar-facing projection of a maintenance notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceEvent {
    pub id: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub time_zone: String,
}

impl From<&MaintenanceNotification> for MaintenanceEvent {
    fn from(notification: &MaintenanceNotification) -> Self {
        let description = format!(
            "{} will be performing maintenance starting {} and ending {} that will affect the following CIDs:\n{}\n\n\n{}",
            notification.partner,
            iso_timestamp(&notification.start_time),
            iso_timestamp(&notification.end_time),
            notification.cid,
            notification.original_message,
        );

        Self {
            id: notification.event_uuid.clone(),
            summary: format!(
                "Scheduled Maintenance: {} {}",
                notification.partner, notification.cid
            ),
            description,
            location: String::new(),
            start: notification.start_time,
            end: notification.end_time,
            time_zone: EVENT_TIME_ZONE.to_string(),
        }
    }
}

/// An existing calendar entry's time window, as read back from the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWindow {
    pub id: String,
    pub summary: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_from_notification() {
        let notification = MaintenanceNotification {
            subject: "Scheduled Maintenance Notice".to_string(),
            cid: "ABC1234XYZ".to_string(),
            partner: "Partner A".to_string(),
            start_time: Utc.with_ymd_and_hms(2017, 12, 1, 1, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2017, 12, 1, 2, 0, 0).unwrap(),
            original_message: "CID: ABC1234XYZ".to_string(),
            event_uuid: "abc123".to_string(),
        };

        let event = MaintenanceEvent::from(&notification);

        assert_eq!(event.id, "abc123");
        assert_eq!(event.summary, "Scheduled Maintenance: Partner A ABC1234XYZ");
        assert!(event.location.is_empty());
        assert_eq!(event.time_zone, "UTC");
        assert!(event
            .description
            .starts_with("Partner A will be performing maintenance starting 2017-12-01T01:00:00Z"));
        assert!(event.description.ends_with("CID: ABC1234XYZ"));
    }
}
