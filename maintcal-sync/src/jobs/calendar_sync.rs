use shared_types::{MaintenanceEvent, MaintenanceNotification};

use crate::database::ScheduleStore;
use crate::error::{Result, SyncError};
use crate::integrations::calendar::{CalendarPublisher, PublishAck};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    AlreadyExists,
}

/// Counters for one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub seen: usize,
    pub created: usize,
    pub already_present: usize,
    pub failed: usize,
    pub recorded: usize,
}

/// Publishes the notification's event unless the calendar already holds
/// one with the same identity.
pub fn publish_notification<P>(
    publisher: &P,
    notification: &MaintenanceNotification,
) -> Result<PublishOutcome>
where
    P: CalendarPublisher + ?Sized,
{
    if publisher.exists(&notification.event_uuid)? {
        tracing::debug!(
            "Event {} for {} {} already in calendar",
            notification.event_uuid,
            notification.partner,
            notification.cid
        );
        return Ok(PublishOutcome::AlreadyExists);
    }

    let event = MaintenanceEvent::from(notification);
    match publisher.publish(&event)? {
        PublishAck::Created { link } => {
            tracing::info!(
                "Created event {} ({}) {}",
                event.id,
                event.summary,
                link.unwrap_or_default()
            );
            Ok(PublishOutcome::Created)
        }
        PublishAck::AlreadyExisted => {
            tracing::info!("Event {} was created concurrently", event.id);
            Ok(PublishOutcome::AlreadyExists)
        }
    }
}

/// Publishes every notification in turn.
///
/// A failed lookup or insert is logged and counted, and the run moves on.
/// An error item from the source aborts the run. Only newly created events
/// are written to `store`.
pub fn sync_notifications<I, P>(
    notifications: I,
    publisher: &P,
    store: Option<&ScheduleStore>,
) -> Result<SyncSummary>
where
    I: IntoIterator<Item = std::result::Result<MaintenanceNotification, SyncError>>,
    P: CalendarPublisher + ?Sized,
{
    let mut summary = SyncSummary::default();

    for notification in notifications {
        let notification = notification?;
        summary.seen += 1;

        match publish_notification(publisher, &notification) {
            Ok(PublishOutcome::Created) => {
                summary.created += 1;
                if let Some(store) = store {
                    match store.record(&notification) {
                        Ok(_) => summary.recorded += 1,
                        Err(e) => tracing::error!(
                            "Failed to record {} {} in schedule: {}",
                            notification.partner,
                            notification.cid,
                            e
                        ),
                    }
                }
            }
            Ok(PublishOutcome::AlreadyExists) => summary.already_present += 1,
            Err(e) => {
                summary.failed += 1;
                tracing::error!(
                    "Failed to publish {} {} ({}): {}",
                    notification.partner,
                    notification.cid,
                    notification.event_uuid,
                    e
                );
            }
        }
    }

    tracing::info!(
        "Sync finished: {} seen, {} created, {} already present, {} failed",
        summary.seen,
        summary.created,
        summary.already_present,
        summary.failed
    );

    Ok(summary)
}
