pub mod calendar_sync;
pub mod maintenance_lister;
pub mod overlap_report;

pub use calendar_sync::{publish_notification, sync_notifications, PublishOutcome, SyncSummary};
pub use maintenance_lister::{notifications_for, MaintenanceLister, Maintenances};
pub use overlap_report::{find_overlaps, log_overlaps};
