pub mod credential;
pub mod email;
pub mod event;
pub mod maintenance;
pub mod pattern;

pub use credential::CredentialType;
pub use email::{BodyPart, BodyPartKind, RawEmailMessage};
pub use event::{CalendarWindow, MaintenanceEvent, EVENT_TIME_ZONE};
pub use maintenance::{iso_timestamp, MaintenanceNotification};
pub use pattern::PatternRule;
