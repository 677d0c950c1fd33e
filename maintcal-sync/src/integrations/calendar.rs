use shared_types::MaintenanceEvent;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishAck {
    Created { link: Option<String> },
    /// The calendar already held an event with this id
    AlreadyExisted,
}

/// A calendar that stores events under caller-chosen ids.
pub trait CalendarPublisher {
    fn exists(&self, event_id: &str) -> Result<bool>;

    fn publish(&self, event: &MaintenanceEvent) -> Result<PublishAck>;
}
