use chrono::NaiveDate;
use extractors::{extract, normalize, PatternCatalog};
use shared_types::{MaintenanceNotification, RawEmailMessage};
use std::collections::VecDeque;

use crate::error::{Result, SyncError};
use crate::integrations::mailbox::{MailboxReader, MessageId};

/// Walks a mail folder and yields every maintenance window the catalog
/// recognises.
pub struct MaintenanceLister<'a, M: MailboxReader> {
    mailbox: M,
    catalog: &'a PatternCatalog,
    folder: String,
}

impl<'a, M: MailboxReader> MaintenanceLister<'a, M> {
    pub fn new(mailbox: M, catalog: &'a PatternCatalog, folder: impl Into<String>) -> Self {
        Self {
            mailbox,
            catalog,
            folder: folder.into(),
        }
    }

    /// Lists messages sent since `since`; each message is fetched only when
    /// the returned iterator reaches it.
    ///
    /// A fetch failure is yielded once and ends the iteration.
    pub fn list(&mut self, since: NaiveDate) -> Result<Maintenances<'_, M>> {
        let ids = self.mailbox.list_message_ids(&self.folder, since)?;
        tracing::info!(
            "Found {} emails in {} since {}",
            ids.len(),
            self.folder,
            since
        );

        Ok(Maintenances {
            mailbox: &mut self.mailbox,
            catalog: self.catalog,
            folder: &self.folder,
            ids: ids.into_iter(),
            pending: VecDeque::new(),
            failed: false,
        })
    }

    pub fn into_mailbox(self) -> M {
        self.mailbox
    }
}

pub struct Maintenances<'l, M: MailboxReader> {
    mailbox: &'l mut M,
    catalog: &'l PatternCatalog,
    folder: &'l str,
    ids: std::vec::IntoIter<MessageId>,
    pending: VecDeque<MaintenanceNotification>,
    failed: bool,
}

impl<M: MailboxReader> Iterator for Maintenances<'_, M> {
    type Item = std::result::Result<MaintenanceNotification, SyncError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(notification) = self.pending.pop_front() {
                return Some(Ok(notification));
            }
            if self.failed {
                return None;
            }

            let id = self.ids.next()?;
            match self.mailbox.fetch(self.folder, id) {
                Ok(message) => {
                    self.pending
                        .extend(notifications_for(&message, self.catalog, &id.to_string()));
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Runs every pattern of the catalog against one message, in catalog order.
///
/// `source` only labels log lines.
pub fn notifications_for(
    message: &RawEmailMessage,
    catalog: &PatternCatalog,
    source: &str,
) -> Vec<MaintenanceNotification> {
    let mut notifications = Vec::new();

    for pattern in catalog.iter() {
        if !pattern.applies_to(message) {
            continue;
        }

        let fields = extract(message, pattern);
        let cid = fields.cid.clone();

        match normalize(fields, pattern, message) {
            Ok(Some(notification)) => {
                tracing::debug!(
                    "Email {} matched {}: CID {} from {} to {}",
                    source,
                    pattern.partner_name(),
                    notification.cid,
                    notification.start_time,
                    notification.end_time
                );
                notifications.push(notification);
            }
            Ok(None) => {
                tracing::warn!(
                    "Email {} from {} ({:?}) matched {} but is missing CID, start or end time (cid: {:?})",
                    source,
                    message.sender,
                    message.subject,
                    pattern.partner_name(),
                    cid
                );
            }
            Err(e) => {
                tracing::error!(
                    "Email {} from {} skipped for {}: {}",
                    source,
                    message.sender,
                    pattern.partner_name(),
                    e
                );
            }
        }
    }

    notifications
}
