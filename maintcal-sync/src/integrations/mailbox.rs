use chrono::NaiveDate;
use shared_types::RawEmailMessage;

use crate::error::Result;

/// Opaque per-folder message handle (an IMAP UID for the real mailbox).
pub type MessageId = u32;

/// Read-only access to a mail folder.
///
/// Any error is fatal for the run that hit it.
pub trait MailboxReader {
    /// Messages in `folder` sent on or after `since`, oldest first.
    fn list_message_ids(&mut self, folder: &str, since: NaiveDate) -> Result<Vec<MessageId>>;

    fn fetch(&mut self, folder: &str, id: MessageId) -> Result<RawEmailMessage>;
}

impl<M: MailboxReader + ?Sized> MailboxReader for &mut M {
    fn list_message_ids(&mut self, folder: &str, since: NaiveDate) -> Result<Vec<MessageId>> {
        (**self).list_message_ids(folder, since)
    }

    fn fetch(&mut self, folder: &str, id: MessageId) -> Result<RawEmailMessage> {
        (**self).fetch(folder, id)
    }
}
