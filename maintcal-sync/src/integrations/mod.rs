pub mod calendar;
pub mod google_calendar;
pub mod mailbox;
pub mod message_parser;
pub mod real_imap_client;

pub use calendar::{CalendarPublisher, PublishAck};
pub use google_calendar::GoogleCalendarClient;
pub use mailbox::{MailboxReader, MessageId};
pub use real_imap_client::RealImapClient;
