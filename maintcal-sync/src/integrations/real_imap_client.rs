use chrono::NaiveDate;
use imap::ClientBuilder;
use shared_types::RawEmailMessage;

use crate::error::{Result, SyncError};
use crate::integrations::mailbox::{MailboxReader, MessageId};
use crate::integrations::message_parser::parse_message;

pub struct RealImapClient {
    session: imap::Session<imap::Connection>,
    selected: Option<String>,
}

impl RealImapClient {
    pub fn connect_with_password(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let client = ClientBuilder::new(host, port)
            .connect()
            .map_err(|e| SyncError::Mailbox(format!("Failed to connect to {}:{}: {}", host, port, e)))?;

        let session = client
            .login(username, password)
            .map_err(|(e, _)| SyncError::Mailbox(format!("IMAP login failed: {}", e)))?;

        tracing::info!("Logged in to {} as {}", host, username);
        Ok(Self {
            session,
            selected: None,
        })
    }

    fn select(&mut self, folder: &str) -> Result<()> {
        if self.selected.as_deref() == Some(folder) {
            return Ok(());
        }

        let mailbox = self
            .session
            .select(folder)
            .map_err(|e| SyncError::Mailbox(format!("Failed to select {}: {}", folder, e)))?;
        tracing::debug!("Selected {} ({} messages)", folder, mailbox.exists);

        self.selected = Some(folder.to_string());
        Ok(())
    }

    pub fn logout(mut self) {
        if let Err(e) = self.session.logout() {
            tracing::warn!("IMAP logout failed: {}", e);
        }
    }
}

impl MailboxReader for RealImapClient {
    fn list_message_ids(&mut self, folder: &str, since: NaiveDate) -> Result<Vec<MessageId>> {
        self.select(folder)?;

        let query = sent_since_query(since);
        tracing::info!("IMAP SEARCH query: {}", query);

        let uids = self
            .session
            .uid_search(&query)
            .map_err(|e| SyncError::Mailbox(format!("Search in {} failed: {}", folder, e)))?;

        let mut uids: Vec<MessageId> = uids.into_iter().collect();
        uids.sort_unstable();
        Ok(uids)
    }

    fn fetch(&mut self, folder: &str, id: MessageId) -> Result<RawEmailMessage> {
        self.select(folder)?;

        let messages = self
            .session
            .uid_fetch(id.to_string(), "RFC822")
            .map_err(|e| SyncError::Mailbox(format!("Fetch of UID {} failed: {}", id, e)))?;

        let message = messages
            .iter()
            .next()
            .ok_or_else(|| SyncError::Mailbox(format!("Email UID {} not found", id)))?;

        let body = message
            .body()
            .ok_or_else(|| SyncError::Mailbox(format!("Email UID {} has no body", id)))?;

        parse_message(body)
    }
}

fn sent_since_query(since: NaiveDate) -> String {
    format!("SENTSINCE {}", since.format("%d-%b-%Y"))
}
