use serde::{Deserialize, Serialize};

/// Kinds of secrets kept in the OS keychain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialType {
    /// IMAP account password
    Imap,
    /// OAuth refresh token for the Google Calendar API
    GoogleCalendar,
}

impl CredentialType {
    pub fn service_name(&self) -> String {
        match self {
            CredentialType::Imap => "maintcal-imap".to_string(),
            CredentialType::GoogleCalendar => "maintcal-google-calendar".to_string(),
        }
    }
}
