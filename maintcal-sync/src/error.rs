use crate::helpers::keyring_service::KeyringError;
use extractors::CatalogError;

/// Errors that stop a sync run, named after the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("pattern catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("mailbox error: {0}")]
    Mailbox(String),

    #[error("credential error: {0}")]
    Credentials(#[from] KeyringError),

    #[error("calendar error: {0}")]
    Calendar(String),

    #[error("schedule store error: {0}")]
    Schedule(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<::config::ConfigError> for SyncError {
    fn from(err: ::config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
